use std::{path::Path, time::Duration};

use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous},
};

pub mod models;

const INIT_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS todos (
    id          TEXT PRIMARY KEY,
    title       TEXT NOT NULL,
    description TEXT,
    status      TEXT NOT NULL DEFAULT 'pending',
    priority    INTEGER NOT NULL DEFAULT 0,
    due_date    TEXT,
    created_at  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
)
"#;

/// Handle on the SQLite store. Constructed once by the composition root and
/// injected wherever queries run; tests build their own against temp paths.
#[derive(Clone)]
pub struct DbService {
    pub pool: SqlitePool,
}

impl DbService {
    /// Opens (creating if missing) the database file at `database_path` and
    /// ensures the schema exists. The parent directory is created
    /// recursively. An unwritable path is fatal and propagates to the
    /// caller.
    pub async fn new(database_path: &Path) -> Result<DbService, sqlx::Error> {
        if let Some(parent) = database_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(sqlx::Error::Io)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(30));

        // The engine serializes writers itself; a single connection keeps
        // request handling strictly ordered.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        sqlx::query(INIT_SCHEMA).execute(&pool).await?;
        tracing::debug!("database ready at {}", database_path.display());

        Ok(DbService { pool })
    }

    /// Drains the pool. A subsequent `DbService::new` against the same path
    /// reinitializes cleanly.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
