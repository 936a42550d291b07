use std::path::PathBuf;

use axum::Router;
use db::DbService;
use uuid::Uuid;

use crate::{AppState, http};

pub fn temp_database_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("todo-server-test-{}", Uuid::new_v4()))
        .join("todos.db")
}

/// Fresh router over its own temp-file database. Returning the handle keeps
/// the pool alive and lets tests reach the store directly.
pub async fn test_app() -> (DbService, Router) {
    let db = DbService::new(&temp_database_path())
        .await
        .expect("test database should open");
    let state = AppState::new(db.clone());
    (db, http::router(state))
}
