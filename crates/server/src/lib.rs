use std::time::{Duration, Instant};

use db::DbService;

pub mod error;
pub mod extract;
pub mod http;
pub mod routes;
pub mod test_support;
pub mod validation;

/// Shared request state: the injected database handle plus the process
/// start instant for health reporting.
#[derive(Clone)]
pub struct AppState {
    db: DbService,
    started_at: Instant,
}

impl AppState {
    pub fn new(db: DbService) -> Self {
        Self {
            db,
            started_at: Instant::now(),
        }
    }

    pub fn db(&self) -> &DbService {
        &self.db
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}
