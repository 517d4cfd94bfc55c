//! Application state management

use sqlx::SqlitePool;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    db: SqlitePool,
}

impl AppState {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Get the database pool
    pub fn db(&self) -> &SqlitePool {
        &self.db
    }
}
