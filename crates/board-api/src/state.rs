use std::sync::Arc;

use board_db::Database;

use crate::error::ServerError;

/// Service object built once at startup. Holds nothing but the storage handle.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self { db: Arc::new(db) }
    }

    /// Runs a blocking storage call off the async runtime.
    pub async fn with_db<F, T>(&self, f: F) -> Result<T, ServerError>
    where
        F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.db.clone();
        let result = tokio::task::spawn_blocking(move || f(db.as_ref())).await??;
        Ok(result)
    }
}
