pub mod error;
pub mod extract;
pub mod routes;
pub mod screeches;
pub mod users;

use std::sync::Arc;

use screech_db::Database;

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
}

impl AppStateInner {
    pub fn new(db: Database) -> AppState {
        Arc::new(Self { db })
    }
}

/// Run a blocking service call against the shared database off the async runtime.
pub(crate) async fn run_blocking<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Database) -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| ApiError::Storage(anyhow::anyhow!("spawn_blocking join error: {}", e)))?
}

/// `None` for an empty string, so it can be passed as an optional filter.
pub(crate) fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() { None } else { Some(s) }
}

pub(crate) fn any_empty(values: &[&str]) -> bool {
    values.iter().any(|v| v.is_empty())
}
