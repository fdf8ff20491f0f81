use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::Database;

/// Shared application state available to all handlers via `State<AppState>`.
/// Cheaply cloneable; the pool is reference-counted internally.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<AppConfig>,
}
