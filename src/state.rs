//! Shared application state for request handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::InventoryDb;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Contains the application configuration and the inventory database backend.
/// The backend is a factory for per-request connections, not a connection
/// itself, so nothing here is mutable between requests.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: Arc<dyn InventoryDb>,
}

impl AppState {
    /// Creates a new application state from the given configuration and backend.
    pub fn new(config: AppConfig, db: Arc<dyn InventoryDb>) -> Self {
        Self {
            config: Arc::new(config),
            db,
        }
    }
}
