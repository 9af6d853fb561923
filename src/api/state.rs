//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{AuthService, InventoryService, ServiceContainer, Services};

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// Registration, login and token verification
    pub auth_service: Arc<dyn AuthService>,
    /// Sweet catalog and stock
    pub inventory_service: Arc<dyn InventoryService>,
    /// Database handle for health checks
    pub database: Arc<Database>,
}

impl AppState {
    /// Wire every service over the given database.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let container = Services::from_connection(database.get_connection(), config);

        Self {
            auth_service: container.auth(),
            inventory_service: container.inventory(),
            database,
        }
    }

    /// Create application state with manually injected services.
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        inventory_service: Arc<dyn InventoryService>,
        database: Arc<Database>,
    ) -> Self {
        Self {
            auth_service,
            inventory_service,
            database,
        }
    }
}
