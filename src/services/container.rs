//! Service Container - Centralized service access.

use std::sync::Arc;

use super::{AuthService, Authenticator, Inventory, InventoryService};
use crate::config::Config;
use crate::infra::Persistence;

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get inventory service
    fn inventory(&self) -> Arc<dyn InventoryService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    inventory_service: Arc<dyn InventoryService>,
}

impl Services {
    pub fn new(auth_service: Arc<dyn AuthService>, inventory_service: Arc<dyn InventoryService>) -> Self {
        Self {
            auth_service,
            inventory_service,
        }
    }

    /// Build every service over one shared unit of work
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        let uow = Arc::new(Persistence::new(db));

        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config)),
            inventory_service: Arc::new(Inventory::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn inventory(&self) -> Arc<dyn InventoryService> {
        self.inventory_service.clone()
    }
}
