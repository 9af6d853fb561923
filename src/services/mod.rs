//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure through the
//! Unit of Work, and depend only on repository traits.

mod auth_service;
pub mod container;
mod inventory_service;

pub use container::{ServiceContainer, Services};

pub use auth_service::{AuthService, Authenticator, Claims};
pub use inventory_service::{Inventory, InventoryService};
