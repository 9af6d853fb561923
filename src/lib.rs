//! CraveCraft - sweet shop inventory API.
//!
//! Accounts register and log in for a JWT session token. Any authenticated
//! account can browse, search and purchase sweets; admins also create, edit,
//! delete and restock them.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Accounts, roles, identities and sweets
//! - **services**: Auth and inventory use cases
//! - **infra**: Database, migrations, repositories, unit of work
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared request/response types
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server (applies pending migrations)
//! JWT_SECRET=... cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Identity, Password, Role, Sweet};
pub use errors::{AppError, AppResult};
