//! Infrastructure layer - External systems integration
//!
//! - Database connections and migrations
//! - Repositories over SeaORM entities
//! - Unit of Work for transaction management

pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{AccountRepository, AccountStore, SweetRepository, SweetStore};
pub use unit_of_work::{Persistence, TransactionContext, TxAccountRepository, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockAccountRepository, MockSweetRepository};
