//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

pub(crate) mod account_repository;
pub(crate) mod entities;
mod sweet_repository;

pub use account_repository::{AccountRepository, AccountStore};
pub use sweet_repository::{SweetRepository, SweetStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use account_repository::MockAccountRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use sweet_repository::MockSweetRepository;
