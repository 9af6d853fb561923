//! Domain layer - Core business entities and logic
//!
//! Accounts, roles and identities for the auth side; sweets and their
//! stock rules for the inventory side. No infrastructure dependencies.

pub mod account;
pub mod password;
pub mod sweet;

pub use account::{require_role, Account, AccountResponse, Identity, Role};
pub use password::Password;
pub use sweet::{NewSweet, RestockAmount, Sweet, SweetChanges, SweetFilter};
