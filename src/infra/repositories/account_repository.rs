//! Account repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, NotSet,
    QueryFilter, Set,
};

use super::entities::account::{self, ActiveModel, Entity as AccountEntity};
use crate::domain::{Account, Role};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Account repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find account by exact (case-sensitive) email
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>>;

    /// Persist a new account.
    ///
    /// Fails with `Conflict` if the email is already taken.
    async fn create(&self, email: String, password_hash: String, role: Role) -> AppResult<Account>;
}

/// SeaORM-backed account repository
pub struct AccountStore {
    db: DatabaseConnection,
}

impl AccountStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountRepository for AccountStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        find_by_email(&self.db, email).await
    }

    async fn create(&self, email: String, password_hash: String, role: Role) -> AppResult<Account> {
        insert(&self.db, email, password_hash, role).await
    }
}

/// Lookup shared by the pooled store and the transaction-scoped repository
pub(crate) async fn find_by_email<C: ConnectionTrait>(conn: &C, email: &str) -> AppResult<Option<Account>> {
    let result = AccountEntity::find()
        .filter(account::Column::Email.eq(email))
        .one(conn)
        .await
        .map_err(AppError::from)?;

    Ok(result.map(Account::from))
}

pub(crate) async fn insert<C: ConnectionTrait>(
    conn: &C,
    email: String,
    password_hash: String,
    role: Role,
) -> AppResult<Account> {
    let active_model = ActiveModel {
        id: NotSet,
        email: Set(email),
        password_hash: Set(password_hash),
        role: Set(role.as_str().to_string()),
    };

    // The unique index decides races between concurrent registrations
    let model = active_model
        .insert(conn)
        .await
        .map_err(|e| AppError::from_db_conflict(e, "User"))?;

    Ok(Account::from(model))
}
