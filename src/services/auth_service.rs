//! Authentication service - registration, login and session tokens.
//!
//! Password hashing lives in the domain `Password` value object; this
//! service only orchestrates it with the account repository.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::{Config, SESSION_TTL_HOURS};
use crate::domain::{Account, Identity, Password, Role};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;
use crate::with_transaction;

/// Hash verified for unknown emails so both login failure paths cost one verification.
static DUMMY_PASSWORD: Lazy<Option<Password>> =
    Lazy::new(|| Password::new("cravecraft-login-timing-guard").ok());

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: i32,
    pub email: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.id,
            email: claims.email,
            role: claims.role,
        }
    }
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new account. `role` defaults to `user`.
    async fn register(&self, email: String, password: String, role: Option<Role>) -> AppResult<Account>;

    /// Check credentials and issue a session token
    async fn login(&self, email: String, password: String) -> AppResult<String>;

    /// Verify a session token and extract its claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Sign a token for `account` issued at `issued_at` (unix seconds).
fn issue_token(account: &Account, issued_at: i64, config: &Config) -> AppResult<String> {
    let claims = Claims {
        id: account.id,
        email: account.email.clone(),
        role: account.role,
        iat: issued_at,
        exp: issued_at + Duration::hours(SESSION_TTL_HOURS).num_seconds(),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(token)
}

fn decode_token(token: &str, config: &Config) -> AppResult<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, email: String, password: String, role: Option<Role>) -> AppResult<Account> {
        if email.trim().is_empty() {
            return Err(AppError::validation("Email is required"));
        }
        if password.is_empty() {
            return Err(AppError::validation("Password is required"));
        }

        let role = role.unwrap_or_default();
        let password_hash = Password::new(&password)?.into_string();

        let account = with_transaction!(self.uow, |ctx| {
            let accounts = ctx.accounts();
            if accounts.find_by_email(&email).await?.is_some() {
                return Err(AppError::conflict("User"));
            }
            accounts.create(email, password_hash, role).await
        })?;

        tracing::info!(account_id = account.id, role = %account.role, "Account registered");
        Ok(account)
    }

    async fn login(&self, email: String, password: String) -> AppResult<String> {
        let account = self.uow.accounts().find_by_email(&email).await?;

        let verified = match &account {
            Some(account) => Password::from_hash(account.password_hash.clone()).verify(&password),
            None => {
                if let Some(dummy) = DUMMY_PASSWORD.as_ref() {
                    dummy.verify(&password);
                }
                false
            }
        };

        let account = match account {
            Some(account) if verified => account,
            _ => {
                tracing::debug!("Login rejected");
                return Err(AppError::InvalidCredentials);
            }
        };

        tracing::debug!(account_id = account.id, "Login succeeded");
        issue_token(&account, Utc::now().timestamp(), &self.config)
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        decode_token(token, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{
        AccountRepository, MockAccountRepository, MockSweetRepository, SweetRepository,
        TransactionContext,
    };

    const SECRET: &str = "unit-test-secret-with-at-least-32-bytes";

    /// Unit of work over mocks; transactions need a real database.
    struct MockUow {
        accounts: Arc<MockAccountRepository>,
    }

    #[async_trait]
    impl UnitOfWork for MockUow {
        fn accounts(&self) -> Arc<dyn AccountRepository> {
            self.accounts.clone()
        }

        fn sweets(&self) -> Arc<dyn SweetRepository> {
            Arc::new(MockSweetRepository::new())
        }

        async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
        where
            F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                    Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
                > + Send,
            T: Send,
        {
            Err(AppError::internal("transactions are not available in unit tests"))
        }
    }

    fn config() -> Config {
        Config::new("sqlite::memory:", SECRET).unwrap()
    }

    fn account(password: &str) -> Account {
        Account {
            id: 1,
            email: "a@x.com".to_string(),
            password_hash: Password::new(password).unwrap().into_string(),
            role: Role::User,
        }
    }

    fn authenticator(accounts: MockAccountRepository) -> Authenticator<MockUow> {
        let uow = Arc::new(MockUow {
            accounts: Arc::new(accounts),
        });
        Authenticator::new(uow, config())
    }

    #[tokio::test]
    async fn test_login_issues_verifiable_token() {
        let stored = account("secret1");
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(stored.clone())));

        let auth = authenticator(repo);
        let token = auth.login("a@x.com".into(), "secret1".into()).await.unwrap();
        let claims = auth.verify_token(&token).unwrap();

        assert_eq!(claims.id, 1);
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.role, Role::User);
        assert_eq!(claims.exp - claims.iat, SESSION_TTL_HOURS * 3600);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_look_the_same() {
        let stored = account("secret1");
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_email().returning(move |email| {
            Ok((email == "a@x.com").then(|| stored.clone()))
        });

        let auth = authenticator(repo);
        let wrong = auth.login("a@x.com".into(), "nope".into()).await.unwrap_err();
        let unknown = auth.login("b@x.com".into(), "secret1".into()).await.unwrap_err();

        assert!(matches!(wrong, AppError::InvalidCredentials));
        assert!(matches!(unknown, AppError::InvalidCredentials));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn test_register_rejects_empty_email_before_storage() {
        let auth = authenticator(MockAccountRepository::new());
        let err = auth.register("  ".into(), "pw".into(), None).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_expired_token_rejected() {
        let config = config();
        let issued = Utc::now().timestamp() - 25 * 3600;
        let token = issue_token(&account("x"), issued, &config).unwrap();

        assert!(matches!(decode_token(&token, &config), Err(AppError::Jwt(_))));
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let other = Config::new("sqlite::memory:", "another-secret-that-is-32-bytes-long").unwrap();
        let token = issue_token(&account("x"), Utc::now().timestamp(), &other).unwrap();

        assert!(decode_token(&token, &config()).is_err());
    }

    #[test]
    fn test_malformed_token_rejected() {
        assert!(decode_token("not.a.jwt", &config()).is_err());
        assert!(decode_token("", &config()).is_err());
    }

    #[test]
    fn test_claims_into_identity() {
        let claims = Claims {
            id: 3,
            email: "admin@x.com".into(),
            role: Role::Admin,
            iat: 0,
            exp: 0,
        };
        let identity = Identity::from(claims);
        assert!(identity.is_admin());
        assert_eq!(identity.id, 3);
    }
}
