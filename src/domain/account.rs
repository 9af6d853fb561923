//! Account domain entity, roles and verified identities.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::{ROLE_ADMIN, ROLE_USER};
use crate::errors::{AppError, AppResult};

/// Account roles enumeration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => ROLE_ADMIN,
            Role::User => ROLE_USER,
        }
    }
}

impl std::str::FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        match s {
            ROLE_USER => Ok(Role::User),
            ROLE_ADMIN => Ok(Role::Admin),
            other => Err(AppError::validation(format!("Unknown role: {}", other))),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account domain entity
#[derive(Debug, Clone)]
pub struct Account {
    pub id: i32,
    pub email: String,
    /// Salted hash; never serialized to clients.
    pub password_hash: String,
    pub role: Role,
}

/// Account response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AccountResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "a@x.com")]
    pub email: String,
    #[schema(example = "user")]
    pub role: Role,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            email: account.email,
            role: account.role,
        }
    }
}

/// Verified identity extracted from a session token.
///
/// Passed explicitly into every protected operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: i32,
    pub email: String,
    pub role: Role,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Fail with `Forbidden` unless the identity holds exactly `role`.
pub fn require_role(identity: &Identity, role: Role) -> AppResult<()> {
    if identity.role == role {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(role: Role) -> Identity {
        Identity {
            id: 7,
            email: "a@x.com".to_string(),
            role,
        }
    }

    #[test]
    fn test_role_parse_and_display() {
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert!("Admin".parse::<Role>().is_err());
        assert!("superuser".parse::<Role>().is_err());
        assert_eq!(Role::Admin.to_string(), "admin");
        assert_eq!(Role::default(), Role::User);
    }

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        let role: Role = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, Role::User);
    }

    #[test]
    fn test_require_role_exact_match() {
        assert!(require_role(&identity(Role::Admin), Role::Admin).is_ok());
        assert!(require_role(&identity(Role::User), Role::User).is_ok());
        assert!(matches!(
            require_role(&identity(Role::User), Role::Admin),
            Err(AppError::Forbidden)
        ));
        assert!(matches!(
            require_role(&identity(Role::Admin), Role::User),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn test_account_response_omits_hash() {
        let account = Account {
            id: 1,
            email: "a@x.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: Role::User,
        };
        let json = serde_json::to_value(AccountResponse::from(account)).unwrap();
        assert_eq!(json["email"], "a@x.com");
        assert_eq!(json["role"], "user");
        assert!(json.get("password_hash").is_none());
    }
}
