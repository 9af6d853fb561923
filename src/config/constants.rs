//! Application-wide constants
//!
//! Centralized location for magic values to improve maintainability.

// =============================================================================
// Authentication & Security
// =============================================================================

/// Session token lifetime in hours
pub const SESSION_TTL_HOURS: i64 = 24;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

// =============================================================================
// Account Roles
// =============================================================================

/// Default role assigned to new accounts
pub const ROLE_USER: &str = "user";

/// Role permitted to manage the catalog
pub const ROLE_ADMIN: &str = "admin";

// =============================================================================
// Server Configuration
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 5000;

// =============================================================================
// Database
// =============================================================================

/// Default database connection URL (local SQLite file, created on demand)
pub const DEFAULT_DATABASE_URL: &str = "sqlite://cravecraft.db?mode=rwc";

// =============================================================================
// Responses
// =============================================================================

pub const MSG_USER_REGISTERED: &str = "User registered";
pub const MSG_LOGIN_SUCCESSFUL: &str = "Login successful";
pub const MSG_SWEET_DELETED: &str = "Sweet deleted";
