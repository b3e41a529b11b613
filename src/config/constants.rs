//! Application-wide constants
//!
//! Centralized location for magic values to improve maintainability.

// =============================================================================
// Pagination
// =============================================================================

/// Default starting page number (1-indexed)
pub const DEFAULT_PAGE_NUMBER: u64 = 1;

/// Smallest page size; also the default when none is given
pub const MIN_PAGE_SIZE: u64 = 10;

/// Maximum allowed items per page to prevent excessive queries
pub const MAX_PAGE_SIZE: u64 = 100;

/// Highest page number; keeps the row offset inside a postgres BIGINT
pub const MAX_PAGE_NUMBER: u64 = i64::MAX as u64 / MAX_PAGE_SIZE;

// =============================================================================
// Authentication & Security
// =============================================================================

/// Token lifetime in hours
pub const TOKEN_EXPIRATION_HOURS: i64 = 24;

/// Default `iss` claim
pub const DEFAULT_JWT_ISSUER: &str = "admin-api";

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

/// Default bcrypt work factor
pub const DEFAULT_BCRYPT_COST: u32 = 12;

/// Accepted bcrypt cost range
pub const MIN_BCRYPT_COST: u32 = 4;
pub const MAX_BCRYPT_COST: u32 = 31;

/// Default Argon2 time cost (iterations)
pub const DEFAULT_ARGON2_TIME_COST: u32 = 2;

/// Accepted Argon2 time cost range
pub const MIN_ARGON2_TIME_COST: u32 = 1;
pub const MAX_ARGON2_TIME_COST: u32 = 10;

// =============================================================================
// User Roles
// =============================================================================

/// Default role assigned to new users
pub const ROLE_USER: &str = "USER_ROLE";

/// Administrator role with elevated privileges
pub const ROLE_ADMIN: &str = "ADMIN_ROLE";

/// Default display name for the bootstrap administrator
pub const DEFAULT_ADMIN_NAME: &str = "ADMINISTRATOR";

// =============================================================================
// Server Configuration
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 3000;

/// How long shutdown waits for background email tasks
pub const DEFAULT_SHUTDOWN_GRACE_SECONDS: u64 = 10;

// =============================================================================
// Email
// =============================================================================

/// Default SMTP submission port (STARTTLS)
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address
pub const DEFAULT_SMTP_FROM: &str = "Admin API <noreply@example.com>";

/// Subject of the account welcome email
pub const WELCOME_EMAIL_SUBJECT: &str = "Welcome to Admin API!";

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: u64 = 8;
