//! Application-wide constants
//!
//! Centralized location for magic values to improve maintainability.

// =============================================================================
// Pagination
// =============================================================================

/// Default number of users returned by a list query
pub const DEFAULT_PAGE_LIMIT: u64 = 10;

/// Maximum allowed items per page to prevent excessive queries
pub const MAX_PAGE_LIMIT: u64 = 100;

/// Default starting offset
pub const DEFAULT_PAGE_OFFSET: u64 = 0;

// =============================================================================
// Authentication & Security
// =============================================================================

/// Default access token lifetime (humantime expression)
pub const DEFAULT_ACCESS_TTL: &str = "15m";

/// Default refresh token lifetime (humantime expression)
pub const DEFAULT_REFRESH_TTL: &str = "720h";

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

/// Authorization header values at or below this length are never stripped
pub const MIN_BEARER_HEADER_LENGTH: usize = 10;

/// JWT token type identifier
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

// =============================================================================
// User Attributes
// =============================================================================

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_DEACTIVE: &str = "deactive";

pub const GENDER_MALE: &str = "male";
pub const GENDER_FEMALE: &str = "female";

/// Calendar format accepted for birth dates (e.g. 1990-01-31)
pub const BIRTH_DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Server Configuration
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 3000;

/// Default per-request deadline (humantime expression)
pub const DEFAULT_REQUEST_TIMEOUT: &str = "10s";

// =============================================================================
// Database
// =============================================================================

pub const DEFAULT_DB_HOST: &str = "localhost";
pub const DEFAULT_DB_PORT: u16 = 5432;
pub const DEFAULT_DB_NAME: &str = "account_service";
pub const DEFAULT_DB_USER: &str = "postgres";
pub const DEFAULT_DB_SSLMODE: &str = "disable";

/// Default connection pool size
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: u64 = 8;

