//! Application-wide constants
//!
//! Centralized location for magic values to improve maintainability.

// =============================================================================
// Application
// =============================================================================

/// Default service name reported by the health endpoint
pub const DEFAULT_APP_NAME: &str = "user-api";

/// Default deployment environment
pub const DEFAULT_APP_ENV: &str = "development";

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

// =============================================================================
// Pagination
// =============================================================================

/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Maximum allowed items per page; larger requests fall back to the default
pub const MAX_PAGE_SIZE: u64 = 100;

/// Default starting page number (1-indexed)
pub const DEFAULT_PAGE_NUMBER: u64 = 1;

// =============================================================================
// Database
// =============================================================================

pub const DEFAULT_DATABASE_HOST: &str = "localhost";
pub const DEFAULT_DATABASE_PORT: u16 = 5432;
pub const DEFAULT_DATABASE_USER: &str = "postgres";
pub const DEFAULT_DATABASE_PASSWORD: &str = "password";
pub const DEFAULT_DATABASE_NAME: &str = "user_api";
pub const DEFAULT_DATABASE_SSL_MODE: &str = "disable";

/// Connections kept open while idle
pub const DEFAULT_MAX_IDLE_CONNS: u32 = 10;

/// Upper bound on pooled connections
pub const DEFAULT_MAX_OPEN_CONNS: u32 = 100;

/// Maximum lifetime of a pooled connection in seconds (1 hour)
pub const DEFAULT_CONN_MAX_LIFETIME_SECONDS: u64 = 3600;

/// How long a request waits for a free connection before failing
pub const DEFAULT_ACQUIRE_TIMEOUT_SECONDS: u64 = 30;

// =============================================================================
// Logging
// =============================================================================

pub const DEFAULT_LOG_LEVEL: &str = "debug";

// =============================================================================
// Authentication (loaded but not enforced by any endpoint)
// =============================================================================

/// Default JWT token expiration in hours
pub const DEFAULT_JWT_EXPIRATION_HOURS: i64 = 24;

/// Development-only fallback secret
pub const DEV_JWT_SECRET: &str = "dev-secret-key-minimum-32-chars!!";

// =============================================================================
// Password hashing (Argon2id)
// =============================================================================

/// Memory cost in KiB (argon2 crate recommended default, 19 MiB)
pub const DEFAULT_PASSWORD_MEMORY_KIB: u32 = 19_456;

/// Number of passes over memory
pub const DEFAULT_PASSWORD_ITERATIONS: u32 = 2;

/// Degree of parallelism (lanes)
pub const DEFAULT_PASSWORD_PARALLELISM: u32 = 1;

// =============================================================================
// Rate Limiting
// =============================================================================

/// Default rate limit: requests per window
pub const RATE_LIMIT_REQUESTS: u64 = 20;

/// Default rate limit window in seconds
pub const RATE_LIMIT_WINDOW_SECONDS: u64 = 1;

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 6;
