//! Application settings loaded from environment variables.
//!
//! Variable names follow the `SECTION_KEY` convention (`APP_PORT`,
//! `DATABASE_MAX_OPEN_CONNS`, `LOGGING_FORMAT`, ...). A `.env` file is
//! honoured when present.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use super::constants::{
    DEFAULT_ACQUIRE_TIMEOUT_SECONDS, DEFAULT_APP_ENV, DEFAULT_APP_NAME,
    DEFAULT_CONN_MAX_LIFETIME_SECONDS, DEFAULT_DATABASE_HOST, DEFAULT_DATABASE_NAME,
    DEFAULT_DATABASE_PASSWORD, DEFAULT_DATABASE_PORT, DEFAULT_DATABASE_SSL_MODE,
    DEFAULT_DATABASE_USER, DEFAULT_JWT_EXPIRATION_HOURS, DEFAULT_LOG_LEVEL,
    DEFAULT_MAX_IDLE_CONNS, DEFAULT_MAX_OPEN_CONNS, DEFAULT_PASSWORD_ITERATIONS,
    DEFAULT_PASSWORD_MEMORY_KIB, DEFAULT_PASSWORD_PARALLELISM, DEFAULT_SERVER_HOST,
    DEFAULT_SERVER_PORT, DEV_JWT_SECRET, RATE_LIMIT_REQUESTS, RATE_LIMIT_WINDOW_SECONDS,
};

/// Configuration loading errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },

    #[error("{key} must be greater than zero")]
    Zero { key: &'static str },
}

/// Application configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
    pub rate_limit: RateLimitConfig,
}

/// HTTP server and service identity
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub name: String,
    pub env: String,
    pub host: String,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_APP_NAME.to_string(),
            env: DEFAULT_APP_ENV.to_string(),
            host: DEFAULT_SERVER_HOST.to_string(),
            port: DEFAULT_SERVER_PORT,
        }
    }
}

/// Database connection and pool settings
#[derive(Clone)]
pub struct DatabaseConfig {
    /// Full connection URL; takes precedence over the individual parts
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub ssl_mode: String,
    pub max_idle_conns: u32,
    pub max_open_conns: u32,
    pub conn_max_lifetime: Duration,
    pub acquire_timeout: Duration,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url.as_ref().map(|_| "[REDACTED]"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("name", &self.name)
            .field("ssl_mode", &self.ssl_mode)
            .field("max_idle_conns", &self.max_idle_conns)
            .field("max_open_conns", &self.max_open_conns)
            .field("conn_max_lifetime", &self.conn_max_lifetime)
            .field("acquire_timeout", &self.acquire_timeout)
            .finish()
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: DEFAULT_DATABASE_HOST.to_string(),
            port: DEFAULT_DATABASE_PORT,
            user: DEFAULT_DATABASE_USER.to_string(),
            password: DEFAULT_DATABASE_PASSWORD.to_string(),
            name: DEFAULT_DATABASE_NAME.to_string(),
            ssl_mode: DEFAULT_DATABASE_SSL_MODE.to_string(),
            max_idle_conns: DEFAULT_MAX_IDLE_CONNS,
            max_open_conns: DEFAULT_MAX_OPEN_CONNS,
            conn_max_lifetime: Duration::from_secs(DEFAULT_CONN_MAX_LIFETIME_SECONDS),
            acquire_timeout: Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECONDS),
        }
    }
}

impl DatabaseConfig {
    /// Connection URL, built from the individual parts unless overridden.
    pub fn connection_url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => format!(
                "postgres://{}:{}@{}:{}/{}?sslmode={}",
                self.user, self.password, self.host, self.port, self.name, self.ssl_mode
            ),
        }
    }

    /// Minimum pool size: idle connections, never above the pool maximum.
    pub fn min_connections(&self) -> u32 {
        self.max_idle_conns.min(self.max_open_conns)
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Console,
}

impl From<&str> for LogFormat {
    fn from(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "console" | "pretty" | "text" => LogFormat::Console,
            _ => LogFormat::Json,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter directive (`info`, `debug`, `user_api=trace`, ...)
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            format: LogFormat::Json,
        }
    }
}

/// JWT settings. Loaded for completeness; no endpoint verifies tokens.
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expire_hours: i64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("expire_hours", &self.expire_hours)
            .finish()
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEV_JWT_SECRET.to_string(),
            expire_hours: DEFAULT_JWT_EXPIRATION_HOURS,
        }
    }
}

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: DEFAULT_PASSWORD_MEMORY_KIB,
            iterations: DEFAULT_PASSWORD_ITERATIONS,
            parallelism: DEFAULT_PASSWORD_PARALLELISM,
        }
    }
}

/// Fixed-window rate limit applied per client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub requests: u64,
    pub window_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests: RATE_LIMIT_REQUESTS,
            window_seconds: RATE_LIMIT_WINDOW_SECONDS,
        }
    }
}

impl Config {
    /// Load configuration from `.env` and the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(&lookup);

        let app = AppConfig {
            name: vars.string("APP_NAME", DEFAULT_APP_NAME),
            env: vars.string("APP_ENV", DEFAULT_APP_ENV),
            host: vars.string("APP_HOST", DEFAULT_SERVER_HOST),
            port: vars.parse("APP_PORT", DEFAULT_SERVER_PORT)?,
        };

        let conn_max_lifetime = match vars.get("DATABASE_CONN_MAX_LIFETIME") {
            None => Duration::from_secs(DEFAULT_CONN_MAX_LIFETIME_SECONDS),
            Some(raw) => parse_duration(&raw).unwrap_or_else(|| {
                tracing::warn!(
                    value = %raw,
                    "Invalid DATABASE_CONN_MAX_LIFETIME, using default"
                );
                Duration::from_secs(DEFAULT_CONN_MAX_LIFETIME_SECONDS)
            }),
        };

        let acquire_timeout = match vars.get("DATABASE_ACQUIRE_TIMEOUT") {
            None => Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECONDS),
            Some(raw) => parse_duration(&raw).ok_or(ConfigError::InvalidValue {
                key: "DATABASE_ACQUIRE_TIMEOUT",
                value: raw,
            })?,
        };

        let database = DatabaseConfig {
            url: vars.get("DATABASE_URL"),
            host: vars.string("DATABASE_HOST", DEFAULT_DATABASE_HOST),
            port: vars.parse("DATABASE_PORT", DEFAULT_DATABASE_PORT)?,
            user: vars.string("DATABASE_USER", DEFAULT_DATABASE_USER),
            password: vars.string("DATABASE_PASSWORD", DEFAULT_DATABASE_PASSWORD),
            name: vars.string("DATABASE_NAME", DEFAULT_DATABASE_NAME),
            ssl_mode: vars.string("DATABASE_SSL_MODE", DEFAULT_DATABASE_SSL_MODE),
            max_idle_conns: vars.parse("DATABASE_MAX_IDLE_CONNS", DEFAULT_MAX_IDLE_CONNS)?,
            max_open_conns: vars.positive("DATABASE_MAX_OPEN_CONNS", DEFAULT_MAX_OPEN_CONNS)?,
            conn_max_lifetime,
            acquire_timeout,
        };

        let logging = LoggingConfig {
            level: vars.string("LOGGING_LEVEL", DEFAULT_LOG_LEVEL),
            format: vars
                .get("LOGGING_FORMAT")
                .map(|f| LogFormat::from(f.as_str()))
                .unwrap_or_default(),
        };

        let jwt = JwtConfig {
            secret: vars.get("JWT_SECRET").unwrap_or_else(|| {
                if app.env == "production" {
                    tracing::warn!("JWT_SECRET not set, using insecure development default");
                }
                DEV_JWT_SECRET.to_string()
            }),
            expire_hours: vars.parse("JWT_EXPIRE_HOURS", DEFAULT_JWT_EXPIRATION_HOURS)?,
        };

        let password = PasswordConfig {
            memory_kib: vars.positive("PASSWORD_MEMORY_KIB", DEFAULT_PASSWORD_MEMORY_KIB)?,
            iterations: vars.positive("PASSWORD_ITERATIONS", DEFAULT_PASSWORD_ITERATIONS)?,
            parallelism: vars.positive("PASSWORD_PARALLELISM", DEFAULT_PASSWORD_PARALLELISM)?,
        };

        let rate_limit = RateLimitConfig {
            requests: vars.positive("RATE_LIMIT_REQUESTS", RATE_LIMIT_REQUESTS)?,
            window_seconds: vars.positive("RATE_LIMIT_WINDOW_SECONDS", RATE_LIMIT_WINDOW_SECONDS)?,
        };

        Ok(Self {
            app,
            database,
            logging,
            jwt,
            password,
            rate_limit,
        })
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.app.host, self.app.port)
    }
}

/// Typed access over a key lookup function.
struct Vars<'a, F: Fn(&str) -> Option<String>>(&'a F);

impl<F: Fn(&str) -> Option<String>> Vars<'_, F> {
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn string(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    fn parse<T: FromStr>(&self, key: &'static str, default: T) -> Result<T, ConfigError> {
        match self.get(key) {
            None => Ok(default),
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
        }
    }

    fn positive<T>(&self, key: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr + PartialEq + Default,
    {
        let value = self.parse(key, default)?;
        if value == T::default() {
            return Err(ConfigError::Zero { key });
        }
        Ok(value)
    }
}

/// Parse `90`, `45s`, `30m`, `1h` or compound forms such as `1h30m`.
fn parse_duration(value: &str) -> Option<Duration> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(secs) = value.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }

    let mut total: u64 = 0;
    let mut digits = String::new();
    for ch in value.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }
        let amount: u64 = digits.parse().ok()?;
        digits.clear();
        let unit = match ch {
            'h' => 3600,
            'm' => 60,
            's' => 1,
            _ => return None,
        };
        total = total.checked_add(amount.checked_mul(unit)?)?;
    }

    if !digits.is_empty() {
        return None;
    }
    Some(Duration::from_secs(total))
}
