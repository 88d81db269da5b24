//! Shared fixtures for integration tests.

#![allow(dead_code)]

use sea_orm::ConnectOptions;

use user_api::config::{Config, PasswordConfig, RateLimitConfig};
use user_api::infra::Database;

/// Fresh in-memory SQLite database with all migrations applied.
///
/// A single pooled connection keeps every query on the same in-memory store.
pub async fn sqlite_database() -> Database {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    Database::connect_with(options)
        .await
        .expect("in-memory sqlite should open")
}

/// Cheap Argon2 cost for tests
pub const TEST_PASSWORD: PasswordConfig = PasswordConfig {
    memory_kib: 1024,
    iterations: 1,
    parallelism: 1,
};

/// Default configuration with cheap hashing and a limit tests never hit.
pub fn test_config() -> Config {
    Config {
        password: TEST_PASSWORD,
        rate_limit: RateLimitConfig {
            requests: 10_000,
            window_seconds: 1,
        },
        ..Config::default()
    }
}
