//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections, migrations and repositories
//! - Request rate limiting state

pub mod db;
pub mod rate_limiter;
pub mod repositories;

pub use db::{Database, Migrator};
pub use rate_limiter::{RateLimitDecision, RateLimiter};
pub use repositories::{UserRepository, UserStore};

#[cfg(test)]
pub use repositories::MockUserRepository;
