//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Database, RateLimiter, UserStore};
use crate::services::{UserManager, UserService};

/// Application state shared by every request.
#[derive(Clone)]
pub struct AppState {
    /// User service
    pub user_service: Arc<dyn UserService>,
    /// Loaded configuration
    pub config: Arc<Config>,
    /// Per-client request counters
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    /// Wire the SeaORM-backed user service over an open database.
    pub fn from_database(database: &Database, config: Config) -> Self {
        let repo = Arc::new(UserStore::new(database.get_connection()));
        let user_service = Arc::new(UserManager::new(repo, config.password));
        Self::new(user_service, config)
    }

    /// Create application state with a manually injected service.
    pub fn new(user_service: Arc<dyn UserService>, config: Config) -> Self {
        let rate_limiter = Arc::new(RateLimiter::new(&config.rate_limit));
        Self {
            user_service,
            config: Arc::new(config),
            rate_limiter,
        }
    }
}
