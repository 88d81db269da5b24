//! User service - Handles user-related business logic.
//!
//! Enforces email uniqueness, hashes passwords and applies the partial
//! update rules on top of a [`UserRepository`]. Storage failures are logged
//! here with full detail and surfaced as a generic error naming the failed
//! operation.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::PasswordConfig;
use crate::domain::{Password, UserListResponse, UserResponse};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UserRepository;
use crate::types::PageRequest;

const LIST_FAILED: &str = "Failed to get users";
const GET_FAILED: &str = "Failed to get user";
const CREATE_FAILED: &str = "Failed to create user";
const UPDATE_FAILED: &str = "Failed to update user";
const DELETE_FAILED: &str = "Failed to delete user";

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Register a new user with a unique email
    async fn create_user(
        &self,
        name: String,
        email: String,
        password: String,
    ) -> AppResult<UserResponse>;

    /// Get user by ID
    async fn get_user(&self, id: i64) -> AppResult<UserResponse>;

    /// List users; out-of-range paging values fall back to defaults
    async fn list_users(&self, page: i64, limit: i64) -> AppResult<UserListResponse>;

    /// Apply a partial update. Empty values leave the field unchanged.
    async fn update_user(
        &self,
        id: i64,
        name: Option<String>,
        email: Option<String>,
    ) -> AppResult<UserResponse>;

    /// Delete user; deleting an absent user is an error
    async fn delete_user(&self, id: i64) -> AppResult<()>;
}

/// Concrete implementation of UserService.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
    password: PasswordConfig,
}

impl UserManager {
    /// Create new user service instance
    pub fn new(repo: Arc<dyn UserRepository>, password: PasswordConfig) -> Self {
        Self { repo, password }
    }

    async fn hash_password(&self, plain: String) -> AppResult<Password> {
        let config = self.password;
        tokio::task::spawn_blocking(move || Password::new(&plain, &config))
            .await
            .map_err(|e| AppError::internal(format!("Password hashing task failed: {}", e)))?
    }
}

/// Replace infrastructure failures with the operation-level message.
fn surface(operation: &'static str) -> impl Fn(AppError) -> AppError {
    move |err| match err {
        err @ (AppError::Database(_) | AppError::Internal(_)) => {
            tracing::error!(error = ?err, "{}", operation);
            AppError::internal(operation)
        }
        other => other,
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn create_user(
        &self,
        name: String,
        email: String,
        password: String,
    ) -> AppResult<UserResponse> {
        let existing = self
            .repo
            .find_by_email(&email)
            .await
            .map_err(surface(CREATE_FAILED))?;
        if existing.is_some() {
            return Err(AppError::EmailExists);
        }

        let hash = self
            .hash_password(password)
            .await
            .map_err(surface(CREATE_FAILED))?;

        let user = self
            .repo
            .create(name, email, hash.into_string())
            .await
            .map_err(surface(CREATE_FAILED))?;

        tracing::info!(user_id = user.id, "User created");
        Ok(UserResponse::from(user))
    }

    async fn get_user(&self, id: i64) -> AppResult<UserResponse> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(surface(GET_FAILED))?
            .map(UserResponse::from)
            .ok_or_not_found()
    }

    async fn list_users(&self, page: i64, limit: i64) -> AppResult<UserListResponse> {
        let request = PageRequest::clamped(page, limit);

        let (users, total) = self
            .repo
            .list(request)
            .await
            .map_err(surface(LIST_FAILED))?;

        Ok(UserListResponse {
            users: users.into_iter().map(UserResponse::from).collect(),
            total,
            page: request.page(),
            limit: request.limit(),
        })
    }

    async fn update_user(
        &self,
        id: i64,
        name: Option<String>,
        email: Option<String>,
    ) -> AppResult<UserResponse> {
        let mut user = self
            .repo
            .find_by_id(id)
            .await
            .map_err(surface(UPDATE_FAILED))?
            .ok_or_not_found()?;

        if let Some(name) = name.filter(|n| !n.is_empty()) {
            user.name = name;
        }

        if let Some(email) = email.filter(|e| !e.is_empty()) {
            let owner = self
                .repo
                .find_by_email(&email)
                .await
                .map_err(surface(UPDATE_FAILED))?;
            if owner.is_some_and(|other| other.id != id) {
                return Err(AppError::EmailExists);
            }
            user.email = email;
        }

        let user = self
            .repo
            .update(user)
            .await
            .map_err(surface(UPDATE_FAILED))?;

        tracing::info!(user_id = user.id, "User updated");
        Ok(UserResponse::from(user))
    }

    async fn delete_user(&self, id: i64) -> AppResult<()> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(surface(DELETE_FAILED))?
            .ok_or_not_found()?;

        self.repo
            .delete(id)
            .await
            .map_err(surface(DELETE_FAILED))?;

        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }
}
