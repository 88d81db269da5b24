//! Centralized error handling.
//!
//! Provides a unified error type for the entire application,
//! with automatic HTTP response conversion.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid user ID")]
    InvalidId,

    /// Body could not be decoded; the detail is only logged
    #[error("Invalid request body")]
    InvalidRequest(String),

    #[error("{0}")]
    Validation(String),

    #[error("User not found")]
    UserNotFound,

    #[error("Email already exists")]
    EmailExists,

    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    /// Operation-level failure message shown to the client
    #[error("{0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error kind
    #[schema(example = "user_not_found")]
    pub error: String,
    /// Human-readable description
    #[schema(example = "User not found")]
    pub message: String,
    /// HTTP status code
    #[schema(example = 404)]
    pub code: u16,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidId => "invalid_id",
            AppError::InvalidRequest(_) => "invalid_request",
            AppError::Validation(_) => "validation_error",
            AppError::UserNotFound => "user_not_found",
            AppError::EmailExists => "email_exists",
            AppError::Database(_) | AppError::Internal(_) => "internal_server_error",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidId | AppError::InvalidRequest(_) | AppError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::UserNotFound => StatusCode::NOT_FOUND,
            AppError::EmailExists => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    fn user_message(&self) -> String {
        match self {
            AppError::InvalidRequest(detail) => {
                tracing::debug!(%detail, "Rejected request body");
                self.to_string()
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: self.code().to_string(),
            message: self.user_message(),
            code: status.as_u16(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::UserNotFound)
    }
}

/// Convenience constructors
impl AppError {
    pub fn invalid_request(detail: impl Into<String>) -> Self {
        AppError::InvalidRequest(detail.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
