//! OpenAPI documentation configuration.
//!
//! Served as JSON at `/api-docs/openapi.json` and browsable at `/swagger`.

use utoipa::OpenApi;

use crate::api::handlers::{health_handler, user_handler};
use crate::domain::{CreateUserRequest, UpdateUserRequest, UserListResponse, UserResponse};
use crate::errors::ErrorResponse;

/// OpenAPI documentation for the user API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User API",
        version = "0.1.0",
        description = "CRUD service for user accounts"
    ),
    servers(
        (url = "/", description = "Unversioned routes"),
        (url = "/api/v1", description = "Versioned routes")
    ),
    paths(
        health_handler::health_check,
        user_handler::list_users,
        user_handler::get_user,
        user_handler::create_user,
        user_handler::update_user,
        user_handler::delete_user,
    ),
    components(
        schemas(
            UserResponse,
            UserListResponse,
            CreateUserRequest,
            UpdateUserRequest,
            ErrorResponse,
            health_handler::HealthResponse,
        )
    ),
    tags(
        (name = "Users", description = "User management operations"),
        (name = "Health", description = "Service liveness")
    )
)]
pub struct ApiDoc;
