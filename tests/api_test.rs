//! Integration tests for API endpoints.
//!
//! Requests go through the real router, service and repository against an
//! in-memory SQLite database.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use user_api::api::{create_router, AppState};
use user_api::config::RateLimitConfig;
use user_api::domain::{UserListResponse, UserResponse};
use user_api::errors::{AppError, AppResult};
use user_api::services::UserService;

// =============================================================================
// Helpers
// =============================================================================

async fn app() -> Router {
    let db = common::sqlite_database().await;
    create_router(AppState::from_database(&db, common::test_config()))
}

struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Value,
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    send_request(app, builder.body(body).unwrap()).await
}

async fn send_request(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

fn john() -> Value {
    json!({
        "name": "John Doe",
        "email": "john@example.com",
        "password": "password123"
    })
}

async fn create(app: &Router, name: &str, email: &str) -> UserResponse {
    let res = send(
        app,
        Method::POST,
        "/users",
        Some(json!({ "name": name, "email": email, "password": "password123" })),
    )
    .await;
    assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
    serde_json::from_value(res.body).unwrap()
}

fn assert_error(res: &TestResponse, status: StatusCode, code: &str) {
    assert_eq!(res.status, status, "{}", res.body);
    assert_eq!(res.body["error"], code);
    assert_eq!(res.body["code"], status.as_u16());
    assert!(res.body["message"].is_string());
}

// =============================================================================
// Health & docs
// =============================================================================

#[tokio::test]
async fn test_health() {
    let app = app().await;

    let res = send(&app, Method::GET, "/health", None).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!({ "status": "ok", "service": "user-api" }));
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = app().await;

    let res = send(&app, Method::GET, "/api-docs/openapi.json", None).await;

    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body["paths"]["/users/{id}"].is_object());
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_create_user_then_duplicate_conflicts() {
    let app = app().await;

    let res = send(&app, Method::POST, "/users", Some(john())).await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert!(res.body["id"].as_i64().is_some());
    assert_eq!(res.body["name"], "John Doe");
    assert_eq!(res.body["email"], "john@example.com");
    assert!(res.body["created_at"].is_string());
    assert!(res.body["updated_at"].is_string());
    assert!(res.body.get("password").is_none());
    assert!(res.body.get("password_hash").is_none());

    let again = send(&app, Method::POST, "/users", Some(john())).await;
    assert_error(&again, StatusCode::CONFLICT, "email_exists");
    assert_eq!(again.body["message"], "Email already exists");
}

#[tokio::test]
async fn test_duplicate_email_conflicts_regardless_of_other_fields() {
    let app = app().await;
    create(&app, "John Doe", "john@example.com").await;

    let res = send(
        &app,
        Method::POST,
        "/users",
        Some(json!({
            "name": "Someone Else",
            "email": "john@example.com",
            "password": "another-password"
        })),
    )
    .await;

    assert_error(&res, StatusCode::CONFLICT, "email_exists");
}

#[tokio::test]
async fn test_create_rejects_malformed_body() {
    let app = app().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/users")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let res = send_request(&app, request).await;

    assert_error(&res, StatusCode::BAD_REQUEST, "invalid_request");
    assert_eq!(res.body["message"], "Invalid request body");
}

#[tokio::test]
async fn test_create_rejects_missing_fields() {
    let app = app().await;

    let res = send(&app, Method::POST, "/users", Some(json!({ "name": "John Doe" }))).await;

    assert_error(&res, StatusCode::BAD_REQUEST, "invalid_request");
}

#[tokio::test]
async fn test_create_validation_errors() {
    let app = app().await;

    let res = send(
        &app,
        Method::POST,
        "/users",
        Some(json!({ "name": "John Doe", "email": "john@example.com", "password": "12345" })),
    )
    .await;
    assert_error(&res, StatusCode::BAD_REQUEST, "validation_error");
    assert_eq!(res.body["message"], "Password must be at least 6 characters");

    let res = send(
        &app,
        Method::POST,
        "/users",
        Some(json!({ "name": "J", "email": "nope", "password": "password123" })),
    )
    .await;
    assert_error(&res, StatusCode::BAD_REQUEST, "validation_error");
    let message = res.body["message"].as_str().unwrap();
    assert!(message.contains("Invalid email format"));
    assert!(message.contains("Name must be between 2 and 100 characters"));
}

// =============================================================================
// Read
// =============================================================================

#[tokio::test]
async fn test_get_missing_user() {
    let app = app().await;

    let res = send(&app, Method::GET, "/users/999999", None).await;

    assert_error(&res, StatusCode::NOT_FOUND, "user_not_found");
    assert_eq!(res.body["message"], "User not found");
}

#[tokio::test]
async fn test_get_user_by_id() {
    let app = app().await;
    let created = create(&app, "John Doe", "john@example.com").await;

    let res = send(&app, Method::GET, &format!("/users/{}", created.id), None).await;

    assert_eq!(res.status, StatusCode::OK);
    let fetched: UserResponse = serde_json::from_value(res.body).unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_invalid_id_is_rejected() {
    let app = app().await;

    for uri in ["/users/abc", "/users/-1", "/users/1.5"] {
        let res = send(&app, Method::GET, uri, None).await;
        assert_error(&res, StatusCode::BAD_REQUEST, "invalid_id");
    }

    let res = send(&app, Method::DELETE, "/users/abc", None).await;
    assert_error(&res, StatusCode::BAD_REQUEST, "invalid_id");

    let res = send(&app, Method::PUT, "/users/abc", Some(json!({ "name": "Jane" }))).await;
    assert_error(&res, StatusCode::BAD_REQUEST, "invalid_id");
}

#[tokio::test]
async fn test_list_users_pagination() {
    let app = app().await;
    for i in 1..=12 {
        create(&app, &format!("User {i}"), &format!("user{i}@example.com")).await;
    }

    let res = send(&app, Method::GET, "/users?page=2&limit=5", None).await;
    assert_eq!(res.status, StatusCode::OK);
    let page: UserListResponse = serde_json::from_value(res.body).unwrap();
    assert_eq!(page.total, 12);
    assert_eq!(page.page, 2);
    assert_eq!(page.limit, 5);
    assert_eq!(page.users.len(), 5);
    assert_eq!(page.users[0].email, "user6@example.com");
}

#[tokio::test]
async fn test_list_users_clamps_parameters() {
    let app = app().await;
    create(&app, "John Doe", "john@example.com").await;

    let zero = send(&app, Method::GET, "/users?page=0&limit=0", None).await;
    let default = send(&app, Method::GET, "/users?page=1&limit=10", None).await;
    assert_eq!(zero.status, StatusCode::OK);
    assert_eq!(zero.body, default.body);
    assert_eq!(zero.body["page"], 1);
    assert_eq!(zero.body["limit"], 10);

    let large = send(&app, Method::GET, "/users?limit=500", None).await;
    assert_eq!(large.body["limit"], 10);

    let junk = send(&app, Method::GET, "/users?page=abc&limit=xyz", None).await;
    assert_eq!(junk.status, StatusCode::OK);
    assert_eq!(junk.body["page"], 1);
    assert_eq!(junk.body["limit"], 10);
    assert_eq!(junk.body["total"], 1);
}

#[tokio::test]
async fn test_list_users_far_past_last_page() {
    let app = app().await;
    create(&app, "John Doe", "john@example.com").await;

    for uri in [
        "/users?page=9223372036854775807&limit=10",
        "/users?page=1000000000000000000&limit=100",
    ] {
        let res = send(&app, Method::GET, uri, None).await;
        assert_eq!(res.status, StatusCode::OK, "{uri}");
        assert_eq!(res.body["users"].as_array().map(Vec::len), Some(0));
        assert_eq!(res.body["total"], 1);
    }
}

#[tokio::test]
async fn test_versioned_routes() {
    let app = app().await;

    let res = send(&app, Method::POST, "/api/v1/users", Some(john())).await;
    assert_eq!(res.status, StatusCode::CREATED);
    let id = res.body["id"].as_i64().unwrap();

    let res = send(&app, Method::GET, &format!("/users/{id}"), None).await;
    assert_eq!(res.status, StatusCode::OK);

    let res = send(&app, Method::GET, "/api/v1/users", None).await;
    assert_eq!(res.body["total"], 1);
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn test_update_user() {
    let app = app().await;
    let created = create(&app, "John Doe", "john@example.com").await;
    let uri = format!("/users/{}", created.id);

    let res = send(&app, Method::PUT, &uri, Some(json!({ "name": "Johnny" }))).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["name"], "Johnny");
    assert_eq!(res.body["email"], "john@example.com");

    // Empty strings leave fields untouched
    let res = send(&app, Method::PUT, &uri, Some(json!({ "name": "", "email": "" }))).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["name"], "Johnny");

    // Own email is not a conflict
    let res = send(&app, Method::PUT, &uri, Some(json!({ "email": "john@example.com" }))).await;
    assert_eq!(res.status, StatusCode::OK);

    let updated: UserResponse = serde_json::from_value(res.body).unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_at, created.created_at);
}

#[tokio::test]
async fn test_update_conflicts_and_missing() {
    let app = app().await;
    let john = create(&app, "John Doe", "john@example.com").await;
    create(&app, "Jane Doe", "jane@example.com").await;

    let res = send(
        &app,
        Method::PUT,
        &format!("/users/{}", john.id),
        Some(json!({ "email": "jane@example.com" })),
    )
    .await;
    assert_error(&res, StatusCode::CONFLICT, "email_exists");

    let res = send(&app, Method::PUT, "/users/999999", Some(json!({ "name": "Ghost" }))).await;
    assert_error(&res, StatusCode::NOT_FOUND, "user_not_found");

    let res = send(
        &app,
        Method::PUT,
        &format!("/users/{}", john.id),
        Some(json!({ "email": "not-an-email" })),
    )
    .await;
    assert_error(&res, StatusCode::BAD_REQUEST, "validation_error");
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_delete_user() {
    let app = app().await;
    let created = create(&app, "John Doe", "john@example.com").await;
    let uri = format!("/users/{}", created.id);

    let res = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(res.status, StatusCode::NO_CONTENT);
    assert_eq!(res.body, Value::Null);

    let res = send(&app, Method::GET, &uri, None).await;
    assert_error(&res, StatusCode::NOT_FOUND, "user_not_found");

    let res = send(&app, Method::DELETE, &uri, None).await;
    assert_error(&res, StatusCode::NOT_FOUND, "user_not_found");
}

// =============================================================================
// Middleware
// =============================================================================

#[tokio::test]
async fn test_request_id_is_generated_and_propagated() {
    let app = app().await;

    let res = send(&app, Method::GET, "/health", None).await;
    assert!(res.headers.contains_key("x-request-id"));

    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "req-123")
        .body(Body::empty())
        .unwrap();
    let res = send_request(&app, request).await;
    assert_eq!(res.headers["x-request-id"], "req-123");
}

#[tokio::test]
async fn test_rate_limit_applies_to_user_routes() {
    let db = common::sqlite_database().await;
    let mut config = common::test_config();
    config.rate_limit = RateLimitConfig {
        requests: 2,
        window_seconds: 60,
    };
    let app = create_router(AppState::from_database(&db, config));

    for _ in 0..2 {
        let res = send(&app, Method::GET, "/users", None).await;
        assert_eq!(res.status, StatusCode::OK);
    }

    let res = send(&app, Method::GET, "/users", None).await;
    assert_eq!(res.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(res.body["error"], "rate_limit_exceeded");
    assert_eq!(res.body["message"], "Too many requests");
    assert!(res.headers.contains_key("retry-after"));

    // Other clients and unlimited routes are unaffected
    let request = Request::builder()
        .uri("/users")
        .header("x-forwarded-for", "203.0.113.9")
        .body(Body::empty())
        .unwrap();
    assert_eq!(send_request(&app, request).await.status, StatusCode::OK);

    let res = send(&app, Method::GET, "/health", None).await;
    assert_eq!(res.status, StatusCode::OK);
}

// =============================================================================
// Infrastructure failures
// =============================================================================

/// Service whose storage is always down
struct UnavailableService;

#[async_trait]
impl UserService for UnavailableService {
    async fn create_user(&self, _: String, _: String, _: String) -> AppResult<UserResponse> {
        Err(AppError::internal("Failed to create user"))
    }

    async fn get_user(&self, _: i64) -> AppResult<UserResponse> {
        Err(AppError::internal("Failed to get user"))
    }

    async fn list_users(&self, _: i64, _: i64) -> AppResult<UserListResponse> {
        Err(AppError::internal("Failed to get users"))
    }

    async fn update_user(
        &self,
        _: i64,
        _: Option<String>,
        _: Option<String>,
    ) -> AppResult<UserResponse> {
        Err(AppError::internal("Failed to update user"))
    }

    async fn delete_user(&self, _: i64) -> AppResult<()> {
        Err(AppError::internal("Failed to delete user"))
    }
}

#[tokio::test]
async fn test_infrastructure_errors_are_generic() {
    let state = AppState::new(Arc::new(UnavailableService), common::test_config());
    let app = create_router(state);

    let res = send(&app, Method::GET, "/users", None).await;
    assert_error(&res, StatusCode::INTERNAL_SERVER_ERROR, "internal_server_error");
    assert_eq!(res.body["message"], "Failed to get users");

    let res = send(&app, Method::POST, "/users", Some(john())).await;
    assert_error(&res, StatusCode::INTERNAL_SERVER_ERROR, "internal_server_error");
    assert_eq!(res.body["message"], "Failed to create user");

    let res = send(&app, Method::DELETE, "/users/1", None).await;
    assert_eq!(res.body["message"], "Failed to delete user");
}
