//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// User domain entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User creation request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    /// User display name
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    #[schema(example = "John Doe", min_length = 2, max_length = 100)]
    pub name: String,
    /// User email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "john@example.com")]
    pub email: String,
    /// User password (minimum 6 characters)
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    #[schema(example = "password123", min_length = 6)]
    pub password: String,
}

/// Partial user update. Absent or empty fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    /// New display name
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    #[schema(example = "Jane Doe", min_length = 2, max_length = 100)]
    pub name: Option<String>,
    /// New email address
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "jane@example.com")]
    pub email: Option<String>,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

/// User response (safe to return to client)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    /// Unique user identifier
    #[schema(example = 1)]
    pub id: i64,
    /// User display name
    #[schema(example = "John Doe")]
    pub name: String,
    /// User email address
    #[schema(example = "john@example.com")]
    pub email: String,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// One page of users plus the information needed to page further
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
    /// Total number of users in the store
    #[schema(example = 42)]
    pub total: u64,
    /// Effective page number (1-indexed)
    #[schema(example = 1)]
    pub page: u64,
    /// Effective page size
    #[schema(example = 10)]
    pub limit: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        let now = Utc::now();
        User {
            id: 7,
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_response_omits_password_hash() {
        let json = serde_json::to_value(UserResponse::from(sample_user())).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["name"], "John Doe");
        assert!(json.get("created_at").is_some());
        assert!(json.get("updated_at").is_some());
        assert!(json.get("password").is_none());
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_create_request_rules() {
        let valid = CreateUserRequest {
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(valid.validate().is_ok());

        let short_name = CreateUserRequest {
            name: "J".to_string(),
            ..valid.clone()
        };
        assert!(short_name.validate().is_err());

        let long_name = CreateUserRequest {
            name: "x".repeat(101),
            ..valid.clone()
        };
        assert!(long_name.validate().is_err());

        let bad_email = CreateUserRequest {
            email: "not-an-email".to_string(),
            ..valid.clone()
        };
        assert!(bad_email.validate().is_err());

        let short_password = CreateUserRequest {
            password: "12345".to_string(),
            ..valid
        };
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn test_update_request_treats_empty_strings_as_absent() {
        let req: UpdateUserRequest =
            serde_json::from_str(r#"{"name":"","email":""}"#).unwrap();
        assert_eq!(req.name, None);
        assert_eq!(req.email, None);
        assert!(req.validate().is_ok());

        let req: UpdateUserRequest = serde_json::from_str("{}").unwrap();
        assert!(req.name.is_none() && req.email.is_none());
    }

    #[test]
    fn test_update_request_validates_present_fields() {
        let req: UpdateUserRequest = serde_json::from_str(r#"{"name":"J"}"#).unwrap();
        assert!(req.validate().is_err());

        let req: UpdateUserRequest = serde_json::from_str(r#"{"email":"nope"}"#).unwrap();
        assert!(req.validate().is_err());

        let req: UpdateUserRequest =
            serde_json::from_str(r#"{"name":"Jane Doe","email":"jane@example.com"}"#).unwrap();
        assert!(req.validate().is_ok());
    }
}
