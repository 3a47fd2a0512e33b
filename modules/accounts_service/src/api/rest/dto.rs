//! REST DTOs with serde derives for HTTP API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ===== User DTOs =====

/// User response DTO. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserDto {
    pub id: i64,

    #[schema(example = "jane@example.com")]
    pub email: String,

    pub fullname: String,

    /// One of "admin", "creator", "sale"
    #[schema(example = "sale")]
    pub role: String,

    pub is_superuser: bool,

    pub is_active: bool,

    pub last_login: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// User creation request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub email: String,

    pub fullname: String,

    /// One of "admin", "creator", "sale"
    #[schema(example = "sale")]
    pub role: String,
}

/// Login request
///
/// With `is_new_user` set the request probes the first-login state
/// instead of authenticating; `password` may then be omitted.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,

    pub password: Option<String>,

    #[serde(default)]
    pub is_new_user: bool,
}

/// Login response: either a bearer token or, for accounts still in
/// first-login setup, the user id to feed into the password update.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(untagged)]
pub enum LoginResponse {
    Token { access: String },
    PasswordSetup { user_id: i64 },
}

/// Password update request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdatePasswordRequest {
    pub user_id: i64,

    pub password: String,
}

/// Plain confirmation message
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "User created successfully!")]
    pub success: String,
}

// ===== Activity DTOs =====

/// Activity trail entry DTO
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserActivityDto {
    pub id: i64,

    /// Null when the user row has since been deleted
    pub user_id: Option<i64>,

    pub email: String,

    pub fullname: String,

    #[schema(example = "logged in")]
    pub action: String,

    pub created_at: DateTime<Utc>,
}
