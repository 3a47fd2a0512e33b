//! Domain models for the accounts service.
//!
//! NO serde derives here - these are pure domain types. Wire formats
//! live in `api::rest::dto` and are mapped explicitly.

use chrono::{DateTime, Utc};

/// An account holder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    /// Unique login identifier.
    pub email: String,
    pub fullname: String,
    pub role: UserRole,
    /// `None` until the user completes first-login password setup.
    pub password_hash: Option<String>,
    /// Superusers are hidden from regular user listings.
    pub is_superuser: bool,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Coarse permission tier of a [`User`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    Admin,
    Creator,
    Sale,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Creator => "creator",
            UserRole::Sale => "sale",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(UserRole::Admin),
            "creator" => Some(UserRole::Creator),
            "sale" => Some(UserRole::Sale),
            _ => None,
        }
    }
}

/// Input for creating a [`User`]. Passwords are never part of creation;
/// they are set through the first-login flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub fullname: String,
    pub role: UserRole,
}

/// One entry in the audit trail.
///
/// Email and fullname are denormalized so the entry stays readable even
/// after the user row is deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserActivity {
    pub id: i64,
    pub user_id: Option<i64>,
    pub email: String,
    pub fullname: String,
    pub action: String,
    pub created_at: DateTime<Utc>,
}

/// Input for appending a [`UserActivity`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActivity {
    pub user_id: Option<i64>,
    pub email: String,
    pub fullname: String,
    pub action: String,
}

/// Result of a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Credentials checked out; a bearer token was issued.
    Authenticated { user: User, access_token: String },
    /// First-login probe: the account exists but has no password yet,
    /// so the caller should proceed to password setup.
    PasswordSetupRequired { user_id: i64 },
}
