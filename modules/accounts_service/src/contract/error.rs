//! Typed errors for the accounts service.

use thiserror::Error;

/// Errors surfaced by accounts operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountsError {
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    #[error("user with email '{email}' already exists")]
    EmailTaken { email: String },

    /// First-login probe hit an account that already completed setup.
    #[error("User has password already!")]
    PasswordAlreadySet,

    /// Deliberately vague: never reveals whether the email exists.
    #[error("Invalid email or password!")]
    InvalidCredentials,

    #[error("invalid or expired access token")]
    InvalidToken,

    #[error("validation failed: {message}")]
    Validation { message: String },

    #[error("internal error: {message}")]
    Internal { message: String },
}

impl AccountsError {
    pub fn user_not_found(id: impl Into<String>) -> Self {
        AccountsError::NotFound {
            resource: "user",
            id: id.into(),
        }
    }

    pub fn email_taken(email: impl Into<String>) -> Self {
        AccountsError::EmailTaken {
            email: email.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        AccountsError::Validation {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AccountsError::Internal {
            message: message.into(),
        }
    }
}
