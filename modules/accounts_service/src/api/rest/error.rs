//! HTTP error mapping to RFC-9457 Problem Details

use axum::http::StatusCode;
use stockroom_rest::Problem;

use crate::contract::error::AccountsError;

/// Map accounts errors to HTTP Problem Details
pub fn map_domain_error(error: AccountsError) -> Problem {
    match error {
        AccountsError::NotFound { resource, id } => {
            Problem::new(StatusCode::NOT_FOUND, format!("{} Not Found", resource))
                .with_detail(format!("{} with id '{}' was not found", resource, id))
        }

        AccountsError::EmailTaken { email } => {
            Problem::new(StatusCode::CONFLICT, "Email Already Registered")
                .with_detail(format!("user with email '{}' already exists", email))
        }

        err @ AccountsError::PasswordAlreadySet => {
            Problem::new(StatusCode::BAD_REQUEST, "Password Already Set")
                .with_detail(err.to_string())
        }

        err @ AccountsError::InvalidCredentials => {
            Problem::new(StatusCode::BAD_REQUEST, "Login Failed").with_detail(err.to_string())
        }

        AccountsError::InvalidToken => {
            Problem::unauthorized("invalid or expired access token")
        }

        AccountsError::Validation { message } => {
            Problem::new(StatusCode::BAD_REQUEST, "Validation Error").with_detail(message)
        }

        AccountsError::Internal { .. } => Problem::internal(),
    }
}
