//! HTTP error mapping to RFC-9457 Problem Details

use axum::http::StatusCode;
use stockroom_rest::Problem;

use crate::contract::error::InventoryError;

/// Map inventory errors to HTTP Problem Details
pub fn map_domain_error(error: InventoryError) -> Problem {
    match error {
        InventoryError::NotFound { resource, id } => {
            Problem::new(StatusCode::NOT_FOUND, format!("{} Not Found", resource))
                .with_detail(format!("{} with id '{}' was not found", resource, id))
        }

        InventoryError::NameTaken { resource, name } => {
            Problem::new(StatusCode::CONFLICT, "Name Already Taken")
                .with_detail(format!("{} with name '{}' already exists", resource, name))
        }

        err @ InventoryError::InsufficientStock { .. } => {
            Problem::new(StatusCode::BAD_REQUEST, "Insufficient Stock").with_detail(err.to_string())
        }

        InventoryError::Validation { message } => {
            Problem::new(StatusCode::BAD_REQUEST, "Validation Error").with_detail(message)
        }

        InventoryError::Internal { .. } => Problem::internal(),
    }
}

/// A rejected date-range query
pub fn invalid_date_range(message: String) -> Problem {
    Problem::new(StatusCode::BAD_REQUEST, "Validation Error").with_detail(message)
}
