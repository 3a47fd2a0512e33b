//! Typed errors for the inventory service.

use thiserror::Error;

/// Errors surfaced by inventory operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    #[error("{resource} with name '{name}' already exists")]
    NameTaken { resource: &'static str, name: String },

    /// An invoice line asked for more units than are on hand. Fails the
    /// whole invoice.
    #[error("Item with code {code} does not have enough quantity!")]
    InsufficientStock {
        code: String,
        requested: i64,
        remaining: i64,
    },

    #[error("validation failed: {message}")]
    Validation { message: String },

    #[error("internal error: {message}")]
    Internal { message: String },
}

impl InventoryError {
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        InventoryError::NotFound {
            resource,
            id: id.into(),
        }
    }

    pub fn name_taken(resource: &'static str, name: impl Into<String>) -> Self {
        InventoryError::NameTaken {
            resource,
            name: name.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        InventoryError::Validation {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        InventoryError::Internal {
            message: message.into(),
        }
    }
}
