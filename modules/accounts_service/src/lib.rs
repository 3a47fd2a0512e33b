//! Accounts service.
//!
//! Owns user records, bearer-token authentication, and the user activity
//! trail that other modules append to. The public surface is the
//! [`contract`] layer; HTTP routes live under `api::rest` and are mounted
//! by the server binary.

pub mod contract;

pub use contract::client::AccountsApi;
pub use contract::error::AccountsError;
pub use contract::model::{
    LoginOutcome, NewActivity, NewUser, User, UserActivity, UserRole,
};

// Implementation details, exposed for the server binary and tests.
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;

pub use api::rest::extract::{AuthState, CurrentUser};
