//! Public contract of the accounts service.
//!
//! Everything other modules may depend on lives here: plain domain
//! models, the typed error enum, and the [`client::AccountsApi`] trait.
//! No persistence or HTTP types leak through this layer.

pub mod client;
pub mod error;
pub mod model;
