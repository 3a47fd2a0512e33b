//! Public contract of the inventory service.
//!
//! Plain domain models and the typed error enum. The inventory module
//! has no in-process consumers, so unlike the accounts contract there
//! is no client trait here; everything is reached over REST.

pub mod error;
pub mod model;
