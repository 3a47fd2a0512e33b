//! Domain layer - business logic and persistence traits.

pub mod password;
pub mod repository;
pub mod service;
pub mod token;

pub use repository::{ActivityRepository, UserRepository};
pub use service::Service;
pub use token::{Claims, TokenCodec};
