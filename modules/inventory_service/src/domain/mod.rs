//! Domain layer - business logic and persistence traits.

pub mod csv;
pub mod repository;
pub mod service;

pub use repository::{
    DateRange, GroupRepository, InvoiceRepository, ItemRepository, ReportsRepository,
    ShopRepository,
};
pub use service::Service;
