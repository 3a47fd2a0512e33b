//! SeaORM-backed storage for the inventory tables

pub mod entity;
pub mod mapper;
pub mod migrations;
pub mod reports;
pub mod repositories;

pub use migrations::Migrator;
pub use reports::SeaOrmReportsRepository;
pub use repositories::{
    SeaOrmGroupRepository, SeaOrmInvoiceRepository, SeaOrmItemRepository, SeaOrmShopRepository,
};
