//! Inventory service.
//!
//! Owns inventory groups, items (with stock tracking and server-assigned
//! codes), shops, invoices, the reporting queries behind the dashboard,
//! and bulk CSV import. Mutations append to the accounts module's user
//! activity trail through its contract client.

pub mod contract;

pub use contract::error::InventoryError;
pub use contract::model::{
    Group, InventorySummary, Invoice, InvoiceLine, Item, MonthlySale, PurchaseSummary, Shop,
    ShopSales, TopSellingItem,
};

// Implementation details, exposed for the server binary and tests.
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
