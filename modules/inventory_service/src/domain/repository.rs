//! Persistence traits for the inventory service.
//!
//! Implemented by SeaORM repositories in `infra::storage` and by
//! in-memory mocks in tests. All list methods take a 1-based `page`
//! and return the page plus the total match count, newest first.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::contract::model::{
    Group, GroupFilter, GroupUpdate, Invoice, InvoiceFilter, Item, ItemFilter, ItemUpdate,
    MonthlySale, NewGroup, NewInvoice, NewItem, PurchaseSummary, Shop, ShopFilter, ShopSales,
    TopSellingItem,
};

/// Half-open UTC window `[start, end)` for report queries.
pub type DateRange = (DateTime<Utc>, DateTime<Utc>);

#[async_trait]
pub trait GroupRepository: Send + Sync {
    async fn create(&self, new_group: &NewGroup, created_by: Option<i64>) -> Result<Group>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Group>>;

    async fn name_exists(&self, name: &str, exclude_id: Option<i64>) -> Result<bool>;

    /// `Ok(None)` when the group does not exist.
    async fn update(&self, id: i64, changes: &GroupUpdate) -> Result<Option<Group>>;

    /// `Ok(false)` when the group does not exist.
    async fn delete(&self, id: i64) -> Result<bool>;

    async fn list(
        &self,
        filter: &GroupFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<Group>, u64)>;
}

#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Insert with `remaining = total`, then assign the zero-padded id
    /// as the item code, all in one transaction.
    async fn create(&self, new_item: &NewItem, created_by: Option<i64>) -> Result<Item>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Item>>;

    /// Never touches `remaining` or `code`. `Ok(None)` when the item
    /// does not exist.
    async fn update(&self, id: i64, changes: &ItemUpdate) -> Result<Option<Item>>;

    async fn delete(&self, id: i64) -> Result<bool>;

    async fn list(&self, filter: &ItemFilter, page: u64, per_page: u64)
        -> Result<(Vec<Item>, u64)>;
}

#[async_trait]
pub trait ShopRepository: Send + Sync {
    async fn create(&self, name: &str, created_by: Option<i64>) -> Result<Shop>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Shop>>;

    async fn name_exists(&self, name: &str, exclude_id: Option<i64>) -> Result<bool>;

    async fn rename(&self, id: i64, name: &str) -> Result<Option<Shop>>;

    async fn delete(&self, id: i64) -> Result<bool>;

    async fn list(&self, filter: &ShopFilter, page: u64, per_page: u64)
        -> Result<(Vec<Shop>, u64)>;
}

#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Create the invoice and all of its lines in one transaction: for
    /// every line, snapshot the item name/code, compute the amount and
    /// decrement stock. The first shortfall fails the whole invoice
    /// with `InventoryError::InsufficientStock` and rolls back.
    async fn create(&self, new_invoice: &NewInvoice, created_by: Option<i64>) -> Result<Invoice>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Invoice>>;

    /// Cascades to the invoice lines. Stock is not restored.
    async fn delete(&self, id: i64) -> Result<bool>;

    async fn list(
        &self,
        filter: &InvoiceFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<Invoice>, u64)>;
}

#[async_trait]
pub trait ReportsRepository: Send + Sync {
    /// Dashboard counters: (items with `remaining > 0`, groups, shops).
    async fn counts(&self) -> Result<(u64, u64, u64)>;

    /// Items ranked by units sold inside `range` (lifetime when
    /// `None`), descending. Items with no sales count as 0.
    async fn top_selling(
        &self,
        range: Option<DateRange>,
        limit: u64,
    ) -> Result<Vec<TopSellingItem>>;

    /// Per-shop revenue (sum of line amounts), descending.
    async fn sales_by_shop(&self, range: Option<DateRange>) -> Result<Vec<ShopSales>>;

    /// Per-shop revenue bucketed by calendar month of the sale.
    async fn monthly_sales(&self, range: Option<DateRange>) -> Result<Vec<MonthlySale>>;

    /// Revenue and unit totals over all invoice lines.
    async fn purchase_totals(&self, range: Option<DateRange>) -> Result<PurchaseSummary>;
}
