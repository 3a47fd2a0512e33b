//! Domain models for the inventory service.
//!
//! NO serde derives here - these are pure domain types. Wire formats
//! live in `api::rest::dto` and are mapped explicitly.

use chrono::{DateTime, NaiveDate, Utc};

/// A category of inventory items. Groups may nest one level at a time
/// through `belongs_to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: i64,
    /// Nulled when the creating user is deleted.
    pub created_by: Option<i64>,
    pub name: String,
    /// Parent group; nulled when the parent is deleted.
    pub belongs_to: Option<i64>,
    /// Number of items currently assigned to this group.
    pub total_items: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A stocked product.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: i64,
    pub created_by: Option<i64>,
    /// Server-assigned after insert: the id zero-padded to at least six
    /// digits. Unique and never reassigned.
    pub code: Option<String>,
    pub photo_url: Option<String>,
    pub group_id: Option<i64>,
    /// Units ever stocked.
    pub total: i64,
    /// Units still on hand; initialized to `total` and decremented by
    /// sales. Never client-writable.
    pub remaining: Option<i64>,
    pub name: String,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A point of sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shop {
    pub id: i64,
    pub created_by: Option<i64>,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A sales receipt with its line items.
#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    pub id: i64,
    pub created_by: Option<i64>,
    pub shop_id: Option<i64>,
    /// Resolved on read; `None` when the shop has been deleted.
    pub shop_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub items: Vec<InvoiceLine>,
}

/// One line of an invoice. Name, code and amount are snapshots taken at
/// sale time so receipts survive later item changes.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceLine {
    pub id: i64,
    pub invoice_id: i64,
    pub item_id: Option<i64>,
    pub item_name: Option<String>,
    pub item_code: Option<String>,
    pub quantity: i64,
    /// `quantity` times the unit price at sale time.
    pub amount: Option<f64>,
    pub created_at: DateTime<Utc>,
}

// ===== Inputs =====

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGroup {
    pub name: String,
    pub belongs_to: Option<i64>,
}

/// Partial update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupUpdate {
    pub name: Option<String>,
    pub belongs_to: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub name: String,
    pub group_id: Option<i64>,
    pub total: i64,
    pub price: f64,
    pub photo_url: Option<String>,
}

/// Partial update; `None` fields are left unchanged. `remaining` and
/// `code` are deliberately absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemUpdate {
    pub name: Option<String>,
    pub group_id: Option<i64>,
    pub total: Option<i64>,
    pub price: Option<f64>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvoice {
    pub shop_id: Option<i64>,
    pub lines: Vec<NewInvoiceLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewInvoiceLine {
    pub item_id: i64,
    pub quantity: i64,
}

// ===== List filters =====

#[derive(Debug, Clone, Default)]
pub struct GroupFilter {
    /// Case-insensitive substring over group name and creator
    /// fullname/email.
    pub keyword: Option<String>,
    pub belongs_to: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    /// Case-insensitive substring over item name, code, group name and
    /// creator fullname/email.
    pub keyword: Option<String>,
    pub group_id: Option<i64>,
    pub code: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ShopFilter {
    pub keyword: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct InvoiceFilter {
    /// Case-insensitive substring over shop name and creator
    /// fullname/email.
    pub keyword: Option<String>,
    pub shop_id: Option<i64>,
}

// ===== Reports =====

/// Dashboard counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventorySummary {
    /// Items with stock on hand (`remaining > 0`).
    pub total_inventory: u64,
    pub total_group: u64,
    pub total_shop: u64,
    /// Non-superuser accounts, from the accounts contract.
    pub total_users: u64,
}

/// One row of the top-selling report.
#[derive(Debug, Clone, PartialEq)]
pub struct TopSellingItem {
    pub id: i64,
    pub name: String,
    pub code: Option<String>,
    pub price: f64,
    /// Units sold in the requested window; 0 for items never sold.
    pub sold: i64,
}

/// One row of the sales-by-shop report.
#[derive(Debug, Clone, PartialEq)]
pub struct ShopSales {
    pub id: i64,
    pub name: String,
    /// Sum of invoice line amounts over the shop's sales.
    pub amount_total: f64,
}

/// One row of the monthly sales-by-shop report.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySale {
    /// First day of the sale month.
    pub month: NaiveDate,
    pub name: String,
    pub amount_total: f64,
}

/// Totals over all invoice lines in the requested window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PurchaseSummary {
    pub amount_total: f64,
    pub count: i64,
}
