//! REST DTOs with serde derives for HTTP API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ===== Group DTOs =====

/// Inventory group response DTO
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GroupDto {
    pub id: i64,

    /// Null when the creating user has since been deleted
    pub created_by: Option<i64>,

    #[schema(example = "Electronics")]
    pub name: String,

    /// Parent group id, if any
    pub belongs_to: Option<i64>,

    /// Number of items currently in this group
    pub total_items: i64,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Group creation request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateGroupRequest {
    #[schema(example = "Electronics")]
    pub name: String,

    pub belongs_to: Option<i64>,
}

/// Group update request; omitted fields are left unchanged
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateGroupRequest {
    pub name: Option<String>,

    pub belongs_to: Option<i64>,
}

// ===== Item DTOs =====

/// Inventory item response DTO
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ItemDto {
    pub id: i64,

    pub created_by: Option<i64>,

    /// Server-assigned stock code
    #[schema(example = "000042")]
    pub code: Option<String>,

    pub photo_url: Option<String>,

    pub group_id: Option<i64>,

    /// Units ever stocked
    pub total: i64,

    /// Units still on hand
    pub remaining: Option<i64>,

    #[schema(example = "Wireless keyboard")]
    pub name: String,

    pub price: f64,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Item creation request. `remaining` and `code` are server-managed
/// and cannot be supplied.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateItemRequest {
    #[schema(example = "Wireless keyboard")]
    pub name: String,

    pub group_id: Option<i64>,

    /// Units stocked; also the starting `remaining`
    pub total: i64,

    pub price: f64,

    pub photo_url: Option<String>,
}

/// Item update request; omitted fields are left unchanged
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateItemRequest {
    pub name: Option<String>,

    pub group_id: Option<i64>,

    pub total: Option<i64>,

    pub price: Option<f64>,

    pub photo_url: Option<String>,
}

// ===== Shop DTOs =====

/// Shop response DTO
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ShopDto {
    pub id: i64,

    pub created_by: Option<i64>,

    #[schema(example = "Downtown branch")]
    pub name: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Shop creation and rename request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ShopRequest {
    #[schema(example = "Downtown branch")]
    pub name: String,
}

// ===== Invoice DTOs =====

/// Invoice response DTO with its nested line items
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InvoiceDto {
    pub id: i64,

    pub created_by: Option<i64>,

    pub shop_id: Option<i64>,

    /// Null when the shop has since been deleted
    pub shop_name: Option<String>,

    pub created_at: DateTime<Utc>,

    pub items: Vec<InvoiceItemDto>,
}

/// One invoice line. Name, code and amount are sale-time snapshots.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InvoiceItemDto {
    pub id: i64,

    /// Null when the item has since been deleted
    pub item_id: Option<i64>,

    pub item_name: Option<String>,

    pub item_code: Option<String>,

    pub quantity: i64,

    /// Quantity times the unit price at sale time
    pub amount: Option<f64>,

    pub created_at: DateTime<Utc>,
}

/// Invoice creation request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateInvoiceRequest {
    pub shop_id: Option<i64>,

    pub items: Vec<CreateInvoiceItem>,
}

/// One requested invoice line
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateInvoiceItem {
    pub item_id: i64,

    pub quantity: i64,
}

// ===== List filter query params =====

/// Extra query params accepted by the group list endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroupFilterQuery {
    /// Case-insensitive substring over name and creator fields
    pub keyword: Option<String>,

    pub belongs_to: Option<i64>,
}

/// Extra query params accepted by the item list endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemFilterQuery {
    pub keyword: Option<String>,

    pub group_id: Option<i64>,

    /// Exact code match
    pub code: Option<String>,
}

/// Extra query params accepted by the shop list endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShopFilterQuery {
    pub keyword: Option<String>,
}

/// Extra query params accepted by the invoice list endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoiceFilterQuery {
    pub keyword: Option<String>,

    pub shop_id: Option<i64>,
}

/// `?monthly=` switch on the sale-by-shop endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaleByShopQuery {
    /// Non-empty requests per-month buckets
    pub monthly: Option<String>,
}

// ===== Report DTOs =====

/// Dashboard summary counters
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SummaryDto {
    /// Items with stock on hand
    pub total_inventory: u64,

    pub total_group: u64,

    pub total_shop: u64,

    /// Non-superuser accounts
    pub total_users: u64,
}

/// One row of the top-selling report
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TopSellingDto {
    pub id: i64,

    pub name: String,

    pub code: Option<String>,

    pub price: f64,

    /// Units sold in the requested window
    pub sum_of_item: i64,
}

/// One row of the sales-by-shop report
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ShopSalesDto {
    pub id: i64,

    pub name: String,

    pub amount_total: f64,
}

/// One row of the monthly sales-by-shop report
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MonthlySaleDto {
    /// Sale month as `YYYY-MM`
    #[schema(example = "2025-06")]
    pub month: String,

    pub name: String,

    pub amount_total: f64,
}

/// Sales-by-shop response: plain totals, or per-month buckets when
/// `monthly` is set
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(untagged)]
pub enum SaleByShopResponse {
    Totals(Vec<ShopSalesDto>),
    Monthly(Vec<MonthlySaleDto>),
}

/// Purchase totals over the requested window
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PurchaseSummaryDto {
    /// Revenue with two decimals, `"0.00"` when there are no sales
    #[schema(example = "149.90")]
    pub price: String,

    /// Units sold
    pub count: i64,
}

/// Plain confirmation message
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Inventory items added successfully")]
    pub success: String,
}
