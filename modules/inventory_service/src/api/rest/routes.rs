//! Route registration for the inventory endpoints

use axum::{
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;

use accounts_service::CurrentUser;
use stockroom_rest::{DateRangeQuery, Page, PageQuery, Problem};

use super::{dto::*, handlers};
use crate::domain::Service;

/// Build the inventory router. The server mounts this under `/api` and
/// installs the accounts `AuthState` extension so every endpoint can
/// resolve the caller.
pub fn router(service: Arc<Service>) -> Router {
    Router::new()
        .route(
            "/inventory",
            get(items_list_handler).post(item_create_handler),
        )
        .route(
            "/inventory/{id}",
            get(item_get_handler)
                .put(item_update_handler)
                .delete(item_delete_handler),
        )
        .route("/inventory-csv", post(inventory_csv_handler))
        .route(
            "/group",
            get(groups_list_handler).post(group_create_handler),
        )
        .route(
            "/group/{id}",
            get(group_get_handler)
                .put(group_update_handler)
                .delete(group_delete_handler),
        )
        .route("/shop", get(shops_list_handler).post(shop_create_handler))
        .route(
            "/shop/{id}",
            get(shop_get_handler)
                .put(shop_update_handler)
                .delete(shop_delete_handler),
        )
        .route(
            "/invoice",
            get(invoices_list_handler).post(invoice_create_handler),
        )
        .route(
            "/invoice/{id}",
            get(invoice_get_handler).delete(invoice_delete_handler),
        )
        .route("/summary", get(summary_handler))
        .route("/top-selling", get(top_selling_handler))
        .route("/sale-by-shop", get(sale_by_shop_handler))
        .route("/purchase-summary", get(purchase_summary_handler))
        .layer(Extension(service))
}

// ===== Handler wrappers that extract service from Extension =====

async fn group_create_handler(
    Extension(service): Extension<Arc<Service>>,
    actor: CurrentUser,
    json: axum::Json<CreateGroupRequest>,
) -> Result<(axum::http::StatusCode, axum::Json<GroupDto>), Problem> {
    handlers::create_group(service, actor, json).await
}

async fn group_get_handler(
    Extension(service): Extension<Arc<Service>>,
    actor: CurrentUser,
    path: axum::extract::Path<i64>,
) -> Result<axum::Json<GroupDto>, Problem> {
    handlers::get_group(service, actor, path).await
}

async fn groups_list_handler(
    Extension(service): Extension<Arc<Service>>,
    actor: CurrentUser,
    page: axum::extract::Query<PageQuery>,
    filter: axum::extract::Query<GroupFilterQuery>,
) -> Result<axum::Json<Page<GroupDto>>, Problem> {
    handlers::list_groups(service, actor, page, filter).await
}

async fn group_update_handler(
    Extension(service): Extension<Arc<Service>>,
    actor: CurrentUser,
    path: axum::extract::Path<i64>,
    json: axum::Json<UpdateGroupRequest>,
) -> Result<axum::Json<GroupDto>, Problem> {
    handlers::update_group(service, actor, path, json).await
}

async fn group_delete_handler(
    Extension(service): Extension<Arc<Service>>,
    actor: CurrentUser,
    path: axum::extract::Path<i64>,
) -> Result<axum::http::StatusCode, Problem> {
    handlers::delete_group(service, actor, path).await
}

async fn item_create_handler(
    Extension(service): Extension<Arc<Service>>,
    actor: CurrentUser,
    json: axum::Json<CreateItemRequest>,
) -> Result<(axum::http::StatusCode, axum::Json<ItemDto>), Problem> {
    handlers::create_item(service, actor, json).await
}

async fn item_get_handler(
    Extension(service): Extension<Arc<Service>>,
    actor: CurrentUser,
    path: axum::extract::Path<i64>,
) -> Result<axum::Json<ItemDto>, Problem> {
    handlers::get_item(service, actor, path).await
}

async fn items_list_handler(
    Extension(service): Extension<Arc<Service>>,
    actor: CurrentUser,
    page: axum::extract::Query<PageQuery>,
    filter: axum::extract::Query<ItemFilterQuery>,
) -> Result<axum::Json<Page<ItemDto>>, Problem> {
    handlers::list_items(service, actor, page, filter).await
}

async fn item_update_handler(
    Extension(service): Extension<Arc<Service>>,
    actor: CurrentUser,
    path: axum::extract::Path<i64>,
    json: axum::Json<UpdateItemRequest>,
) -> Result<axum::Json<ItemDto>, Problem> {
    handlers::update_item(service, actor, path, json).await
}

async fn item_delete_handler(
    Extension(service): Extension<Arc<Service>>,
    actor: CurrentUser,
    path: axum::extract::Path<i64>,
) -> Result<axum::http::StatusCode, Problem> {
    handlers::delete_item(service, actor, path).await
}

async fn inventory_csv_handler(
    Extension(service): Extension<Arc<Service>>,
    actor: CurrentUser,
    body: String,
) -> Result<(axum::http::StatusCode, axum::Json<MessageResponse>), Problem> {
    handlers::import_inventory_csv(service, actor, body).await
}

async fn shop_create_handler(
    Extension(service): Extension<Arc<Service>>,
    actor: CurrentUser,
    json: axum::Json<ShopRequest>,
) -> Result<(axum::http::StatusCode, axum::Json<ShopDto>), Problem> {
    handlers::create_shop(service, actor, json).await
}

async fn shop_get_handler(
    Extension(service): Extension<Arc<Service>>,
    actor: CurrentUser,
    path: axum::extract::Path<i64>,
) -> Result<axum::Json<ShopDto>, Problem> {
    handlers::get_shop(service, actor, path).await
}

async fn shops_list_handler(
    Extension(service): Extension<Arc<Service>>,
    actor: CurrentUser,
    page: axum::extract::Query<PageQuery>,
    filter: axum::extract::Query<ShopFilterQuery>,
) -> Result<axum::Json<Page<ShopDto>>, Problem> {
    handlers::list_shops(service, actor, page, filter).await
}

async fn shop_update_handler(
    Extension(service): Extension<Arc<Service>>,
    actor: CurrentUser,
    path: axum::extract::Path<i64>,
    json: axum::Json<ShopRequest>,
) -> Result<axum::Json<ShopDto>, Problem> {
    handlers::update_shop(service, actor, path, json).await
}

async fn shop_delete_handler(
    Extension(service): Extension<Arc<Service>>,
    actor: CurrentUser,
    path: axum::extract::Path<i64>,
) -> Result<axum::http::StatusCode, Problem> {
    handlers::delete_shop(service, actor, path).await
}

async fn invoice_create_handler(
    Extension(service): Extension<Arc<Service>>,
    actor: CurrentUser,
    json: axum::Json<CreateInvoiceRequest>,
) -> Result<(axum::http::StatusCode, axum::Json<InvoiceDto>), Problem> {
    handlers::create_invoice(service, actor, json).await
}

async fn invoice_get_handler(
    Extension(service): Extension<Arc<Service>>,
    actor: CurrentUser,
    path: axum::extract::Path<i64>,
) -> Result<axum::Json<InvoiceDto>, Problem> {
    handlers::get_invoice(service, actor, path).await
}

async fn invoices_list_handler(
    Extension(service): Extension<Arc<Service>>,
    actor: CurrentUser,
    page: axum::extract::Query<PageQuery>,
    filter: axum::extract::Query<InvoiceFilterQuery>,
) -> Result<axum::Json<Page<InvoiceDto>>, Problem> {
    handlers::list_invoices(service, actor, page, filter).await
}

async fn invoice_delete_handler(
    Extension(service): Extension<Arc<Service>>,
    actor: CurrentUser,
    path: axum::extract::Path<i64>,
) -> Result<axum::http::StatusCode, Problem> {
    handlers::delete_invoice(service, actor, path).await
}

async fn summary_handler(
    Extension(service): Extension<Arc<Service>>,
    actor: CurrentUser,
) -> Result<axum::Json<SummaryDto>, Problem> {
    handlers::summary(service, actor).await
}

async fn top_selling_handler(
    Extension(service): Extension<Arc<Service>>,
    actor: CurrentUser,
    query: axum::extract::Query<DateRangeQuery>,
) -> Result<axum::Json<Vec<TopSellingDto>>, Problem> {
    handlers::top_selling(service, actor, query).await
}

async fn sale_by_shop_handler(
    Extension(service): Extension<Arc<Service>>,
    actor: CurrentUser,
    query: axum::extract::Query<DateRangeQuery>,
    mode: axum::extract::Query<SaleByShopQuery>,
) -> Result<axum::Json<SaleByShopResponse>, Problem> {
    handlers::sale_by_shop(service, actor, query, mode).await
}

async fn purchase_summary_handler(
    Extension(service): Extension<Arc<Service>>,
    actor: CurrentUser,
    query: axum::extract::Query<DateRangeQuery>,
) -> Result<axum::Json<PurchaseSummaryDto>, Problem> {
    handlers::purchase_summary(service, actor, query).await
}
