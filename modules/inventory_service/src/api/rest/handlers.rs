//! HTTP request handlers - thin layer that delegates to domain service

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use accounts_service::CurrentUser;
use stockroom_rest::{DateRangeQuery, Page, PageQuery, Problem};

use super::dto::*;
use super::error::{invalid_date_range, map_domain_error};
use crate::contract::model::{
    GroupFilter, GroupUpdate, InvoiceFilter, ItemFilter, ItemUpdate, NewGroup, NewInvoice,
    NewInvoiceLine, NewItem, ShopFilter,
};
use crate::domain::Service;

/// Empty or blank search terms mean "no keyword filter".
fn keyword(raw: Option<String>) -> Option<String> {
    raw.filter(|keyword| !keyword.trim().is_empty())
}

// ===== Groups =====

pub async fn create_group(
    service: Arc<Service>,
    CurrentUser(actor): CurrentUser,
    Json(req): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<GroupDto>), Problem> {
    let group = service
        .create_group(
            &actor,
            NewGroup {
                name: req.name,
                belongs_to: req.belongs_to,
            },
        )
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(group.into())))
}

pub async fn get_group(
    service: Arc<Service>,
    _actor: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<GroupDto>, Problem> {
    let group = service.get_group(id).await.map_err(map_domain_error)?;

    Ok(Json(group.into()))
}

pub async fn list_groups(
    service: Arc<Service>,
    _actor: CurrentUser,
    Query(page): Query<PageQuery>,
    Query(filter): Query<GroupFilterQuery>,
) -> Result<Json<Page<GroupDto>>, Problem> {
    let filter = GroupFilter {
        keyword: keyword(filter.keyword),
        belongs_to: filter.belongs_to,
    };
    let (groups, total) = service
        .list_groups(&filter, page.page(), page.page_size())
        .await
        .map_err(map_domain_error)?;

    let items: Vec<GroupDto> = groups.into_iter().map(GroupDto::from).collect();

    Ok(Json(Page::new(items, total, &page)))
}

pub async fn update_group(
    service: Arc<Service>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateGroupRequest>,
) -> Result<Json<GroupDto>, Problem> {
    let group = service
        .update_group(
            &actor,
            id,
            GroupUpdate {
                name: req.name,
                belongs_to: req.belongs_to,
            },
        )
        .await
        .map_err(map_domain_error)?;

    Ok(Json(group.into()))
}

pub async fn delete_group(
    service: Arc<Service>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, Problem> {
    service
        .delete_group(&actor, id)
        .await
        .map_err(map_domain_error)?;

    Ok(StatusCode::NO_CONTENT)
}

// ===== Items =====

pub async fn create_item(
    service: Arc<Service>,
    CurrentUser(actor): CurrentUser,
    Json(req): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<ItemDto>), Problem> {
    let item = service
        .create_item(
            &actor,
            NewItem {
                name: req.name,
                group_id: req.group_id,
                total: req.total,
                price: req.price,
                photo_url: req.photo_url,
            },
        )
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(item.into())))
}

pub async fn get_item(
    service: Arc<Service>,
    _actor: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<ItemDto>, Problem> {
    let item = service.get_item(id).await.map_err(map_domain_error)?;

    Ok(Json(item.into()))
}

pub async fn list_items(
    service: Arc<Service>,
    _actor: CurrentUser,
    Query(page): Query<PageQuery>,
    Query(filter): Query<ItemFilterQuery>,
) -> Result<Json<Page<ItemDto>>, Problem> {
    let filter = ItemFilter {
        keyword: keyword(filter.keyword),
        group_id: filter.group_id,
        code: filter.code,
    };
    let (found, total) = service
        .list_items(&filter, page.page(), page.page_size())
        .await
        .map_err(map_domain_error)?;

    let items: Vec<ItemDto> = found.into_iter().map(ItemDto::from).collect();

    Ok(Json(Page::new(items, total, &page)))
}

pub async fn update_item(
    service: Arc<Service>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateItemRequest>,
) -> Result<Json<ItemDto>, Problem> {
    let item = service
        .update_item(
            &actor,
            id,
            ItemUpdate {
                name: req.name,
                group_id: req.group_id,
                total: req.total,
                price: req.price,
                photo_url: req.photo_url,
            },
        )
        .await
        .map_err(map_domain_error)?;

    Ok(Json(item.into()))
}

pub async fn delete_item(
    service: Arc<Service>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, Problem> {
    service
        .delete_item(&actor, id)
        .await
        .map_err(map_domain_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Bulk import from a `text/csv` request body.
pub async fn import_inventory_csv(
    service: Arc<Service>,
    CurrentUser(actor): CurrentUser,
    body: String,
) -> Result<(StatusCode, Json<MessageResponse>), Problem> {
    service
        .import_inventory_csv(&actor, &body)
        .await
        .map_err(map_domain_error)?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            success: "Inventory items added successfully".to_string(),
        }),
    ))
}

// ===== Shops =====

pub async fn create_shop(
    service: Arc<Service>,
    CurrentUser(actor): CurrentUser,
    Json(req): Json<ShopRequest>,
) -> Result<(StatusCode, Json<ShopDto>), Problem> {
    let shop = service
        .create_shop(&actor, &req.name)
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(shop.into())))
}

pub async fn get_shop(
    service: Arc<Service>,
    _actor: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<ShopDto>, Problem> {
    let shop = service.get_shop(id).await.map_err(map_domain_error)?;

    Ok(Json(shop.into()))
}

pub async fn list_shops(
    service: Arc<Service>,
    _actor: CurrentUser,
    Query(page): Query<PageQuery>,
    Query(filter): Query<ShopFilterQuery>,
) -> Result<Json<Page<ShopDto>>, Problem> {
    let filter = ShopFilter {
        keyword: keyword(filter.keyword),
    };
    let (shops, total) = service
        .list_shops(&filter, page.page(), page.page_size())
        .await
        .map_err(map_domain_error)?;

    let items: Vec<ShopDto> = shops.into_iter().map(ShopDto::from).collect();

    Ok(Json(Page::new(items, total, &page)))
}

pub async fn update_shop(
    service: Arc<Service>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
    Json(req): Json<ShopRequest>,
) -> Result<Json<ShopDto>, Problem> {
    let shop = service
        .rename_shop(&actor, id, &req.name)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(shop.into()))
}

pub async fn delete_shop(
    service: Arc<Service>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, Problem> {
    service
        .delete_shop(&actor, id)
        .await
        .map_err(map_domain_error)?;

    Ok(StatusCode::NO_CONTENT)
}

// ===== Invoices =====

pub async fn create_invoice(
    service: Arc<Service>,
    CurrentUser(actor): CurrentUser,
    Json(req): Json<CreateInvoiceRequest>,
) -> Result<(StatusCode, Json<InvoiceDto>), Problem> {
    let invoice = service
        .create_invoice(
            &actor,
            NewInvoice {
                shop_id: req.shop_id,
                lines: req
                    .items
                    .iter()
                    .map(|line| NewInvoiceLine {
                        item_id: line.item_id,
                        quantity: line.quantity,
                    })
                    .collect(),
            },
        )
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(invoice.into())))
}

pub async fn get_invoice(
    service: Arc<Service>,
    _actor: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<InvoiceDto>, Problem> {
    let invoice = service.get_invoice(id).await.map_err(map_domain_error)?;

    Ok(Json(invoice.into()))
}

pub async fn list_invoices(
    service: Arc<Service>,
    _actor: CurrentUser,
    Query(page): Query<PageQuery>,
    Query(filter): Query<InvoiceFilterQuery>,
) -> Result<Json<Page<InvoiceDto>>, Problem> {
    let filter = InvoiceFilter {
        keyword: keyword(filter.keyword),
        shop_id: filter.shop_id,
    };
    let (invoices, total) = service
        .list_invoices(&filter, page.page(), page.page_size())
        .await
        .map_err(map_domain_error)?;

    let items: Vec<InvoiceDto> = invoices.into_iter().map(InvoiceDto::from).collect();

    Ok(Json(Page::new(items, total, &page)))
}

pub async fn delete_invoice(
    service: Arc<Service>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, Problem> {
    service
        .delete_invoice(&actor, id)
        .await
        .map_err(map_domain_error)?;

    Ok(StatusCode::NO_CONTENT)
}

// ===== Reports =====

pub async fn summary(
    service: Arc<Service>,
    _actor: CurrentUser,
) -> Result<Json<SummaryDto>, Problem> {
    let summary = service.summary().await.map_err(map_domain_error)?;

    Ok(Json(summary.into()))
}

pub async fn top_selling(
    service: Arc<Service>,
    _actor: CurrentUser,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<Vec<TopSellingDto>>, Problem> {
    let range = query.resolve().map_err(invalid_date_range)?;
    let rows = service
        .top_selling(range)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(rows.into_iter().map(TopSellingDto::from).collect()))
}

pub async fn sale_by_shop(
    service: Arc<Service>,
    _actor: CurrentUser,
    Query(query): Query<DateRangeQuery>,
    Query(mode): Query<SaleByShopQuery>,
) -> Result<Json<SaleByShopResponse>, Problem> {
    let range = query.resolve().map_err(invalid_date_range)?;

    let response = if mode.monthly.as_deref().is_some_and(|m| !m.is_empty()) {
        let rows = service
            .monthly_sales(range)
            .await
            .map_err(map_domain_error)?;
        SaleByShopResponse::Monthly(rows.into_iter().map(MonthlySaleDto::from).collect())
    } else {
        let rows = service
            .sales_by_shop(range)
            .await
            .map_err(map_domain_error)?;
        SaleByShopResponse::Totals(rows.into_iter().map(ShopSalesDto::from).collect())
    };

    Ok(Json(response))
}

pub async fn purchase_summary(
    service: Arc<Service>,
    _actor: CurrentUser,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<PurchaseSummaryDto>, Problem> {
    let range = query.resolve().map_err(invalid_date_range)?;
    let summary = service
        .purchase_summary(range)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(summary.into()))
}
