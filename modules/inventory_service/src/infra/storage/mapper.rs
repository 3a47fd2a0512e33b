//! Conversions between SeaORM models and domain types

use chrono::Utc;
use sea_orm::Set;

use super::entity;
use crate::contract::model::{Group, Invoice, InvoiceLine, Item, NewGroup, NewItem, Shop};

/// `total_items` is not a column; callers supply the count they
/// resolved for the row.
pub fn group_from_model(model: entity::group::Model, total_items: i64) -> Group {
    Group {
        id: model.id,
        created_by: model.created_by,
        name: model.name,
        belongs_to: model.belongs_to,
        total_items,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

pub fn new_group_active_model(
    new_group: &NewGroup,
    created_by: Option<i64>,
) -> entity::group::ActiveModel {
    let now = Utc::now();

    entity::group::ActiveModel {
        created_by: Set(created_by),
        name: Set(new_group.name.clone()),
        belongs_to: Set(new_group.belongs_to),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
}

impl From<entity::item::Model> for Item {
    fn from(model: entity::item::Model) -> Self {
        Self {
            id: model.id,
            created_by: model.created_by,
            code: model.code,
            photo_url: model.photo_url,
            group_id: model.group_id,
            total: model.total,
            remaining: model.remaining,
            name: model.name,
            price: model.price,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Code stays unset here; the insert transaction derives it from the
/// assigned id. Remaining starts out equal to total.
pub fn new_item_active_model(
    new_item: &NewItem,
    created_by: Option<i64>,
) -> entity::item::ActiveModel {
    let now = Utc::now();

    entity::item::ActiveModel {
        created_by: Set(created_by),
        code: Set(None),
        photo_url: Set(new_item.photo_url.clone()),
        group_id: Set(new_item.group_id),
        total: Set(new_item.total),
        remaining: Set(Some(new_item.total)),
        name: Set(new_item.name.clone()),
        price: Set(new_item.price),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
}

impl From<entity::shop::Model> for Shop {
    fn from(model: entity::shop::Model) -> Self {
        Self {
            id: model.id,
            created_by: model.created_by,
            name: model.name,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

pub fn new_shop_active_model(name: &str, created_by: Option<i64>) -> entity::shop::ActiveModel {
    let now = Utc::now();

    entity::shop::ActiveModel {
        created_by: Set(created_by),
        name: Set(name.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
}

pub fn invoice_from_parts(
    model: entity::invoice::Model,
    shop_name: Option<String>,
    items: Vec<InvoiceLine>,
) -> Invoice {
    Invoice {
        id: model.id,
        created_by: model.created_by,
        shop_id: model.shop_id,
        shop_name,
        created_at: model.created_at,
        items,
    }
}

pub fn new_invoice_active_model(
    shop_id: Option<i64>,
    created_by: Option<i64>,
) -> entity::invoice::ActiveModel {
    entity::invoice::ActiveModel {
        created_by: Set(created_by),
        shop_id: Set(shop_id),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
}

impl From<entity::invoice_item::Model> for InvoiceLine {
    fn from(model: entity::invoice_item::Model) -> Self {
        Self {
            id: model.id,
            invoice_id: model.invoice_id,
            item_id: model.item_id,
            item_name: model.item_name,
            item_code: model.item_code,
            quantity: model.quantity,
            amount: model.amount,
            created_at: model.created_at,
        }
    }
}

/// Snapshot a sold item into a line row. Amount is quantity times the
/// unit price at sale time.
pub fn invoice_line_active_model(
    invoice_id: i64,
    item: &entity::item::Model,
    quantity: i64,
) -> entity::invoice_item::ActiveModel {
    entity::invoice_item::ActiveModel {
        invoice_id: Set(invoice_id),
        item_id: Set(Some(item.id)),
        item_name: Set(Some(item.name.clone())),
        item_code: Set(item.code.clone()),
        quantity: Set(quantity),
        amount: Set(Some(quantity as f64 * item.price)),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
}
