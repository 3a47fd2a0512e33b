//! SeaORM repository implementations for groups, items, shops and
//! invoices.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Func, IntoColumnRef, SimpleExpr};
use sea_orm::{
    prelude::Expr, ColumnTrait, Condition, DatabaseConnection, EntityTrait, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, SqlErr, TransactionTrait,
};

use super::{entity, mapper};
use crate::contract::error::InventoryError;
use crate::contract::model::{
    Group, GroupFilter, GroupUpdate, Invoice, InvoiceFilter, InvoiceLine, Item, ItemFilter,
    ItemUpdate, NewGroup, NewInvoice, NewItem, Shop, ShopFilter,
};
use crate::domain::repository::{
    GroupRepository, InvoiceRepository, ItemRepository, ShopRepository,
};

/// Case-insensitive substring match, with LIKE wildcards in the needle
/// escaped.
fn contains_ci(col: impl IntoColumnRef, keyword: &str) -> SimpleExpr {
    let escaped = keyword
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");

    Expr::expr(Func::lower(Expr::col(col))).like(format!("%{escaped}%"))
}

fn creator_keyword_condition(keyword: &str) -> Condition {
    Condition::any()
        .add(contains_ci(
            (entity::creator::Entity, entity::creator::Column::Fullname),
            keyword,
        ))
        .add(contains_ci(
            (entity::creator::Entity, entity::creator::Column::Email),
            keyword,
        ))
}

// ===== Group Repository =====

pub struct SeaOrmGroupRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmGroupRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn item_counts(&self, group_ids: Vec<i64>) -> Result<HashMap<i64, i64>> {
        if group_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(Option<i64>, i64)> = entity::item::Entity::find()
            .select_only()
            .column(entity::item::Column::GroupId)
            .column_as(entity::item::Column::Id.count(), "count")
            .filter(entity::item::Column::GroupId.is_in(group_ids))
            .group_by(entity::item::Column::GroupId)
            .into_tuple()
            .all(&*self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(group_id, count)| group_id.map(|id| (id, count)))
            .collect())
    }
}

#[async_trait]
impl GroupRepository for SeaOrmGroupRepository {
    async fn create(&self, new_group: &NewGroup, created_by: Option<i64>) -> Result<Group> {
        let active = mapper::new_group_active_model(new_group, created_by);

        match entity::group::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await
        {
            // A fresh group has no items yet.
            Ok(model) => Ok(mapper::group_from_model(model, 0)),
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(InventoryError::name_taken("group", new_group.name.clone()).into())
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Group>> {
        let Some(model) = entity::group::Entity::find_by_id(id).one(&*self.db).await? else {
            return Ok(None);
        };

        let total_items = entity::item::Entity::find()
            .filter(entity::item::Column::GroupId.eq(id))
            .count(&*self.db)
            .await? as i64;

        Ok(Some(mapper::group_from_model(model, total_items)))
    }

    async fn name_exists(&self, name: &str, exclude_id: Option<i64>) -> Result<bool> {
        let mut query =
            entity::group::Entity::find().filter(entity::group::Column::Name.eq(name));
        if let Some(id) = exclude_id {
            query = query.filter(entity::group::Column::Id.ne(id));
        }

        Ok(query.count(&*self.db).await? > 0)
    }

    async fn update(&self, id: i64, changes: &GroupUpdate) -> Result<Option<Group>> {
        if changes.name.is_some() || changes.belongs_to.is_some() {
            let mut update =
                entity::group::Entity::update_many().filter(entity::group::Column::Id.eq(id));
            if let Some(name) = &changes.name {
                update = update.col_expr(entity::group::Column::Name, Expr::value(name.clone()));
            }
            if let Some(parent_id) = changes.belongs_to {
                update = update.col_expr(
                    entity::group::Column::BelongsTo,
                    Expr::value(Some(parent_id)),
                );
            }

            let outcome = update
                .col_expr(entity::group::Column::UpdatedAt, Expr::value(Utc::now()))
                .exec(&*self.db)
                .await;
            if let Err(err) = outcome {
                if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                    let name = changes.name.clone().unwrap_or_default();
                    return Err(InventoryError::name_taken("group", name).into());
                }
                return Err(err.into());
            }
        }

        self.find_by_id(id).await
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = entity::group::Entity::delete_by_id(id)
            .exec(&*self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn list(
        &self,
        filter: &GroupFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<Group>, u64)> {
        let mut query = entity::group::Entity::find();

        if let Some(parent_id) = filter.belongs_to {
            query = query.filter(entity::group::Column::BelongsTo.eq(parent_id));
        }
        if let Some(keyword) = filter.keyword.as_deref() {
            query = query
                .join(JoinType::LeftJoin, entity::group::Relation::Creator.def())
                .filter(creator_keyword_condition(keyword).add(contains_ci(
                    (entity::group::Entity, entity::group::Column::Name),
                    keyword,
                )));
        }

        let paginator = query
            .order_by_desc(entity::group::Column::CreatedAt)
            .order_by_desc(entity::group::Column::Id)
            .paginate(&*self.db, per_page);

        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.saturating_sub(1)).await?;

        let mut counts = self
            .item_counts(models.iter().map(|model| model.id).collect())
            .await?;
        let groups = models
            .into_iter()
            .map(|model| {
                let total_items = counts.remove(&model.id).unwrap_or(0);
                mapper::group_from_model(model, total_items)
            })
            .collect();

        Ok((groups, total))
    }
}

// ===== Item Repository =====

pub struct SeaOrmItemRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmItemRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ItemRepository for SeaOrmItemRepository {
    async fn create(&self, new_item: &NewItem, created_by: Option<i64>) -> Result<Item> {
        let txn = self.db.begin().await?;

        let mut model =
            entity::item::Entity::insert(mapper::new_item_active_model(new_item, created_by))
                .exec_with_returning(&txn)
                .await?;

        // The code is the assigned id, zero-padded to at least six
        // digits. Set inside the same transaction so no item is ever
        // visible without one.
        let code = format!("{:06}", model.id);
        entity::item::Entity::update_many()
            .col_expr(entity::item::Column::Code, Expr::value(Some(code.clone())))
            .filter(entity::item::Column::Id.eq(model.id))
            .exec(&txn)
            .await?;

        txn.commit().await?;

        model.code = Some(code);
        Ok(model.into())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Item>> {
        let result = entity::item::Entity::find_by_id(id).one(&*self.db).await?;

        Ok(result.map(Item::from))
    }

    async fn update(&self, id: i64, changes: &ItemUpdate) -> Result<Option<Item>> {
        let mut update =
            entity::item::Entity::update_many().filter(entity::item::Column::Id.eq(id));
        let mut dirty = false;

        if let Some(name) = &changes.name {
            update = update.col_expr(entity::item::Column::Name, Expr::value(name.clone()));
            dirty = true;
        }
        if let Some(group_id) = changes.group_id {
            update = update.col_expr(entity::item::Column::GroupId, Expr::value(Some(group_id)));
            dirty = true;
        }
        if let Some(total) = changes.total {
            update = update.col_expr(entity::item::Column::Total, Expr::value(total));
            dirty = true;
        }
        if let Some(price) = changes.price {
            update = update.col_expr(entity::item::Column::Price, Expr::value(price));
            dirty = true;
        }
        if let Some(photo_url) = &changes.photo_url {
            update = update.col_expr(
                entity::item::Column::PhotoUrl,
                Expr::value(Some(photo_url.clone())),
            );
            dirty = true;
        }

        if dirty {
            update
                .col_expr(entity::item::Column::UpdatedAt, Expr::value(Utc::now()))
                .exec(&*self.db)
                .await?;
        }

        self.find_by_id(id).await
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = entity::item::Entity::delete_by_id(id)
            .exec(&*self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn list(
        &self,
        filter: &ItemFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<Item>, u64)> {
        let mut query = entity::item::Entity::find();

        if let Some(group_id) = filter.group_id {
            query = query.filter(entity::item::Column::GroupId.eq(group_id));
        }
        if let Some(code) = filter.code.as_deref() {
            query = query.filter(entity::item::Column::Code.eq(code));
        }
        if let Some(keyword) = filter.keyword.as_deref() {
            query = query
                .join(JoinType::LeftJoin, entity::item::Relation::Creator.def())
                .join(JoinType::LeftJoin, entity::item::Relation::Group.def())
                .filter(
                    creator_keyword_condition(keyword)
                        .add(contains_ci(
                            (entity::item::Entity, entity::item::Column::Name),
                            keyword,
                        ))
                        .add(contains_ci(
                            (entity::item::Entity, entity::item::Column::Code),
                            keyword,
                        ))
                        .add(contains_ci(
                            (entity::group::Entity, entity::group::Column::Name),
                            keyword,
                        )),
                );
        }

        let paginator = query
            .order_by_desc(entity::item::Column::CreatedAt)
            .order_by_desc(entity::item::Column::Id)
            .paginate(&*self.db, per_page);

        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((models.into_iter().map(Item::from).collect(), total))
    }
}

// ===== Shop Repository =====

pub struct SeaOrmShopRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmShopRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ShopRepository for SeaOrmShopRepository {
    async fn create(&self, name: &str, created_by: Option<i64>) -> Result<Shop> {
        let active = mapper::new_shop_active_model(name, created_by);

        match entity::shop::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await
        {
            Ok(model) => Ok(model.into()),
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(InventoryError::name_taken("shop", name).into())
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Shop>> {
        let result = entity::shop::Entity::find_by_id(id).one(&*self.db).await?;

        Ok(result.map(Shop::from))
    }

    async fn name_exists(&self, name: &str, exclude_id: Option<i64>) -> Result<bool> {
        let mut query = entity::shop::Entity::find().filter(entity::shop::Column::Name.eq(name));
        if let Some(id) = exclude_id {
            query = query.filter(entity::shop::Column::Id.ne(id));
        }

        Ok(query.count(&*self.db).await? > 0)
    }

    async fn rename(&self, id: i64, name: &str) -> Result<Option<Shop>> {
        let outcome = entity::shop::Entity::update_many()
            .col_expr(entity::shop::Column::Name, Expr::value(name.to_string()))
            .col_expr(entity::shop::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(entity::shop::Column::Id.eq(id))
            .exec(&*self.db)
            .await;
        if let Err(err) = outcome {
            if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                return Err(InventoryError::name_taken("shop", name).into());
            }
            return Err(err.into());
        }

        self.find_by_id(id).await
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = entity::shop::Entity::delete_by_id(id)
            .exec(&*self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn list(
        &self,
        filter: &ShopFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<Shop>, u64)> {
        let mut query = entity::shop::Entity::find();

        if let Some(keyword) = filter.keyword.as_deref() {
            query = query
                .join(JoinType::LeftJoin, entity::shop::Relation::Creator.def())
                .filter(creator_keyword_condition(keyword).add(contains_ci(
                    (entity::shop::Entity, entity::shop::Column::Name),
                    keyword,
                )));
        }

        let paginator = query
            .order_by_desc(entity::shop::Column::CreatedAt)
            .order_by_desc(entity::shop::Column::Id)
            .paginate(&*self.db, per_page);

        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((models.into_iter().map(Shop::from).collect(), total))
    }
}

// ===== Invoice Repository =====

pub struct SeaOrmInvoiceRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmInvoiceRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl InvoiceRepository for SeaOrmInvoiceRepository {
    async fn create(&self, new_invoice: &NewInvoice, created_by: Option<i64>) -> Result<Invoice> {
        let txn = self.db.begin().await?;

        let invoice = entity::invoice::Entity::insert(mapper::new_invoice_active_model(
            new_invoice.shop_id,
            created_by,
        ))
        .exec_with_returning(&txn)
        .await?;

        let mut lines: Vec<InvoiceLine> = Vec::with_capacity(new_invoice.lines.len());
        for line in &new_invoice.lines {
            let item = entity::item::Entity::find_by_id(line.item_id)
                .one(&txn)
                .await?
                .ok_or_else(|| InventoryError::not_found("item", line.item_id.to_string()))?;

            // Guarded decrement: zero rows touched means not enough
            // stock, including against a concurrent invoice that got
            // there first. Returning drops the transaction and rolls
            // the whole invoice back.
            let updated = entity::item::Entity::update_many()
                .col_expr(
                    entity::item::Column::Remaining,
                    Expr::col(entity::item::Column::Remaining).sub(line.quantity),
                )
                .col_expr(entity::item::Column::UpdatedAt, Expr::value(Utc::now()))
                .filter(entity::item::Column::Id.eq(item.id))
                .filter(entity::item::Column::Remaining.gte(line.quantity))
                .exec(&txn)
                .await?;
            if updated.rows_affected == 0 {
                return Err(InventoryError::InsufficientStock {
                    code: item.code.clone().unwrap_or_default(),
                    requested: line.quantity,
                    remaining: item.remaining.unwrap_or(0),
                }
                .into());
            }

            let row = entity::invoice_item::Entity::insert(mapper::invoice_line_active_model(
                invoice.id,
                &item,
                line.quantity,
            ))
            .exec_with_returning(&txn)
            .await?;
            lines.push(row.into());
        }

        let shop_name = match invoice.shop_id {
            Some(shop_id) => entity::shop::Entity::find_by_id(shop_id)
                .one(&txn)
                .await?
                .map(|shop| shop.name),
            None => None,
        };

        txn.commit().await?;

        Ok(mapper::invoice_from_parts(invoice, shop_name, lines))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Invoice>> {
        let Some(model) = entity::invoice::Entity::find_by_id(id).one(&*self.db).await? else {
            return Ok(None);
        };

        let lines = entity::invoice_item::Entity::find()
            .filter(entity::invoice_item::Column::InvoiceId.eq(id))
            .order_by_asc(entity::invoice_item::Column::Id)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(InvoiceLine::from)
            .collect();

        let shop_name = match model.shop_id {
            Some(shop_id) => entity::shop::Entity::find_by_id(shop_id)
                .one(&*self.db)
                .await?
                .map(|shop| shop.name),
            None => None,
        };

        Ok(Some(mapper::invoice_from_parts(model, shop_name, lines)))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        // Lines go with the invoice via ON DELETE CASCADE.
        let result = entity::invoice::Entity::delete_by_id(id)
            .exec(&*self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn list(
        &self,
        filter: &InvoiceFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<Invoice>, u64)> {
        let mut query = entity::invoice::Entity::find();

        if let Some(shop_id) = filter.shop_id {
            query = query.filter(entity::invoice::Column::ShopId.eq(shop_id));
        }
        if let Some(keyword) = filter.keyword.as_deref() {
            query = query
                .join(JoinType::LeftJoin, entity::invoice::Relation::Shop.def())
                .join(JoinType::LeftJoin, entity::invoice::Relation::Creator.def())
                .filter(creator_keyword_condition(keyword).add(contains_ci(
                    (entity::shop::Entity, entity::shop::Column::Name),
                    keyword,
                )));
        }

        let paginator = query
            .order_by_desc(entity::invoice::Column::CreatedAt)
            .order_by_desc(entity::invoice::Column::Id)
            .paginate(&*self.db, per_page);

        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.saturating_sub(1)).await?;

        let invoice_ids: Vec<i64> = models.iter().map(|model| model.id).collect();
        let mut lines_by_invoice: HashMap<i64, Vec<InvoiceLine>> = HashMap::new();
        if !invoice_ids.is_empty() {
            let rows = entity::invoice_item::Entity::find()
                .filter(entity::invoice_item::Column::InvoiceId.is_in(invoice_ids))
                .order_by_asc(entity::invoice_item::Column::Id)
                .all(&*self.db)
                .await?;
            for row in rows {
                lines_by_invoice
                    .entry(row.invoice_id)
                    .or_default()
                    .push(row.into());
            }
        }

        let shop_ids: Vec<i64> = models.iter().filter_map(|model| model.shop_id).collect();
        let mut shop_names: HashMap<i64, String> = HashMap::new();
        if !shop_ids.is_empty() {
            let shops = entity::shop::Entity::find()
                .filter(entity::shop::Column::Id.is_in(shop_ids))
                .all(&*self.db)
                .await?;
            for shop in shops {
                shop_names.insert(shop.id, shop.name);
            }
        }

        let invoices = models
            .into_iter()
            .map(|model| {
                let lines = lines_by_invoice.remove(&model.id).unwrap_or_default();
                let shop_name = model.shop_id.and_then(|id| shop_names.get(&id).cloned());
                mapper::invoice_from_parts(model, shop_name, lines)
            })
            .collect();

        Ok((invoices, total))
    }
}
