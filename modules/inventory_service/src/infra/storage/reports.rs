//! Aggregation queries behind the reporting endpoints.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use sea_orm::sea_query::{Alias, Func, IntoCondition};
use sea_orm::{
    prelude::Expr, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};

use super::entity;
use crate::contract::model::{MonthlySale, PurchaseSummary, ShopSales, TopSellingItem};
use crate::domain::repository::{DateRange, ReportsRepository};

pub struct SeaOrmReportsRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmReportsRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReportsRepository for SeaOrmReportsRepository {
    async fn counts(&self) -> Result<(u64, u64, u64)> {
        let items = entity::item::Entity::find()
            .filter(entity::item::Column::Remaining.gt(0))
            .count(&*self.db)
            .await?;
        let groups = entity::group::Entity::find().count(&*self.db).await?;
        let shops = entity::shop::Entity::find().count(&*self.db).await?;

        Ok((items, groups, shops))
    }

    async fn top_selling(
        &self,
        range: Option<DateRange>,
        limit: u64,
    ) -> Result<Vec<TopSellingItem>> {
        let mut sales = entity::item::Relation::InvoiceItems.def();
        if let Some((start, end)) = range {
            // The window lives in the join condition so items without
            // sales still appear, with a zero count.
            sales = sales.on_condition(move |_items, _lines| {
                entity::invoice_item::Column::CreatedAt
                    .gte(start)
                    .and(entity::invoice_item::Column::CreatedAt.lt(end))
                    .into_condition()
            });
        }

        let rows: Vec<(i64, String, Option<String>, f64, i64)> = entity::item::Entity::find()
            .join(JoinType::LeftJoin, sales)
            .select_only()
            .column(entity::item::Column::Id)
            .column(entity::item::Column::Name)
            .column(entity::item::Column::Code)
            .column(entity::item::Column::Price)
            .column_as(
                // SUM over bigint widens to numeric on Postgres; cast
                // back down so the tuple decodes as i64.
                Expr::expr(Func::coalesce([
                    entity::invoice_item::Column::Quantity.sum(),
                    Expr::val(0_i64).into(),
                ]))
                .cast_as(Alias::new("bigint")),
                "sold",
            )
            .group_by(entity::item::Column::Id)
            .group_by(entity::item::Column::Name)
            .group_by(entity::item::Column::Code)
            .group_by(entity::item::Column::Price)
            .order_by_desc(Expr::col(Alias::new("sold")))
            .order_by_asc(entity::item::Column::Id)
            .limit(limit)
            .into_tuple()
            .all(&*self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, code, price, sold)| TopSellingItem {
                id,
                name,
                code,
                price,
                sold,
            })
            .collect())
    }

    async fn sales_by_shop(&self, range: Option<DateRange>) -> Result<Vec<ShopSales>> {
        let mut sold = entity::shop::Relation::Invoices.def();
        if let Some((start, end)) = range {
            sold = sold.on_condition(move |_shops, _invoices| {
                entity::invoice::Column::CreatedAt
                    .gte(start)
                    .and(entity::invoice::Column::CreatedAt.lt(end))
                    .into_condition()
            });
        }

        let rows: Vec<(i64, String, f64)> = entity::shop::Entity::find()
            .join(JoinType::LeftJoin, sold)
            .join(JoinType::LeftJoin, entity::invoice::Relation::Lines.def())
            .select_only()
            .column(entity::shop::Column::Id)
            .column(entity::shop::Column::Name)
            .column_as(
                Expr::expr(Func::coalesce([
                    entity::invoice_item::Column::Amount.sum(),
                    Expr::val(0.0_f64).into(),
                ])),
                "amount_total",
            )
            .group_by(entity::shop::Column::Id)
            .group_by(entity::shop::Column::Name)
            .order_by_desc(Expr::col(Alias::new("amount_total")))
            .order_by_asc(entity::shop::Column::Id)
            .into_tuple()
            .all(&*self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, amount_total)| ShopSales {
                id,
                name,
                amount_total,
            })
            .collect())
    }

    async fn monthly_sales(&self, range: Option<DateRange>) -> Result<Vec<MonthlySale>> {
        // Inner joins: lines without an invoice cannot exist, and sales
        // of deleted shops have nowhere to be attributed.
        let mut query = entity::invoice_item::Entity::find()
            .join(
                JoinType::InnerJoin,
                entity::invoice_item::Relation::Invoice.def(),
            )
            .join(JoinType::InnerJoin, entity::invoice::Relation::Shop.def())
            .select_only()
            .column(entity::invoice::Column::CreatedAt)
            .column(entity::shop::Column::Name)
            .column(entity::invoice_item::Column::Amount);

        if let Some((start, end)) = range {
            query = query
                .filter(entity::invoice::Column::CreatedAt.gte(start))
                .filter(entity::invoice::Column::CreatedAt.lt(end));
        }

        let rows: Vec<(DateTime<Utc>, String, Option<f64>)> =
            query.into_tuple().all(&*self.db).await?;

        Ok(fold_monthly(rows))
    }

    async fn purchase_totals(&self, range: Option<DateRange>) -> Result<PurchaseSummary> {
        let mut query = entity::invoice_item::Entity::find();
        if let Some((start, end)) = range {
            query = query
                .filter(entity::invoice_item::Column::CreatedAt.gte(start))
                .filter(entity::invoice_item::Column::CreatedAt.lt(end));
        }

        let row: Option<(f64, i64)> = query
            .select_only()
            .column_as(
                Expr::expr(Func::coalesce([
                    entity::invoice_item::Column::Amount.sum(),
                    Expr::val(0.0_f64).into(),
                ])),
                "amount_total",
            )
            .column_as(
                Expr::expr(Func::coalesce([
                    entity::invoice_item::Column::Quantity.sum(),
                    Expr::val(0_i64).into(),
                ]))
                .cast_as(Alias::new("bigint")),
                "count",
            )
            .into_tuple()
            .one(&*self.db)
            .await?;

        let (amount_total, count) = row.unwrap_or((0.0, 0));
        Ok(PurchaseSummary {
            amount_total,
            count,
        })
    }
}

/// Bucket raw (sale timestamp, shop name, line amount) rows by the
/// calendar month of the sale, summing amounts per (month, shop).
/// Output is ordered month ascending, then shop name.
pub(crate) fn fold_monthly(rows: Vec<(DateTime<Utc>, String, Option<f64>)>) -> Vec<MonthlySale> {
    let mut buckets: BTreeMap<(NaiveDate, String), f64> = BTreeMap::new();
    for (sold_at, name, amount) in rows {
        let day = sold_at.date_naive();
        let month = NaiveDate::from_ymd_opt(day.year(), day.month(), 1).unwrap_or(day);
        *buckets.entry((month, name)).or_insert(0.0) += amount.unwrap_or(0.0);
    }

    buckets
        .into_iter()
        .map(|((month, name), amount_total)| MonthlySale {
            month,
            name,
            amount_total,
        })
        .collect()
}
