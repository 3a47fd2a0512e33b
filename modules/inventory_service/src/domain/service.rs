//! Inventory business logic.
//!
//! Every mutation validates input, delegates persistence to the
//! repositories and appends one entry to the user activity trail via
//! the accounts contract, attributed to the authenticated actor.

use std::collections::BTreeSet;
use std::sync::Arc;

use accounts_service::{AccountsApi, User};

use crate::contract::error::InventoryError;
use crate::contract::model::{
    Group, GroupFilter, GroupUpdate, InventorySummary, Invoice, InvoiceFilter, Item, ItemFilter,
    ItemUpdate, MonthlySale, NewGroup, NewInvoice, NewItem, PurchaseSummary, Shop, ShopFilter,
    ShopSales, TopSellingItem,
};

use super::csv;
use super::repository::{
    DateRange, GroupRepository, InvoiceRepository, ItemRepository, ReportsRepository,
    ShopRepository,
};

/// How many rows the top-selling report returns.
const TOP_SELLING_LIMIT: u64 = 10;

const GROUP_NAME_MAX: usize = 100;
const SHOP_NAME_MAX: usize = 75;
const ITEM_NAME_MAX: usize = 255;

pub struct Service {
    groups: Arc<dyn GroupRepository>,
    items: Arc<dyn ItemRepository>,
    shops: Arc<dyn ShopRepository>,
    invoices: Arc<dyn InvoiceRepository>,
    reports: Arc<dyn ReportsRepository>,
    accounts: Arc<dyn AccountsApi>,
}

impl Service {
    pub fn new(
        groups: Arc<dyn GroupRepository>,
        items: Arc<dyn ItemRepository>,
        shops: Arc<dyn ShopRepository>,
        invoices: Arc<dyn InvoiceRepository>,
        reports: Arc<dyn ReportsRepository>,
        accounts: Arc<dyn AccountsApi>,
    ) -> Self {
        Self {
            groups,
            items,
            shops,
            invoices,
            reports,
            accounts,
        }
    }

    // ===== Groups =====

    pub async fn create_group(
        &self,
        actor: &User,
        new_group: NewGroup,
    ) -> Result<Group, InventoryError> {
        let name = valid_name(&new_group.name, GROUP_NAME_MAX, "group")?;
        if let Some(parent_id) = new_group.belongs_to {
            self.require_group(parent_id).await?;
        }
        if self
            .groups
            .name_exists(&name, None)
            .await
            .map_err(typed("failed to check group name"))?
        {
            return Err(InventoryError::name_taken("group", name));
        }

        let group = self
            .groups
            .create(
                &NewGroup {
                    name,
                    belongs_to: new_group.belongs_to,
                },
                Some(actor.id),
            )
            .await
            .map_err(typed("failed to insert group"))?;

        self.log_activity(actor, &format!("added new group - \"{}\"", group.name))
            .await;
        Ok(group)
    }

    pub async fn get_group(&self, id: i64) -> Result<Group, InventoryError> {
        self.require_group(id).await
    }

    pub async fn list_groups(
        &self,
        filter: &GroupFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<Group>, u64), InventoryError> {
        self.groups
            .list(filter, page, per_page)
            .await
            .map_err(typed("failed to list groups"))
    }

    pub async fn update_group(
        &self,
        actor: &User,
        id: i64,
        mut changes: GroupUpdate,
    ) -> Result<Group, InventoryError> {
        let existing = self.require_group(id).await?;

        if let Some(name) = changes.name.take() {
            let name = valid_name(&name, GROUP_NAME_MAX, "group")?;
            if name != existing.name
                && self
                    .groups
                    .name_exists(&name, Some(id))
                    .await
                    .map_err(typed("failed to check group name"))?
            {
                return Err(InventoryError::name_taken("group", name));
            }
            changes.name = Some(name);
        }
        if let Some(parent_id) = changes.belongs_to {
            if parent_id == id {
                return Err(InventoryError::validation(
                    "a group cannot belong to itself",
                ));
            }
            self.require_group(parent_id).await?;
        }

        let updated = self
            .groups
            .update(id, &changes)
            .await
            .map_err(typed("failed to update group"))?
            .ok_or_else(|| InventoryError::not_found("group", id.to_string()))?;

        self.log_activity(
            actor,
            &format!(
                "updated group from - \"{}\" to \"{}\"",
                existing.name, updated.name
            ),
        )
        .await;
        Ok(updated)
    }

    pub async fn delete_group(&self, actor: &User, id: i64) -> Result<(), InventoryError> {
        let existing = self.require_group(id).await?;

        let deleted = self
            .groups
            .delete(id)
            .await
            .map_err(typed("failed to delete group"))?;
        if !deleted {
            return Err(InventoryError::not_found("group", id.to_string()));
        }

        self.log_activity(actor, &format!("deleted group - \"{}\"", existing.name))
            .await;
        Ok(())
    }

    // ===== Items =====

    pub async fn create_item(
        &self,
        actor: &User,
        new_item: NewItem,
    ) -> Result<Item, InventoryError> {
        let name = valid_name(&new_item.name, ITEM_NAME_MAX, "item")?;
        if new_item.total < 0 {
            return Err(InventoryError::validation("total must not be negative"));
        }
        if let Some(group_id) = new_item.group_id {
            self.require_group(group_id).await?;
        }

        let item = self
            .items
            .create(
                &NewItem {
                    name,
                    ..new_item
                },
                Some(actor.id),
            )
            .await
            .map_err(typed("failed to insert item"))?;

        self.log_activity(
            actor,
            &format!(
                "added new inventory item \"{}\" with code \"{}\"",
                item.name,
                item.code.as_deref().unwrap_or("")
            ),
        )
        .await;
        Ok(item)
    }

    pub async fn get_item(&self, id: i64) -> Result<Item, InventoryError> {
        self.require_item(id).await
    }

    pub async fn list_items(
        &self,
        filter: &ItemFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<Item>, u64), InventoryError> {
        self.items
            .list(filter, page, per_page)
            .await
            .map_err(typed("failed to list items"))
    }

    pub async fn update_item(
        &self,
        actor: &User,
        id: i64,
        mut changes: ItemUpdate,
    ) -> Result<Item, InventoryError> {
        self.require_item(id).await?;

        if let Some(name) = changes.name.take() {
            changes.name = Some(valid_name(&name, ITEM_NAME_MAX, "item")?);
        }
        if let Some(total) = changes.total {
            if total < 0 {
                return Err(InventoryError::validation("total must not be negative"));
            }
        }
        if let Some(group_id) = changes.group_id {
            self.require_group(group_id).await?;
        }

        let updated = self
            .items
            .update(id, &changes)
            .await
            .map_err(typed("failed to update item"))?
            .ok_or_else(|| InventoryError::not_found("item", id.to_string()))?;

        self.log_activity(
            actor,
            &format!(
                "updated inventory item \"{}\" with code \"{}\"",
                updated.name,
                updated.code.as_deref().unwrap_or("")
            ),
        )
        .await;
        Ok(updated)
    }

    pub async fn delete_item(&self, actor: &User, id: i64) -> Result<(), InventoryError> {
        let existing = self.require_item(id).await?;

        let deleted = self
            .items
            .delete(id)
            .await
            .map_err(typed("failed to delete item"))?;
        if !deleted {
            return Err(InventoryError::not_found("item", id.to_string()));
        }

        self.log_activity(
            actor,
            &format!(
                "deleted inventory item \"{}\" with code \"{}\"",
                existing.name,
                existing.code.as_deref().unwrap_or("")
            ),
        )
        .await;
        Ok(())
    }

    /// Bulk import from a CSV body. The whole file is parsed and the
    /// referenced groups verified before anything is written; rows are
    /// then created through the normal item path so each one gets a
    /// code and an activity entry.
    pub async fn import_inventory_csv(
        &self,
        actor: &User,
        body: &str,
    ) -> Result<usize, InventoryError> {
        let rows = csv::parse_inventory_csv(body)?;

        let group_ids: BTreeSet<i64> = rows.iter().map(|row| row.group_id).collect();
        for group_id in group_ids {
            self.require_group(group_id).await?;
        }

        let count = rows.len();
        for row in rows {
            self.create_item(
                actor,
                NewItem {
                    name: row.name,
                    group_id: Some(row.group_id),
                    total: row.total,
                    price: row.price,
                    photo_url: None,
                },
            )
            .await?;
        }
        Ok(count)
    }

    // ===== Shops =====

    pub async fn create_shop(&self, actor: &User, name: &str) -> Result<Shop, InventoryError> {
        let name = valid_name(name, SHOP_NAME_MAX, "shop")?;
        if self
            .shops
            .name_exists(&name, None)
            .await
            .map_err(typed("failed to check shop name"))?
        {
            return Err(InventoryError::name_taken("shop", name));
        }

        let shop = self
            .shops
            .create(&name, Some(actor.id))
            .await
            .map_err(typed("failed to insert shop"))?;

        self.log_activity(actor, &format!("added new shop - \"{}\"", shop.name))
            .await;
        Ok(shop)
    }

    pub async fn get_shop(&self, id: i64) -> Result<Shop, InventoryError> {
        self.require_shop(id).await
    }

    pub async fn list_shops(
        &self,
        filter: &ShopFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<Shop>, u64), InventoryError> {
        self.shops
            .list(filter, page, per_page)
            .await
            .map_err(typed("failed to list shops"))
    }

    pub async fn rename_shop(
        &self,
        actor: &User,
        id: i64,
        name: &str,
    ) -> Result<Shop, InventoryError> {
        let existing = self.require_shop(id).await?;

        let name = valid_name(name, SHOP_NAME_MAX, "shop")?;
        if name != existing.name
            && self
                .shops
                .name_exists(&name, Some(id))
                .await
                .map_err(typed("failed to check shop name"))?
        {
            return Err(InventoryError::name_taken("shop", name));
        }

        let updated = self
            .shops
            .rename(id, &name)
            .await
            .map_err(typed("failed to update shop"))?
            .ok_or_else(|| InventoryError::not_found("shop", id.to_string()))?;

        self.log_activity(
            actor,
            &format!(
                "updated shop from - \"{}\" to \"{}\"",
                existing.name, updated.name
            ),
        )
        .await;
        Ok(updated)
    }

    pub async fn delete_shop(&self, actor: &User, id: i64) -> Result<(), InventoryError> {
        let existing = self.require_shop(id).await?;

        let deleted = self
            .shops
            .delete(id)
            .await
            .map_err(typed("failed to delete shop"))?;
        if !deleted {
            return Err(InventoryError::not_found("shop", id.to_string()));
        }

        self.log_activity(actor, &format!("deleted shop - \"{}\"", existing.name))
            .await;
        Ok(())
    }

    // ===== Invoices =====

    pub async fn create_invoice(
        &self,
        actor: &User,
        new_invoice: NewInvoice,
    ) -> Result<Invoice, InventoryError> {
        if new_invoice.lines.is_empty() {
            return Err(InventoryError::validation(
                "invoice must contain at least one item",
            ));
        }
        if new_invoice.lines.iter().any(|line| line.quantity < 1) {
            return Err(InventoryError::validation(
                "invoice line quantity must be at least 1",
            ));
        }
        if let Some(shop_id) = new_invoice.shop_id {
            self.require_shop(shop_id).await?;
        }

        // Item lookups, snapshots and the stock check happen inside the
        // repository transaction.
        let invoice = self
            .invoices
            .create(&new_invoice, Some(actor.id))
            .await
            .map_err(typed("failed to create invoice"))?;

        self.log_activity(actor, "added new invoice").await;
        Ok(invoice)
    }

    pub async fn get_invoice(&self, id: i64) -> Result<Invoice, InventoryError> {
        self.require_invoice(id).await
    }

    pub async fn list_invoices(
        &self,
        filter: &InvoiceFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<Invoice>, u64), InventoryError> {
        self.invoices
            .list(filter, page, per_page)
            .await
            .map_err(typed("failed to list invoices"))
    }

    pub async fn delete_invoice(&self, actor: &User, id: i64) -> Result<(), InventoryError> {
        self.require_invoice(id).await?;

        let deleted = self
            .invoices
            .delete(id)
            .await
            .map_err(typed("failed to delete invoice"))?;
        if !deleted {
            return Err(InventoryError::not_found("invoice", id.to_string()));
        }

        self.log_activity(actor, &format!("deleted invoice - \"{}\"", id))
            .await;
        Ok(())
    }

    // ===== Reports =====

    pub async fn summary(&self) -> Result<InventorySummary, InventoryError> {
        let (total_inventory, total_group, total_shop) = self
            .reports
            .counts()
            .await
            .map_err(typed("failed to load summary counts"))?;
        let total_users = self.accounts.count_regular_users().await.map_err(|err| {
            tracing::error!(error = %err, "failed to count users for the summary");
            InventoryError::internal("failed to count users")
        })?;

        Ok(InventorySummary {
            total_inventory,
            total_group,
            total_shop,
            total_users,
        })
    }

    pub async fn top_selling(
        &self,
        range: Option<DateRange>,
    ) -> Result<Vec<TopSellingItem>, InventoryError> {
        self.reports
            .top_selling(range, TOP_SELLING_LIMIT)
            .await
            .map_err(typed("failed to load top selling report"))
    }

    pub async fn sales_by_shop(
        &self,
        range: Option<DateRange>,
    ) -> Result<Vec<ShopSales>, InventoryError> {
        self.reports
            .sales_by_shop(range)
            .await
            .map_err(typed("failed to load sales by shop"))
    }

    pub async fn monthly_sales(
        &self,
        range: Option<DateRange>,
    ) -> Result<Vec<MonthlySale>, InventoryError> {
        self.reports
            .monthly_sales(range)
            .await
            .map_err(typed("failed to load monthly sales"))
    }

    pub async fn purchase_summary(
        &self,
        range: Option<DateRange>,
    ) -> Result<PurchaseSummary, InventoryError> {
        self.reports
            .purchase_totals(range)
            .await
            .map_err(typed("failed to load purchase summary"))
    }

    // ===== Helpers =====

    async fn require_group(&self, id: i64) -> Result<Group, InventoryError> {
        self.groups
            .find_by_id(id)
            .await
            .map_err(typed("failed to load group"))?
            .ok_or_else(|| InventoryError::not_found("group", id.to_string()))
    }

    async fn require_item(&self, id: i64) -> Result<Item, InventoryError> {
        self.items
            .find_by_id(id)
            .await
            .map_err(typed("failed to load item"))?
            .ok_or_else(|| InventoryError::not_found("item", id.to_string()))
    }

    async fn require_shop(&self, id: i64) -> Result<Shop, InventoryError> {
        self.shops
            .find_by_id(id)
            .await
            .map_err(typed("failed to load shop"))?
            .ok_or_else(|| InventoryError::not_found("shop", id.to_string()))
    }

    async fn require_invoice(&self, id: i64) -> Result<Invoice, InventoryError> {
        self.invoices
            .find_by_id(id)
            .await
            .map_err(typed("failed to load invoice"))?
            .ok_or_else(|| InventoryError::not_found("invoice", id.to_string()))
    }

    /// Best-effort activity logging: a failed append must never fail
    /// the operation it annotates.
    async fn log_activity(&self, actor: &User, action: &str) {
        if let Err(err) = self.accounts.record_activity(actor, action).await {
            tracing::warn!(error = %err, action, "failed to record user activity");
        }
    }
}

fn valid_name(raw: &str, max_len: usize, what: &str) -> Result<String, InventoryError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(InventoryError::validation(format!(
            "{what} name must not be empty"
        )));
    }
    if name.chars().count() > max_len {
        return Err(InventoryError::validation(format!(
            "{what} name must be at most {max_len} characters"
        )));
    }
    Ok(name.to_string())
}

/// Unwrap typed inventory errors carried through `anyhow`, logging and
/// masking everything else.
fn typed(context: &'static str) -> impl FnOnce(anyhow::Error) -> InventoryError {
    move |err| match err.downcast::<InventoryError>() {
        Ok(typed) => typed,
        Err(err) => {
            tracing::error!(error = %err, context, "inventory storage operation failed");
            InventoryError::internal(context)
        }
    }
}
