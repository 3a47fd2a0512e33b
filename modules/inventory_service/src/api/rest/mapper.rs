//! Domain model to DTO conversions

use crate::contract::model::{
    Group, InventorySummary, Invoice, InvoiceLine, Item, MonthlySale, PurchaseSummary, Shop,
    ShopSales, TopSellingItem,
};

use super::dto::{
    GroupDto, InvoiceDto, InvoiceItemDto, ItemDto, MonthlySaleDto, PurchaseSummaryDto, ShopDto,
    ShopSalesDto, SummaryDto, TopSellingDto,
};

impl From<Group> for GroupDto {
    fn from(group: Group) -> Self {
        Self {
            id: group.id,
            created_by: group.created_by,
            name: group.name,
            belongs_to: group.belongs_to,
            total_items: group.total_items,
            created_at: group.created_at,
            updated_at: group.updated_at,
        }
    }
}

impl From<Item> for ItemDto {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            created_by: item.created_by,
            code: item.code,
            photo_url: item.photo_url,
            group_id: item.group_id,
            total: item.total,
            remaining: item.remaining,
            name: item.name,
            price: item.price,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

impl From<Shop> for ShopDto {
    fn from(shop: Shop) -> Self {
        Self {
            id: shop.id,
            created_by: shop.created_by,
            name: shop.name,
            created_at: shop.created_at,
            updated_at: shop.updated_at,
        }
    }
}

impl From<Invoice> for InvoiceDto {
    fn from(invoice: Invoice) -> Self {
        Self {
            id: invoice.id,
            created_by: invoice.created_by,
            shop_id: invoice.shop_id,
            shop_name: invoice.shop_name,
            created_at: invoice.created_at,
            items: invoice.items.into_iter().map(InvoiceItemDto::from).collect(),
        }
    }
}

impl From<InvoiceLine> for InvoiceItemDto {
    fn from(line: InvoiceLine) -> Self {
        Self {
            id: line.id,
            item_id: line.item_id,
            item_name: line.item_name,
            item_code: line.item_code,
            quantity: line.quantity,
            amount: line.amount,
            created_at: line.created_at,
        }
    }
}

impl From<InventorySummary> for SummaryDto {
    fn from(summary: InventorySummary) -> Self {
        Self {
            total_inventory: summary.total_inventory,
            total_group: summary.total_group,
            total_shop: summary.total_shop,
            total_users: summary.total_users,
        }
    }
}

impl From<TopSellingItem> for TopSellingDto {
    fn from(row: TopSellingItem) -> Self {
        Self {
            id: row.id,
            name: row.name,
            code: row.code,
            price: row.price,
            sum_of_item: row.sold,
        }
    }
}

impl From<ShopSales> for ShopSalesDto {
    fn from(row: ShopSales) -> Self {
        Self {
            id: row.id,
            name: row.name,
            amount_total: row.amount_total,
        }
    }
}

impl From<MonthlySale> for MonthlySaleDto {
    fn from(row: MonthlySale) -> Self {
        Self {
            month: row.month.format("%Y-%m").to_string(),
            name: row.name,
            amount_total: row.amount_total,
        }
    }
}

impl From<PurchaseSummary> for PurchaseSummaryDto {
    fn from(summary: PurchaseSummary) -> Self {
        Self {
            price: format!("{:.2}", summary.amount_total),
            count: summary.count,
        }
    }
}
