//! SeaORM entities for the inventory tables

/// Inventory groups entity
pub mod group {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "inventory_groups")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,

        /// Nulled when the creating user is deleted
        pub created_by: Option<i64>,

        /// Unique across the table
        pub name: String,

        /// Parent group; nulled when the parent is deleted
        pub belongs_to: Option<i64>,

        pub created_at: DateTimeUtc,

        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        /// Self-referencing parent group
        #[sea_orm(belongs_to = "Entity", from = "Column::BelongsTo", to = "Column::Id")]
        Parent,

        #[sea_orm(
            belongs_to = "super::creator::Entity",
            from = "Column::CreatedBy",
            to = "super::creator::Column::Id"
        )]
        Creator,

        #[sea_orm(has_many = "super::item::Entity")]
        Items,
    }

    impl Related<super::item::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Items.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Inventory items entity
pub mod item {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "inventory_items")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,

        pub created_by: Option<i64>,

        /// Server-assigned after insert; unique
        pub code: Option<String>,

        pub photo_url: Option<String>,

        /// Nulled when the group is deleted
        pub group_id: Option<i64>,

        /// Units ever stocked
        pub total: i64,

        /// Units still on hand
        pub remaining: Option<i64>,

        pub name: String,

        pub price: f64,

        pub created_at: DateTimeUtc,

        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::group::Entity",
            from = "Column::GroupId",
            to = "super::group::Column::Id"
        )]
        Group,

        #[sea_orm(
            belongs_to = "super::creator::Entity",
            from = "Column::CreatedBy",
            to = "super::creator::Column::Id"
        )]
        Creator,

        #[sea_orm(has_many = "super::invoice_item::Entity")]
        InvoiceItems,
    }

    impl Related<super::group::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Group.def()
        }
    }

    impl Related<super::invoice_item::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::InvoiceItems.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Shops entity
pub mod shop {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "shops")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,

        pub created_by: Option<i64>,

        /// Unique across the table
        pub name: String,

        pub created_at: DateTimeUtc,

        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::creator::Entity",
            from = "Column::CreatedBy",
            to = "super::creator::Column::Id"
        )]
        Creator,

        #[sea_orm(has_many = "super::invoice::Entity")]
        Invoices,
    }

    impl Related<super::invoice::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Invoices.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Invoices entity
pub mod invoice {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "invoices")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,

        pub created_by: Option<i64>,

        /// Nulled when the shop is deleted
        pub shop_id: Option<i64>,

        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::shop::Entity",
            from = "Column::ShopId",
            to = "super::shop::Column::Id"
        )]
        Shop,

        #[sea_orm(
            belongs_to = "super::creator::Entity",
            from = "Column::CreatedBy",
            to = "super::creator::Column::Id"
        )]
        Creator,

        #[sea_orm(has_many = "super::invoice_item::Entity")]
        Lines,
    }

    impl Related<super::shop::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Shop.def()
        }
    }

    impl Related<super::invoice_item::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Lines.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Invoice line items entity
pub mod invoice_item {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "invoice_items")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,

        /// Rows are removed with their invoice
        pub invoice_id: i64,

        /// Nulled when the item is deleted; the snapshot columns keep
        /// the line readable
        pub item_id: Option<i64>,

        pub item_name: Option<String>,

        pub item_code: Option<String>,

        pub quantity: i64,

        /// Quantity times the unit price at sale time
        pub amount: Option<f64>,

        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::invoice::Entity",
            from = "Column::InvoiceId",
            to = "super::invoice::Column::Id"
        )]
        Invoice,

        #[sea_orm(
            belongs_to = "super::item::Entity",
            from = "Column::ItemId",
            to = "super::item::Column::Id"
        )]
        Item,
    }

    impl Related<super::invoice::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Invoice.def()
        }
    }

    impl Related<super::item::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Item.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Read-only view of the accounts `users` table, just wide enough for
/// keyword searches over creator fullname and email. The table itself
/// is owned and migrated by the accounts module.
pub mod creator {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "users")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,

        pub email: String,

        pub fullname: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}
