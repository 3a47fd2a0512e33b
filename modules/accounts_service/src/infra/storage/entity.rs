//! SeaORM entities for the accounts tables

/// Users table entity
pub mod user {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "users")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,

        /// Login identifier, unique across the table
        pub email: String,

        pub fullname: String,

        /// Stored in string form: "admin", "creator" or "sale"
        pub role: String,

        /// `None` until first-login password setup completes
        pub password_hash: Option<String>,

        /// Superusers are excluded from regular user listings
        pub is_superuser: bool,

        pub is_active: bool,

        pub last_login: Option<DateTimeUtc>,

        pub created_at: DateTimeUtc,

        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        /// One-to-many relationship with the activity trail
        #[sea_orm(has_many = "super::activity::Entity")]
        Activities,
    }

    impl Related<super::activity::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Activities.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// User activity trail entity
pub mod activity {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "user_activities")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,

        /// Nulled when the user row is deleted; the denormalized
        /// email/fullname keep the entry readable
        pub user_id: Option<i64>,

        pub email: String,

        pub fullname: String,

        /// Human-readable description of what the user did
        pub action: String,

        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        /// Foreign key to users
        #[sea_orm(
            belongs_to = "super::user::Entity",
            from = "Column::UserId",
            to = "super::user::Column::Id"
        )]
        User,
    }

    impl Related<super::user::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::User.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}
