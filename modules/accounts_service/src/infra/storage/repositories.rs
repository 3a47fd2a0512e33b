//! SeaORM repository implementations

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    prelude::Expr, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, SqlErr,
};
use std::sync::Arc;

use super::{entity, mapper};
use crate::contract::error::AccountsError;
use crate::contract::model::{NewActivity, NewUser, User, UserActivity};
use crate::domain::repository::{ActivityRepository, UserRepository};

// ===== User Repository =====

pub struct SeaOrmUserRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmUserRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create(&self, new_user: &NewUser) -> Result<User> {
        let active = mapper::new_user_active_model(new_user);

        match entity::user::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await
        {
            Ok(model) => model.try_into(),
            // Lost the race against a concurrent insert on the unique
            // email index; report it as the typed conflict.
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(AccountsError::email_taken(new_user.email.clone()).into())
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let result = entity::user::Entity::find_by_id(id).one(&*self.db).await?;

        match result {
            Some(model) => Ok(Some(model.try_into()?)),
            None => Ok(None),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let result = entity::user::Entity::find()
            .filter(entity::user::Column::Email.eq(email))
            .one(&*self.db)
            .await?;

        match result {
            Some(model) => Ok(Some(model.try_into()?)),
            None => Ok(None),
        }
    }

    async fn set_password_hash(&self, id: i64, hash: &str) -> Result<()> {
        entity::user::Entity::update_many()
            .col_expr(
                entity::user::Column::PasswordHash,
                Expr::value(Some(hash.to_string())),
            )
            .col_expr(entity::user::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(entity::user::Column::Id.eq(id))
            .exec(&*self.db)
            .await?;

        Ok(())
    }

    async fn set_last_login(&self, id: i64, at: DateTime<Utc>) -> Result<()> {
        entity::user::Entity::update_many()
            .col_expr(entity::user::Column::LastLogin, Expr::value(Some(at)))
            .filter(entity::user::Column::Id.eq(id))
            .exec(&*self.db)
            .await?;

        Ok(())
    }

    async fn list_regular(&self, page: u64, per_page: u64) -> Result<(Vec<User>, u64)> {
        let paginator = entity::user::Entity::find()
            .filter(entity::user::Column::IsSuperuser.eq(false))
            .order_by_desc(entity::user::Column::CreatedAt)
            .order_by_desc(entity::user::Column::Id)
            .paginate(&*self.db, per_page);

        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.saturating_sub(1)).await?;
        let users = models
            .into_iter()
            .map(User::try_from)
            .collect::<Result<Vec<_>>>()?;

        Ok((users, total))
    }

    async fn count_regular(&self) -> Result<u64> {
        let count = entity::user::Entity::find()
            .filter(entity::user::Column::IsSuperuser.eq(false))
            .count(&*self.db)
            .await?;

        Ok(count)
    }
}

// ===== Activity Repository =====

pub struct SeaOrmActivityRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmActivityRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ActivityRepository for SeaOrmActivityRepository {
    async fn append(&self, activity: &NewActivity) -> Result<UserActivity> {
        let active = mapper::new_activity_active_model(activity);

        let model = entity::activity::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await?;

        Ok(model.into())
    }

    async fn list(&self, page: u64, per_page: u64) -> Result<(Vec<UserActivity>, u64)> {
        let paginator = entity::activity::Entity::find()
            .order_by_desc(entity::activity::Column::CreatedAt)
            .order_by_desc(entity::activity::Column::Id)
            .paginate(&*self.db, per_page);

        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((models.into_iter().map(UserActivity::from).collect(), total))
    }
}
