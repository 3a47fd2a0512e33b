//! Persistence traits for the accounts service.
//!
//! Implemented by SeaORM repositories in `infra::storage` and by
//! in-memory mocks in tests.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::contract::model::{NewActivity, NewUser, User, UserActivity};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user without a password hash and return the stored row.
    async fn create(&self, new_user: &NewUser) -> Result<User>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn set_password_hash(&self, id: i64, hash: &str) -> Result<()>;

    async fn set_last_login(&self, id: i64, at: DateTime<Utc>) -> Result<()>;

    /// Non-superuser accounts, newest first. `page` is 1-based.
    /// Returns the page of users and the total match count.
    async fn list_regular(&self, page: u64, per_page: u64) -> Result<(Vec<User>, u64)>;

    async fn count_regular(&self) -> Result<u64>;
}

#[async_trait]
pub trait ActivityRepository: Send + Sync {
    async fn append(&self, activity: &NewActivity) -> Result<UserActivity>;

    /// Activity entries, newest first. `page` is 1-based.
    /// Returns the page of entries and the total count.
    async fn list(&self, page: u64, per_page: u64) -> Result<(Vec<UserActivity>, u64)>;
}
