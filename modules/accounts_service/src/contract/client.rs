//! Client trait for in-process consumers of the accounts service.

use async_trait::async_trait;

use super::error::AccountsError;
use super::model::User;

/// What other modules need from accounts: actor lookup for request
/// authentication, activity recording for their own audit trails, and
/// the regular-user headcount shown on the dashboard summary.
#[async_trait]
pub trait AccountsApi: Send + Sync {
    /// Look up a user by id. `Ok(None)` when no such user exists.
    async fn user_by_id(&self, id: i64) -> Result<Option<User>, AccountsError>;

    /// Append an entry to the activity trail on behalf of `actor`.
    async fn record_activity(&self, actor: &User, action: &str) -> Result<(), AccountsError>;

    /// Number of non-superuser accounts.
    async fn count_regular_users(&self) -> Result<u64, AccountsError>;
}
