//! Native client implementation - wraps domain service for in-process calls

use async_trait::async_trait;
use std::sync::Arc;

use crate::contract::client::AccountsApi;
use crate::contract::error::AccountsError;
use crate::contract::model::User;
use crate::domain::Service;

/// Native client that directly calls the domain service.
///
/// Used for in-process communication, without HTTP overhead: the
/// inventory module records its audit entries and reads user counts
/// through this client, and the bearer extractor resolves token
/// subjects with it.
#[derive(Clone)]
pub struct NativeClient {
    service: Arc<Service>,
}

impl NativeClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl AccountsApi for NativeClient {
    async fn user_by_id(&self, id: i64) -> Result<Option<User>, AccountsError> {
        self.service.user_by_id(id).await
    }

    async fn record_activity(&self, actor: &User, action: &str) -> Result<(), AccountsError> {
        self.service.record_activity(actor, action).await
    }

    async fn count_regular_users(&self) -> Result<u64, AccountsError> {
        self.service.count_regular_users().await
    }
}
