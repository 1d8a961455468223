//! Driven ports (Outbound dependencies)

use async_trait::async_trait;
use shared_types::{AccountId, AccountProfile, ExternalResult};

/// Public profile lookup (the chat API's `getChat`).
#[async_trait]
pub trait ProfileProvider: Send + Sync {
    async fn get_profile(&self, account_id: AccountId) -> ExternalResult<AccountProfile>;
}
