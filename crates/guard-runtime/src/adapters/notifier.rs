//! Outbound notification adapter.

use async_trait::async_trait;
use parking_lot::Mutex;
use rg_03_referral_validation::ReferralNotifier;
use shared_types::{AccountId, ExternalError, ExternalResult};
use std::collections::HashSet;
use tracing::info;

/// Logs each message and keeps a copy. Users who blocked the bot can be
/// simulated with [`block`](Self::block).
#[derive(Default)]
pub struct LoggingNotifier {
    sent: Mutex<Vec<(AccountId, String)>>,
    blocked: Mutex<HashSet<AccountId>>,
}

impl LoggingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn block(&self, account_id: AccountId) {
        self.blocked.lock().insert(account_id);
    }

    pub fn sent(&self) -> Vec<(AccountId, String)> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl ReferralNotifier for LoggingNotifier {
    async fn send_message(&self, account_id: AccountId, text: &str) -> ExternalResult<()> {
        if self.blocked.lock().contains(&account_id) {
            return Err(ExternalError::Unknown("bot was blocked by the user".into()));
        }
        info!(account_id, text, "Message sent");
        self.sent.lock().push((account_id, text.to_string()));
        Ok(())
    }
}
