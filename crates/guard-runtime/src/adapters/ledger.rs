//! Reward ledger adapter.
//!
//! Balance accounting belongs to the payment side; this adapter keeps running
//! totals in memory and applies each idempotency key at most once.

use async_trait::async_trait;
use parking_lot::Mutex;
use rg_03_referral_validation::RewardLedger;
use shared_types::{AccountId, ExternalError, ExternalResult};
use std::collections::HashMap;
use tracing::{debug, info};

#[derive(Default)]
struct LedgerState {
    applied: HashMap<String, (AccountId, f64)>,
    balances: HashMap<AccountId, f64>,
}

#[derive(Default)]
pub struct LoggingLedger {
    state: Mutex<LedgerState>,
}

impl LoggingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self, account_id: AccountId) -> f64 {
        self.state
            .lock()
            .balances
            .get(&account_id)
            .copied()
            .unwrap_or_default()
    }

    /// Number of distinct credits applied.
    pub fn credit_count(&self) -> usize {
        self.state.lock().applied.len()
    }
}

#[async_trait]
impl RewardLedger for LoggingLedger {
    async fn credit(
        &self,
        account_id: AccountId,
        amount: f64,
        idempotency_key: &str,
    ) -> ExternalResult<()> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(ExternalError::Unknown(format!("invalid credit amount {amount}")));
        }

        let mut state = self.state.lock();
        if state.applied.contains_key(idempotency_key) {
            debug!(account_id, idempotency_key, "Credit already applied");
            return Ok(());
        }
        state
            .applied
            .insert(idempotency_key.to_string(), (account_id, amount));
        let balance = state.balances.entry(account_id).or_default();
        *balance += amount;
        info!(account_id, amount, balance = *balance, idempotency_key, "Reward credited");
        Ok(())
    }
}
