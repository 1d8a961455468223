//! Driven ports (Outbound dependencies)

use crate::domain::{RecordId, ValidationRecord, ValidationStatus};
use async_trait::async_trait;
use shared_types::{Account, AccountId, ExternalResult, Timestamp, UnitScore};

/// Persistence for validation records.
#[async_trait]
pub trait ValidationStore: Send + Sync {
    /// Store `record` unless a record for the same referred account already
    /// exists. The check and the write MUST be one atomic step (a unique key
    /// on `referred_id` in a relational store). Returns `false`, writing
    /// nothing, when a record already exists.
    async fn insert_if_absent(&self, record: ValidationRecord) -> ExternalResult<bool>;

    async fn get_record(&self, record_id: RecordId) -> ExternalResult<Option<ValidationRecord>>;

    /// Up to `limit` `Pending` records, oldest `created_at` first.
    async fn fetch_oldest_pending(&self, limit: usize) -> ExternalResult<Vec<ValidationRecord>>;

    /// Atomically set the terminal status if, and only if, the record is
    /// still `Pending`. Returns whether this call performed the transition.
    async fn complete_if_pending(
        &self,
        record_id: RecordId,
        status: ValidationStatus,
        reason: Option<String>,
    ) -> ExternalResult<bool>;

    /// Records created by `referrer_id` at or after `since`.
    async fn count_referrals_since(
        &self,
        referrer_id: AccountId,
        since: Timestamp,
    ) -> ExternalResult<u32>;

    async fn find_by_referred(
        &self,
        referred_id: AccountId,
    ) -> ExternalResult<Option<ValidationRecord>>;
}

/// The account fields the validator reads and writes.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn get_account(&self, account_id: AccountId) -> ExternalResult<Option<Account>>;

    async fn update_risk_score(&self, account_id: AccountId, risk: UnitScore)
        -> ExternalResult<()>;

    /// Returns the new counter value.
    async fn increment_validated_referrals(&self, account_id: AccountId) -> ExternalResult<u32>;
}

/// External reward ledger.
#[async_trait]
pub trait RewardLedger: Send + Sync {
    /// Credit `amount`. The ledger must apply a given `idempotency_key` at
    /// most once.
    async fn credit(
        &self,
        account_id: AccountId,
        amount: f64,
        idempotency_key: &str,
    ) -> ExternalResult<()>;
}

/// Outbound message to the referrer. Best effort.
#[async_trait]
pub trait ReferralNotifier: Send + Sync {
    async fn send_message(&self, account_id: AccountId, text: &str) -> ExternalResult<()>;
}
