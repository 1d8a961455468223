//! In-memory doubles shared by the unit tests of this crate.

use crate::config::ValidatorConfig;
use crate::domain::{RecordId, ValidationRecord, ValidationStatus};
use crate::ports::{AccountStore, ReferralNotifier, RewardLedger, ValidationStore};
use crate::service::ReferralValidator;
use crate::worker::ValidatorWorker;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use rg_02_risk_scoring::{
    combine, RiskAssessment, RiskScoringApi, RiskThresholds, SignalScores, SignalWeights,
};
use shared_types::{
    Account, AccountId, ExternalError, ExternalResult, MockTimeSource, TimeSource, Timestamp,
    UnitScore,
};
use std::collections::HashMap;
use std::sync::Arc;

pub fn t0() -> Timestamp {
    Utc.with_ymd_and_hms(2025, 4, 1, 8, 0, 0).unwrap()
}

#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<ValidationRecord>>,
    accounts: Mutex<HashMap<AccountId, Account>>,
    failing_reads: Mutex<HashMap<AccountId, ExternalError>>,
    decided_elsewhere: Mutex<bool>,
}

impl MemoryStore {
    pub fn record(&self, id: RecordId) -> ValidationRecord {
        self.records
            .lock()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .unwrap()
    }

    pub fn account(&self, id: AccountId) -> Account {
        self.accounts.lock().get(&id).cloned().unwrap()
    }

    pub fn put_account(&self, account: Account) {
        self.accounts.lock().insert(account.id, account);
    }

    pub fn remove_account(&self, id: AccountId) {
        self.accounts.lock().remove(&id);
    }

    /// The next `complete_if_pending` finds the record already rejected by
    /// another writer.
    pub fn decide_elsewhere_on_next_completion(&self) {
        *self.decided_elsewhere.lock() = true;
    }

    pub fn fail_account_reads_for(&self, id: AccountId, error: ExternalError) {
        self.failing_reads.lock().insert(id, error);
    }
}

#[async_trait]
impl ValidationStore for MemoryStore {
    async fn insert_if_absent(&self, record: ValidationRecord) -> ExternalResult<bool> {
        let mut records = self.records.lock();
        if records.iter().any(|r| r.referred_id == record.referred_id) {
            return Ok(false);
        }
        records.push(record);
        Ok(true)
    }

    async fn get_record(&self, record_id: RecordId) -> ExternalResult<Option<ValidationRecord>> {
        Ok(self.records.lock().iter().find(|r| r.id == record_id).cloned())
    }

    async fn fetch_oldest_pending(&self, limit: usize) -> ExternalResult<Vec<ValidationRecord>> {
        let mut pending: Vec<_> = self
            .records
            .lock()
            .iter()
            .filter(|r| r.is_pending())
            .cloned()
            .collect();
        pending.sort_by_key(|r| r.created_at);
        pending.truncate(limit);
        Ok(pending)
    }

    async fn complete_if_pending(
        &self,
        record_id: RecordId,
        status: ValidationStatus,
        reason: Option<String>,
    ) -> ExternalResult<bool> {
        let mut records = self.records.lock();
        let decided_elsewhere = std::mem::take(&mut *self.decided_elsewhere.lock());
        match records.iter_mut().find(|r| r.id == record_id) {
            Some(record) if decided_elsewhere => {
                record.status = ValidationStatus::Rejected;
                Ok(false)
            }
            Some(record) if record.is_pending() => {
                record.status = status;
                record.reason = reason;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn count_referrals_since(
        &self,
        referrer_id: AccountId,
        since: Timestamp,
    ) -> ExternalResult<u32> {
        let count = self
            .records
            .lock()
            .iter()
            .filter(|r| r.referrer_id == referrer_id && r.created_at >= since)
            .count();
        Ok(count as u32)
    }

    async fn find_by_referred(
        &self,
        referred_id: AccountId,
    ) -> ExternalResult<Option<ValidationRecord>> {
        Ok(self
            .records
            .lock()
            .iter()
            .find(|r| r.referred_id == referred_id)
            .cloned())
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn get_account(&self, account_id: AccountId) -> ExternalResult<Option<Account>> {
        if let Some(err) = self.failing_reads.lock().get(&account_id) {
            return Err(err.clone());
        }
        Ok(self.accounts.lock().get(&account_id).cloned())
    }

    async fn update_risk_score(&self, account_id: AccountId, risk: UnitScore) -> ExternalResult<()> {
        if let Some(account) = self.accounts.lock().get_mut(&account_id) {
            account.risk_score = Some(risk);
        }
        Ok(())
    }

    async fn increment_validated_referrals(&self, account_id: AccountId) -> ExternalResult<u32> {
        let mut accounts = self.accounts.lock();
        let account = accounts
            .get_mut(&account_id)
            .ok_or(ExternalError::UserNotFound)?;
        account.validated_referrals += 1;
        Ok(account.validated_referrals)
    }
}

/// Returns the same risk for every account.
pub struct FixedRisk(pub f64);

#[async_trait]
impl RiskScoringApi for FixedRisk {
    async fn assess(&self, _account: &Account, thresholds: &RiskThresholds) -> RiskAssessment {
        // All-equal signals make trust equal to that signal.
        let trust = UnitScore::clamped(1.0 - self.0);
        let signals = SignalScores {
            account_age: trust,
            challenge: trust,
            subscribe_timing: trust,
            profile: trust,
            activity: trust,
        };
        let mut assessment = combine(&signals, &SignalWeights::DEFAULT, thresholds.rejection_threshold);
        assessment.risk = UnitScore::clamped(self.0);
        assessment.high_risk = thresholds.rejects(self.0);
        assessment
    }
}

/// Idempotent by key, like the real ledger.
#[derive(Default)]
pub struct RecordingLedger {
    credits: Mutex<Vec<(AccountId, f64, String)>>,
}

impl RecordingLedger {
    pub fn credits(&self) -> Vec<(AccountId, f64, String)> {
        self.credits.lock().clone()
    }
}

#[async_trait]
impl RewardLedger for RecordingLedger {
    async fn credit(
        &self,
        account_id: AccountId,
        amount: f64,
        idempotency_key: &str,
    ) -> ExternalResult<()> {
        let mut credits = self.credits.lock();
        if !credits.iter().any(|c| c.2 == idempotency_key) {
            credits.push((account_id, amount, idempotency_key.to_string()));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct FlakyNotifier {
    failure: Mutex<Option<ExternalError>>,
    sent: Mutex<Vec<(AccountId, String)>>,
}

impl FlakyNotifier {
    pub fn fail_with(&self, error: ExternalError) {
        *self.failure.lock() = Some(error);
    }
}

#[async_trait]
impl ReferralNotifier for FlakyNotifier {
    async fn send_message(&self, account_id: AccountId, text: &str) -> ExternalResult<()> {
        if let Some(err) = self.failure.lock().clone() {
            return Err(err);
        }
        self.sent.lock().push((account_id, text.to_string()));
        Ok(())
    }
}

pub type TestValidator =
    ReferralValidator<MemoryStore, FixedRisk, RecordingLedger, FlakyNotifier, MockTimeSource>;
pub type TestWorker = ValidatorWorker<TestValidator, MemoryStore, MockTimeSource>;

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub ledger: Arc<RecordingLedger>,
    pub notifier: Arc<FlakyNotifier>,
    pub clock: Arc<MockTimeSource>,
    pub validator: Arc<TestValidator>,
}

impl Harness {
    /// Validator with the default one-hour quarantine and a fixed risk.
    pub fn new(risk: f64) -> Self {
        let store = Arc::new(MemoryStore::default());
        let ledger = Arc::new(RecordingLedger::default());
        let notifier = Arc::new(FlakyNotifier::default());
        let clock = Arc::new(MockTimeSource::new(t0()));
        let validator = Arc::new(ReferralValidator::new(
            ValidatorConfig::for_testing(),
            store.clone(),
            Arc::new(FixedRisk(risk)),
            ledger.clone(),
            notifier.clone(),
            clock.clone(),
        ));
        Self {
            store,
            ledger,
            notifier,
            clock,
            validator,
        }
    }

    /// Both accounts exist; the referred one optionally subscribed.
    pub async fn pending_referral(
        &self,
        referrer_id: AccountId,
        referred_id: AccountId,
        subscribed: bool,
    ) -> ValidationRecord {
        let now = self.clock.now();
        if self.store.accounts.lock().get(&referrer_id).is_none() {
            self.store.put_account(Account::new(referrer_id, now));
        }
        let mut referred = Account::new(referred_id, now).with_referrer(referrer_id);
        if subscribed {
            referred.confirm_subscription(now);
        }
        self.store.put_account(referred);

        let record = ValidationRecord::new(referrer_id, referred_id, now);
        assert!(self.store.insert_if_absent(record.clone()).await.unwrap());
        record
    }
}
