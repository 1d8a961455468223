//! In-memory bot database.
//!
//! Stands in for the external store: accounts, public profiles, challenge
//! sessions and referral validation records. Conditional updates
//! (`mark_solved`, `complete_if_pending`) are atomic under one lock.

use async_trait::async_trait;
use parking_lot::RwLock;
use rg_01_challenge::{ChallengeScoreSink, ChallengeSession, ChallengeSessionStore, SessionId};
use rg_02_risk_scoring::ProfileProvider;
use rg_03_referral_validation::{
    AccountStore, RecordId, ValidationRecord, ValidationStatus, ValidationStore,
};
use shared_types::{
    Account, AccountId, AccountProfile, ExternalError, ExternalResult, Timestamp, UnitScore,
};
use std::collections::HashMap;

#[derive(Default)]
struct Tables {
    accounts: HashMap<AccountId, Account>,
    profiles: HashMap<AccountId, AccountProfile>,
    sessions: HashMap<SessionId, ChallengeSession>,
    records: HashMap<RecordId, ValidationRecord>,
}

#[derive(Default)]
pub struct BotDatabase {
    tables: RwLock<Tables>,
}

impl BotDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an account.
    pub fn upsert_account(&self, account: Account) {
        self.tables.write().accounts.insert(account.id, account);
    }

    pub fn account(&self, account_id: AccountId) -> Option<Account> {
        self.tables.read().accounts.get(&account_id).cloned()
    }

    pub fn remove_account(&self, account_id: AccountId) {
        self.tables.write().accounts.remove(&account_id);
    }

    /// Set by the external subscription check.
    pub fn confirm_subscription(&self, account_id: AccountId, at: Timestamp) -> bool {
        match self.tables.write().accounts.get_mut(&account_id) {
            Some(account) => {
                account.confirm_subscription(at);
                true
            }
            None => false,
        }
    }

    pub fn set_profile(&self, account_id: AccountId, profile: AccountProfile) {
        self.tables.write().profiles.insert(account_id, profile);
    }

    pub fn record(&self, record_id: RecordId) -> Option<ValidationRecord> {
        self.tables.read().records.get(&record_id).cloned()
    }

    pub fn pending_count(&self) -> usize {
        self.tables
            .read()
            .records
            .values()
            .filter(|record| record.is_pending())
            .count()
    }
}

#[async_trait]
impl ChallengeSessionStore for BotDatabase {
    async fn insert(&self, session: ChallengeSession) -> ExternalResult<()> {
        self.tables.write().sessions.insert(session.id, session);
        Ok(())
    }

    async fn get(&self, session_id: SessionId) -> ExternalResult<Option<ChallengeSession>> {
        Ok(self.tables.read().sessions.get(&session_id).cloned())
    }

    async fn mark_solved(&self, session_id: SessionId, latency_secs: f64) -> ExternalResult<bool> {
        let mut tables = self.tables.write();
        match tables.sessions.get_mut(&session_id) {
            Some(session) if !session.solved => {
                session.solved = true;
                session.solve_latency_secs = Some(latency_secs);
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Err(ExternalError::Unknown(format!(
                "challenge session {session_id} vanished"
            ))),
        }
    }
}

#[async_trait]
impl ChallengeScoreSink for BotDatabase {
    async fn record_challenge_score(
        &self,
        account_id: AccountId,
        score: UnitScore,
    ) -> ExternalResult<()> {
        let mut tables = self.tables.write();
        let account = tables
            .accounts
            .get_mut(&account_id)
            .ok_or(ExternalError::UserNotFound)?;
        account.challenge_score = Some(score);
        Ok(())
    }
}

#[async_trait]
impl ProfileProvider for BotDatabase {
    async fn get_profile(&self, account_id: AccountId) -> ExternalResult<AccountProfile> {
        self.tables
            .read()
            .profiles
            .get(&account_id)
            .cloned()
            .ok_or(ExternalError::UserNotFound)
    }
}

#[async_trait]
impl ValidationStore for BotDatabase {
    async fn insert_if_absent(&self, record: ValidationRecord) -> ExternalResult<bool> {
        let mut tables = self.tables.write();
        if tables
            .records
            .values()
            .any(|existing| existing.referred_id == record.referred_id)
        {
            return Ok(false);
        }
        tables.records.insert(record.id, record);
        Ok(true)
    }

    async fn get_record(&self, record_id: RecordId) -> ExternalResult<Option<ValidationRecord>> {
        Ok(self.record(record_id))
    }

    async fn fetch_oldest_pending(&self, limit: usize) -> ExternalResult<Vec<ValidationRecord>> {
        let mut pending: Vec<_> = self
            .tables
            .read()
            .records
            .values()
            .filter(|record| record.is_pending())
            .cloned()
            .collect();
        pending.sort_by_key(|record| (record.created_at, record.id));
        pending.truncate(limit);
        Ok(pending)
    }

    async fn complete_if_pending(
        &self,
        record_id: RecordId,
        status: ValidationStatus,
        reason: Option<String>,
    ) -> ExternalResult<bool> {
        let mut tables = self.tables.write();
        match tables.records.get_mut(&record_id) {
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
            .tables
            .read()
            .records
            .values()
            .filter(|record| record.referrer_id == referrer_id && record.created_at >= since)
            .count();
        Ok(count as u32)
    }

    async fn find_by_referred(
        &self,
        referred_id: AccountId,
    ) -> ExternalResult<Option<ValidationRecord>> {
        Ok(self
            .tables
            .read()
            .records
            .values()
            .find(|record| record.referred_id == referred_id)
            .cloned())
    }
}

#[async_trait]
impl AccountStore for BotDatabase {
    async fn get_account(&self, account_id: AccountId) -> ExternalResult<Option<Account>> {
        Ok(self.account(account_id))
    }

    async fn update_risk_score(&self, account_id: AccountId, risk: UnitScore) -> ExternalResult<()> {
        if let Some(account) = self.tables.write().accounts.get_mut(&account_id) {
            account.risk_score = Some(risk);
        }
        Ok(())
    }

    async fn increment_validated_referrals(&self, account_id: AccountId) -> ExternalResult<u32> {
        let mut tables = self.tables.write();
        let account = tables
            .accounts
            .get_mut(&account_id)
            .ok_or(ExternalError::UserNotFound)?;
        account.validated_referrals += 1;
        Ok(account.validated_referrals)
    }
}
