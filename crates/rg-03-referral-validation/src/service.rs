//! Referral Validator - the exactly-once decision procedure.

use crate::config::ValidatorConfig;
use crate::domain::{
    evaluate_precheck, transition, Decision, DecisionReport, Precheck, RecordId, RejectReason,
    ValidationError, ValidationRecord, ValidationResult,
};
use crate::metrics;
use crate::ports::{
    AccountStore, ReferralNotifier, ReferralValidationApi, RewardLedger, ValidationStore,
};
use async_trait::async_trait;
use dashmap::DashMap;
use rg_02_risk_scoring::{RiskAssessment, RiskScoringApi};
use shared_types::TimeSource;
use std::sync::Arc;
use tracing::{error, info, warn};

const ACCEPTED_MESSAGE: &str =
    "Referral confirmed! Your invited member passed verification and your reward has been credited.";
const REJECTED_MESSAGE: &str = "Referral not confirmed. The invited user did not pass the \
     security check. Make sure you only invite real people.";

/// Decides referral records.
///
/// ## Dependencies
///
/// - `S: ValidationStore + AccountStore` - records and accounts
/// - `R: RiskScoringApi` - risk assessment
/// - `L: RewardLedger` - referrer credit
/// - `N: ReferralNotifier` - best-effort referrer message
/// - `T: TimeSource` - quarantine clock
pub struct ReferralValidator<S, R, L, N, T>
where
    S: ValidationStore + AccountStore,
    R: RiskScoringApi,
    L: RewardLedger,
    N: ReferralNotifier,
    T: TimeSource,
{
    config: ValidatorConfig,
    store: Arc<S>,
    risk: Arc<R>,
    ledger: Arc<L>,
    notifier: Arc<N>,
    clock: Arc<T>,
    /// Serialises concurrent `decide` calls for the same record.
    record_locks: DashMap<RecordId, Arc<tokio::sync::Mutex<()>>>,
}

impl<S, R, L, N, T> ReferralValidator<S, R, L, N, T>
where
    S: ValidationStore + AccountStore,
    R: RiskScoringApi,
    L: RewardLedger,
    N: ReferralNotifier,
    T: TimeSource,
{
    pub fn new(
        config: ValidatorConfig,
        store: Arc<S>,
        risk: Arc<R>,
        ledger: Arc<L>,
        notifier: Arc<N>,
        clock: Arc<T>,
    ) -> Self {
        Self {
            config,
            store,
            risk,
            ledger,
            notifier,
            clock,
            record_locks: DashMap::new(),
        }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    fn lock_for(&self, record_id: RecordId) -> Arc<tokio::sync::Mutex<()>> {
        self.record_locks
            .entry(record_id)
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    /// Drop the lock entry unless another caller is queued on it.
    fn release_lock(&self, record_id: RecordId) {
        self.record_locks
            .remove_if(&record_id, |_, lock| Arc::strong_count(lock) == 1);
    }

    async fn decide_locked(&self, record_id: RecordId) -> ValidationResult<DecisionReport> {
        let record = self
            .store
            .get_record(record_id)
            .await?
            .ok_or(ValidationError::RecordNotFound(record_id))?;

        if !record.is_pending() {
            return Err(ValidationError::AlreadyDecided {
                record_id,
                status: record.status,
            });
        }

        let quarantine = self.config.thresholds.quarantine();
        if record.in_quarantine(self.clock.now(), quarantine) {
            return Err(ValidationError::QuarantineActive {
                record_id,
                until: record.quarantine_ends_at(quarantine),
            });
        }

        let (decision, assessment) = self.evaluate(&record).await?;
        let status = transition(record.status, decision.status())?;

        if !self
            .store
            .complete_if_pending(record_id, status, decision.reason_tag())
            .await?
        {
            // Lost to a writer outside this process.
            return Err(ValidationError::AlreadyDecided { record_id, status });
        }

        if let Some(assessment) = &assessment {
            if let Err(e) = self
                .store
                .update_risk_score(record.referred_id, assessment.risk)
                .await
            {
                warn!(
                    %record_id,
                    referred_id = record.referred_id,
                    error = %e,
                    "Failed to store risk score"
                );
            }
        }

        match &decision {
            Decision::Accept => info!(
                %record_id,
                referrer_id = record.referrer_id,
                referred_id = record.referred_id,
                risk_score = ?assessment.map(|a| a.risk.value()),
                "Referral accepted"
            ),
            Decision::Reject(reason) => info!(
                %record_id,
                referrer_id = record.referrer_id,
                referred_id = record.referred_id,
                reason = %reason,
                "Referral rejected"
            ),
        }
        metrics::record_decision(&decision);

        let reward_credited = if decision.is_accept() {
            self.reward_referrer(&record).await
        } else {
            false
        };
        let notified = self.notify_referrer(&record, &decision).await;

        Ok(DecisionReport {
            record_id,
            referrer_id: record.referrer_id,
            referred_id: record.referred_id,
            decision,
            assessment,
            reward_credited,
            notified,
        })
    }

    /// Pre-checks, then risk.
    async fn evaluate(
        &self,
        record: &ValidationRecord,
    ) -> ValidationResult<(Decision, Option<RiskAssessment>)> {
        let account = self.store.get_account(record.referred_id).await?;
        let account = match evaluate_precheck(account.as_ref()) {
            Precheck::Reject(reason) => return Ok((Decision::Reject(reason), None)),
            Precheck::Score(account) => account,
        };

        let assessment = self.risk.assess(account, &self.config.thresholds).await;

        let decision = if assessment.high_risk {
            Decision::Reject(RejectReason::HighRiskScore(assessment.risk.value()))
        } else {
            Decision::Accept
        };
        Ok((decision, Some(assessment)))
    }

    /// Counter and credit. The decision is already durable, so failures here
    /// are logged for reconciliation rather than returned.
    async fn reward_referrer(&self, record: &ValidationRecord) -> bool {
        if let Err(e) = self
            .store
            .increment_validated_referrals(record.referrer_id)
            .await
        {
            error!(
                record_id = %record.id,
                referrer_id = record.referrer_id,
                error = %e,
                "Failed to increment validated referrals"
            );
        }

        let key = record.id.to_string();
        match self
            .ledger
            .credit(record.referrer_id, self.config.reward_amount, &key)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                error!(
                    record_id = %record.id,
                    referrer_id = record.referrer_id,
                    error = %e,
                    "Reward credit failed"
                );
                false
            }
        }
    }

    async fn notify_referrer(&self, record: &ValidationRecord, decision: &Decision) -> bool {
        let text = match decision {
            Decision::Accept => ACCEPTED_MESSAGE,
            Decision::Reject(_) => REJECTED_MESSAGE,
        };
        match self.notifier.send_message(record.referrer_id, text).await {
            Ok(()) => true,
            Err(e) => {
                // Typically the referrer blocked the bot.
                warn!(referrer_id = record.referrer_id, error = %e, "Referrer notification failed");
                false
            }
        }
    }
}

#[async_trait]
impl<S, R, L, N, T> ReferralValidationApi for ReferralValidator<S, R, L, N, T>
where
    S: ValidationStore + AccountStore,
    R: RiskScoringApi,
    L: RewardLedger,
    N: ReferralNotifier,
    T: TimeSource,
{
    async fn decide(&self, record_id: RecordId) -> ValidationResult<DecisionReport> {
        let lock = self.lock_for(record_id);
        let result = {
            let _guard = lock.lock().await;
            self.decide_locked(record_id).await
        };
        drop(lock);
        self.release_lock(record_id);
        result
    }
}
