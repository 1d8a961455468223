//! Risk Scorer - gathers signals for one account and combines them.

use crate::config::RiskThresholds;
use crate::domain::{
    account_age_score, combine, profile_score, subscribe_timing_score, RiskAssessment,
    SignalScores, SignalWeights, ACTIVITY_NEUTRAL_SCORE,
};
use crate::metrics;
use crate::ports::{ProfileProvider, RiskScoringApi};
use async_trait::async_trait;
use shared_types::{Account, TimeSource, UnitScore};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct RiskScorer<P, T>
where
    P: ProfileProvider,
    T: TimeSource,
{
    profiles: Arc<P>,
    clock: Arc<T>,
    weights: SignalWeights,
}

impl<P, T> RiskScorer<P, T>
where
    P: ProfileProvider,
    T: TimeSource,
{
    pub fn new(profiles: Arc<P>, clock: Arc<T>) -> Self {
        Self::with_weights(profiles, clock, SignalWeights::DEFAULT)
    }

    pub fn with_weights(profiles: Arc<P>, clock: Arc<T>, weights: SignalWeights) -> Self {
        Self {
            profiles,
            clock,
            weights,
        }
    }

    /// Registration → subscription confirmation, or registration → now
    /// while the confirmation time is unknown.
    fn subscribe_elapsed_secs(&self, account: &Account) -> f64 {
        let until = account
            .subscription_confirmed_at
            .unwrap_or_else(|| self.clock.now());
        (until - account.registered_at).num_milliseconds() as f64 / 1000.0
    }

    async fn profile_signal(&self, account: &Account) -> UnitScore {
        match self.profiles.get_profile(account.id).await {
            Ok(profile) => profile_score(&profile),
            Err(e) => {
                warn!(account_id = account.id, error = %e, "Profile lookup failed, using neutral score");
                UnitScore::NEUTRAL
            }
        }
    }

    /// Collect all five signals.
    pub async fn signals(&self, account: &Account) -> SignalScores {
        SignalScores {
            account_age: account_age_score(account.id),
            challenge: account.challenge_score.unwrap_or(UnitScore::NEUTRAL),
            subscribe_timing: subscribe_timing_score(self.subscribe_elapsed_secs(account)),
            profile: self.profile_signal(account).await,
            activity: ACTIVITY_NEUTRAL_SCORE,
        }
    }
}

#[async_trait]
impl<P, T> RiskScoringApi for RiskScorer<P, T>
where
    P: ProfileProvider,
    T: TimeSource,
{
    async fn assess(&self, account: &Account, thresholds: &RiskThresholds) -> RiskAssessment {
        let signals = self.signals(account).await;
        let assessment = combine(&signals, &self.weights, thresholds.rejection_threshold);

        debug!(account_id = account.id, ?signals, "Risk signals");
        info!(
            account_id = account.id,
            risk_score = %assessment.risk,
            high_risk = assessment.high_risk,
            "Risk assessed"
        );
        metrics::record_risk_score(assessment.risk.value());
        assessment
    }
}
