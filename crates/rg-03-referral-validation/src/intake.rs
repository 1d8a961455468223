//! Referral intake - creates `Pending` records under velocity limits.

use crate::domain::{ValidationError, ValidationRecord, ValidationResult};
use crate::metrics;
use crate::ports::{ReferralIntakeApi, ValidationStore};
use async_trait::async_trait;
use chrono::Duration;
use rg_02_risk_scoring::RiskThresholds;
use shared_types::{AccountId, TimeSource};
use std::sync::Arc;
use tracing::{info, warn};

pub struct ReferralIntake<S, T>
where
    S: ValidationStore,
    T: TimeSource,
{
    thresholds: RiskThresholds,
    store: Arc<S>,
    clock: Arc<T>,
}

impl<S, T> ReferralIntake<S, T>
where
    S: ValidationStore,
    T: TimeSource,
{
    pub fn new(thresholds: RiskThresholds, store: Arc<S>, clock: Arc<T>) -> Self {
        Self {
            thresholds,
            store,
            clock,
        }
    }

    async fn check_velocity(&self, referrer_id: AccountId) -> ValidationResult<()> {
        let now = self.clock.now();

        let last_hour = self
            .store
            .count_referrals_since(referrer_id, now - Duration::hours(1))
            .await?;
        if last_hour >= self.thresholds.max_refs_per_hour {
            return Err(ValidationError::HourlyLimitExceeded {
                referrer_id,
                limit: self.thresholds.max_refs_per_hour,
            });
        }

        let last_day = self
            .store
            .count_referrals_since(referrer_id, now - Duration::days(1))
            .await?;
        if last_day >= self.thresholds.max_refs_per_day {
            return Err(ValidationError::DailyLimitExceeded {
                referrer_id,
                limit: self.thresholds.max_refs_per_day,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl<S, T> ReferralIntakeApi for ReferralIntake<S, T>
where
    S: ValidationStore,
    T: TimeSource,
{
    async fn register(
        &self,
        referrer_id: AccountId,
        referred_id: AccountId,
    ) -> ValidationResult<ValidationRecord> {
        if referrer_id == referred_id {
            return Err(ValidationError::SelfReferral(referrer_id));
        }
        if self.store.find_by_referred(referred_id).await?.is_some() {
            return Err(ValidationError::DuplicateReferral(referred_id));
        }
        if let Err(e) = self.check_velocity(referrer_id).await {
            warn!(referrer_id, error = %e, "Referral refused by velocity limit");
            metrics::record_intake_refused("velocity");
            return Err(e);
        }

        let record = ValidationRecord::new(referrer_id, referred_id, self.clock.now());
        if !self.store.insert_if_absent(record.clone()).await? {
            // A concurrent registration got there between the lookup and the write.
            warn!(referrer_id, referred_id, "Referral lost to a concurrent registration");
            return Err(ValidationError::DuplicateReferral(referred_id));
        }
        info!(record_id = %record.id, referrer_id, referred_id, "Referral registered");
        Ok(record)
    }
}
