//! Driving ports (Inbound API)

use crate::domain::{DecisionReport, RecordId, ValidationRecord, ValidationResult};
use async_trait::async_trait;
use shared_types::AccountId;

/// Creation of referral records by the registration flow.
#[async_trait]
pub trait ReferralIntakeApi: Send + Sync {
    /// Create the `Pending` record for `referred_id` invited by `referrer_id`.
    async fn register(
        &self,
        referrer_id: AccountId,
        referred_id: AccountId,
    ) -> ValidationResult<ValidationRecord>;
}

/// The decision procedure.
#[async_trait]
pub trait ReferralValidationApi: Send + Sync {
    /// Decide one record. Fails with `QuarantineActive` before the quarantine
    /// has elapsed and with `AlreadyDecided` for any record not `Pending`.
    async fn decide(&self, record_id: RecordId) -> ValidationResult<DecisionReport>;
}
