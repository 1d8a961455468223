//! Referral validation entities.

use rg_02_risk_scoring::RiskAssessment;
use serde::{Deserialize, Serialize};
use shared_types::{AccountId, Timestamp};
use std::fmt;
use uuid::Uuid;

/// Validation record identifier; doubles as the reward idempotency key.
pub type RecordId = Uuid;

/// Tri-state decision flag of a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ValidationStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, ValidationStatus::Pending)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ValidationStatus::Pending => "pending",
            ValidationStatus::Accepted => "accepted",
            ValidationStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One referral awaiting, or having received, its verdict.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidationRecord {
    pub id: RecordId,
    pub referrer_id: AccountId,
    pub referred_id: AccountId,
    pub created_at: Timestamp,
    pub status: ValidationStatus,
    /// Diagnostic tag set on rejection, e.g. `high_risk_score_0.82`.
    pub reason: Option<String>,
}

impl ValidationRecord {
    pub fn new(referrer_id: AccountId, referred_id: AccountId, created_at: Timestamp) -> Self {
        Self {
            id: Uuid::new_v4(),
            referrer_id,
            referred_id,
            created_at,
            status: ValidationStatus::Pending,
            reason: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == ValidationStatus::Pending
    }

    /// First instant a decision is allowed.
    pub fn quarantine_ends_at(&self, quarantine: chrono::Duration) -> Timestamp {
        self.created_at
            .checked_add_signed(quarantine)
            .unwrap_or(chrono::DateTime::<chrono::Utc>::MAX_UTC)
    }

    pub fn in_quarantine(&self, now: Timestamp, quarantine: chrono::Duration) -> bool {
        now < self.quarantine_ends_at(quarantine)
    }
}

/// Why a referral was rejected.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RejectReason {
    /// The referred account is gone.
    UserNotFound,
    /// The referred account never passed the subscription check.
    NoSubscriptionCheck,
    /// Risk reached the threshold.
    HighRiskScore(f64),
}

impl RejectReason {
    /// Stable audit tag stored on the record.
    pub fn tag(&self) -> String {
        match self {
            RejectReason::UserNotFound => "user_not_found".to_string(),
            RejectReason::NoSubscriptionCheck => "no_subscription_check".to_string(),
            RejectReason::HighRiskScore(risk) => format!("high_risk_score_{risk:.2}"),
        }
    }

    /// Label without the numeric suffix, for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            RejectReason::UserNotFound => "user_not_found",
            RejectReason::NoSubscriptionCheck => "no_subscription_check",
            RejectReason::HighRiskScore(_) => "high_risk_score",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag())
    }
}

/// Verdict of the decision procedure.
#[derive(Clone, Debug, PartialEq)]
pub enum Decision {
    Accept,
    Reject(RejectReason),
}

impl Decision {
    pub fn status(&self) -> ValidationStatus {
        match self {
            Decision::Accept => ValidationStatus::Accepted,
            Decision::Reject(_) => ValidationStatus::Rejected,
        }
    }

    pub fn reason_tag(&self) -> Option<String> {
        match self {
            Decision::Accept => None,
            Decision::Reject(reason) => Some(reason.tag()),
        }
    }

    pub fn is_accept(&self) -> bool {
        matches!(self, Decision::Accept)
    }
}

/// Everything known about one completed decision.
#[derive(Clone, Debug, PartialEq)]
pub struct DecisionReport {
    pub record_id: RecordId,
    pub referrer_id: AccountId,
    pub referred_id: AccountId,
    pub decision: Decision,
    /// Present when the procedure got as far as scoring.
    pub assessment: Option<RiskAssessment>,
    /// The ledger acknowledged the credit. Always false on rejection.
    pub reward_credited: bool,
    /// The referrer was told. Delivery is best effort.
    pub notified: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn test_reason_tags() {
        assert_eq!(RejectReason::UserNotFound.tag(), "user_not_found");
        assert_eq!(RejectReason::NoSubscriptionCheck.tag(), "no_subscription_check");
        assert_eq!(RejectReason::HighRiskScore(0.8234).tag(), "high_risk_score_0.82");
        assert_eq!(RejectReason::HighRiskScore(0.8234).kind(), "high_risk_score");
    }

    #[test]
    fn test_quarantine_boundary() {
        let t0 = Utc.with_ymd_and_hms(2025, 5, 1, 10, 0, 0).unwrap();
        let record = ValidationRecord::new(1, 2, t0);
        let q = Duration::hours(1);
        assert!(record.in_quarantine(t0 + Duration::minutes(59), q));
        assert!(!record.in_quarantine(t0 + Duration::hours(1), q));
        assert!(record.is_pending());
    }

    #[test]
    fn test_unrepresentable_quarantine_never_ends() {
        let t0 = Utc.with_ymd_and_hms(2025, 5, 1, 10, 0, 0).unwrap();
        let record = ValidationRecord::new(1, 2, t0);
        let q = Duration::days(100_000_000);
        assert_eq!(record.quarantine_ends_at(q), chrono::DateTime::<Utc>::MAX_UTC);
        assert!(record.in_quarantine(t0 + Duration::days(365), q));
    }

    #[test]
    fn test_status_serde() {
        let json = serde_json::to_string(&ValidationStatus::Accepted).unwrap();
        assert_eq!(json, "\"accepted\"");
    }
}
