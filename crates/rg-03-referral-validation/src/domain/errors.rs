//! Referral validation error types.

use super::entities::{RecordId, ValidationStatus};
use shared_types::{AccountId, ExternalError, Timestamp};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Validation record not found: {0}")]
    RecordNotFound(RecordId),

    /// The record left `Pending` before this attempt.
    #[error("Validation record {record_id} already decided: {status}")]
    AlreadyDecided {
        record_id: RecordId,
        status: ValidationStatus,
    },

    #[error("Illegal transition {from} -> {to}")]
    IllegalTransition {
        from: ValidationStatus,
        to: ValidationStatus,
    },

    #[error("Validation record {record_id} quarantined until {until}")]
    QuarantineActive { record_id: RecordId, until: Timestamp },

    #[error("Account {0} cannot refer itself")]
    SelfReferral(AccountId),

    #[error("Account {0} already has a referral record")]
    DuplicateReferral(AccountId),

    #[error("Referrer {referrer_id} exceeded {limit} referrals per hour")]
    HourlyLimitExceeded { referrer_id: AccountId, limit: u32 },

    #[error("Referrer {referrer_id} exceeded {limit} referrals per day")]
    DailyLimitExceeded { referrer_id: AccountId, limit: u32 },

    #[error("Validator loop is already running")]
    WorkerAlreadyRunning,

    #[error("Store error: {0}")]
    Store(#[from] ExternalError),
}

pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_already_decided_display() {
        let err = ValidationError::AlreadyDecided {
            record_id: Uuid::nil(),
            status: ValidationStatus::Accepted,
        };
        assert!(err.to_string().contains("already decided: accepted"));
    }

    #[test]
    fn test_limit_display() {
        let err = ValidationError::HourlyLimitExceeded {
            referrer_id: 9,
            limit: 5,
        };
        assert!(err.to_string().contains("5 referrals per hour"));
    }
}
