//! Allowed transitions and the checks that run before risk scoring.

use super::entities::{RejectReason, ValidationStatus};
use super::errors::{ValidationError, ValidationResult};
use shared_types::Account;

/// Apply a transition. Only `Pending` may move, and only to a terminal state.
pub fn transition(
    from: ValidationStatus,
    to: ValidationStatus,
) -> ValidationResult<ValidationStatus> {
    match (from, to) {
        (ValidationStatus::Pending, ValidationStatus::Accepted)
        | (ValidationStatus::Pending, ValidationStatus::Rejected) => Ok(to),
        _ => Err(ValidationError::IllegalTransition { from, to }),
    }
}

/// Outcome of the checks that need no scoring.
#[derive(Debug, PartialEq)]
pub enum Precheck<'a> {
    Reject(RejectReason),
    /// Account is eligible; its risk decides.
    Score(&'a Account),
}

/// Missing account or missing subscription check reject before any scoring.
pub fn evaluate_precheck(account: Option<&Account>) -> Precheck<'_> {
    match account {
        None => Precheck::Reject(RejectReason::UserNotFound),
        Some(account) if !account.subscription_confirmed => {
            Precheck::Reject(RejectReason::NoSubscriptionCheck)
        }
        Some(account) => Precheck::Score(account),
    }
}
