//! Risk scoring error types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RiskError {
    /// Policy values that cannot produce a sensible decision.
    #[error("Invalid risk thresholds: {0}")]
    InvalidThresholds(String),
}

pub type RiskResult<T> = Result<T, RiskError>;
