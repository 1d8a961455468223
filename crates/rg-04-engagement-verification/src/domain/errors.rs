//! Engagement verification error types.

use shared_types::ExternalError;
use thiserror::Error;

/// Failures surfaced to the caller of a verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    /// Our scanning session is not a participant of the channel.
    #[error("Not a member of the channel")]
    NotAMember,

    /// Back off before retrying.
    #[error("Rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Session unusable until an operator rotates credentials.
    #[error("Scan session authorization expired: {0}")]
    AuthExpired(String),

    /// Anything else, including timeouts and reconnect cooldown.
    #[error("Technical error: {0}")]
    TechnicalError(String),
}

impl VerifyError {
    /// Short stable label, used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            VerifyError::NotAMember => "not_a_member",
            VerifyError::RateLimited { .. } => "rate_limited",
            VerifyError::AuthExpired(_) => "auth_expired",
            VerifyError::TechnicalError(_) => "technical_error",
        }
    }
}

impl From<ExternalError> for VerifyError {
    fn from(err: ExternalError) -> Self {
        match err {
            ExternalError::NotAMember => VerifyError::NotAMember,
            ExternalError::RateLimited { retry_after_secs } => {
                VerifyError::RateLimited { retry_after_secs }
            }
            ExternalError::AuthExpired(msg) => VerifyError::AuthExpired(msg),
            ExternalError::SessionCompromised(msg) => {
                VerifyError::AuthExpired(format!("session compromised: {msg}"))
            }
            other => VerifyError::TechnicalError(other.to_string()),
        }
    }
}

pub type VerifyResult<T> = Result<T, VerifyError>;
