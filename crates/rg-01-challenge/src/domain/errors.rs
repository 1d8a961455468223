//! Challenge error types.

use shared_types::ExternalError;
use thiserror::Error;

use super::entities::SessionId;

/// Challenge subsystem errors.
#[derive(Debug, Clone, Error)]
pub enum ChallengeError {
    /// No session with this id was ever issued.
    #[error("Challenge session not found: {0}")]
    SessionNotFound(SessionId),

    /// Submitted answer is not an integer.
    #[error("Invalid answer format: {0:?}")]
    InvalidAnswerFormat(String),

    /// Session store or score sink failed.
    #[error("Store error: {0}")]
    Store(#[from] ExternalError),
}

/// Result type for challenge operations.
pub type ChallengeResult<T> = Result<T, ChallengeError>;
