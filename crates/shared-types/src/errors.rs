//! # Error Types
//!
//! The closed set of failures an external collaborator (store, chat API,
//! historical-scan client, ledger, notifier) can report.

use thiserror::Error;

/// Failure of a call to an external collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExternalError {
    /// The call did not complete within its deadline.
    #[error("Timed out: {operation}")]
    Timeout { operation: String },

    /// Network or service hiccup; safe to retry on the next natural iteration.
    #[error("Transient failure: {0}")]
    Transient(String),

    /// The remote asked us to back off.
    #[error("Rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Session credentials are no longer accepted.
    #[error("Authorization expired: {0}")]
    AuthExpired(String),

    /// Session key was used from several network origins and is revoked.
    #[error("Session compromised: {0}")]
    SessionCompromised(String),

    /// Chat or channel does not exist.
    #[error("Channel not found")]
    ChannelNotFound,

    /// Chat or channel exists but is not readable by us.
    #[error("Channel is private or inaccessible")]
    ChannelPrivate,

    /// The user (or our session) is not a participant of the chat.
    #[error("Not a member of the channel")]
    NotAMember,

    /// The user is unknown to the platform.
    #[error("User not found")]
    UserNotFound,

    /// Anything else.
    #[error("Unknown failure: {0}")]
    Unknown(String),
}

impl ExternalError {
    /// Build a timeout error for the named operation.
    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }

    /// Whether waiting for the next loop iteration may fix it.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Transient(_))
    }

    /// Whether a session that produced this error must not be reused.
    pub fn is_fatal_for_session(&self) -> bool {
        matches!(self, Self::AuthExpired(_) | Self::SessionCompromised(_))
    }

    /// Short stable label, used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "timeout",
            Self::Transient(_) => "transient",
            Self::RateLimited { .. } => "rate_limited",
            Self::AuthExpired(_) => "auth_expired",
            Self::SessionCompromised(_) => "session_compromised",
            Self::ChannelNotFound => "channel_not_found",
            Self::ChannelPrivate => "channel_private",
            Self::NotAMember => "not_a_member",
            Self::UserNotFound => "user_not_found",
            Self::Unknown(_) => "unknown",
        }
    }
}

/// Result type for calls to external collaborators.
pub type ExternalResult<T> = Result<T, ExternalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(ExternalError::timeout("fetch").is_transient());
        assert!(ExternalError::Transient("reset".into()).is_transient());
        assert!(!ExternalError::RateLimited { retry_after_secs: 5 }.is_transient());

        assert!(ExternalError::AuthExpired("revoked".into()).is_fatal_for_session());
        assert!(ExternalError::SessionCompromised("two ips".into()).is_fatal_for_session());
        assert!(!ExternalError::ChannelPrivate.is_fatal_for_session());
    }

    #[test]
    fn test_rate_limited_display_carries_wait() {
        let err = ExternalError::RateLimited {
            retry_after_secs: 42,
        };
        assert!(err.to_string().contains("42s"));
        assert_eq!(err.kind(), "rate_limited");
    }
}
