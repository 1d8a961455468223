//! Driven ports (Outbound dependencies)

use crate::domain::{ChallengeSession, SessionId};
use async_trait::async_trait;
use shared_types::{AccountId, ExternalResult, UnitScore};

/// Persistence for challenge sessions.
#[async_trait]
pub trait ChallengeSessionStore: Send + Sync {
    /// Store a freshly issued session.
    async fn insert(&self, session: ChallengeSession) -> ExternalResult<()>;

    /// Look up a session by id.
    async fn get(&self, session_id: SessionId) -> ExternalResult<Option<ChallengeSession>>;

    /// Mark a session solved with the given latency.
    ///
    /// Must be conditional on the session still being unsolved. Returns
    /// `false` when another submission won the race.
    async fn mark_solved(&self, session_id: SessionId, latency_secs: f64) -> ExternalResult<bool>;
}

/// Where the challenge quality score ends up (the account record).
#[async_trait]
pub trait ChallengeScoreSink: Send + Sync {
    async fn record_challenge_score(
        &self,
        account_id: AccountId,
        score: UnitScore,
    ) -> ExternalResult<()>;
}
