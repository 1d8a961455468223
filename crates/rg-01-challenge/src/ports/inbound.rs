//! Driving ports (Inbound API)

use crate::domain::{ChallengeOutcome, ChallengeResult, Evaluation, IssuedChallenge, SessionId};
use async_trait::async_trait;
use shared_types::{AccountId, UnitScore};

/// Challenge API used by the registration flow.
#[async_trait]
pub trait ChallengeApi: Send + Sync {
    /// Create and persist a new session for `account_id`.
    ///
    /// The correct answer stays server-side; the caller only sees the
    /// expression and the shuffled candidates.
    async fn issue(&self, account_id: AccountId) -> ChallengeResult<IssuedChallenge>;

    /// Check an answer. A correct first answer marks the session solved.
    async fn evaluate(&self, session_id: SessionId, answer: i64) -> ChallengeResult<Evaluation>;

    /// Same as [`evaluate`](Self::evaluate) for raw user text.
    async fn evaluate_raw(&self, session_id: SessionId, answer: &str)
        -> ChallengeResult<Evaluation>;

    /// Evaluate, and on a first correct solve record the quality score for
    /// the session's account.
    async fn complete(&self, session_id: SessionId, answer: i64)
        -> ChallengeResult<ChallengeOutcome>;

    /// Pure latency-to-quality mapping with the configured band.
    fn score(&self, latency_secs: f64) -> UnitScore;
}
