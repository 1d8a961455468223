//! Challenge Service - issue and evaluate timed challenges.

use crate::config::ChallengeConfig;
use crate::domain::{
    answer_candidates, challenge_score, generate_expression, ChallengeError, ChallengeOutcome,
    ChallengeResult, ChallengeSession, Evaluation, IssuedChallenge, SessionId,
};
use crate::metrics;
use crate::ports::{ChallengeApi, ChallengeScoreSink, ChallengeSessionStore};
use async_trait::async_trait;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use shared_types::{AccountId, TimeSource, UnitScore};
use std::sync::Arc;
use tracing::{debug, info};

/// Challenge service.
///
/// Generic over its session store `S`, score sink `K` and clock `T` so tests
/// can drive time by hand.
pub struct ChallengeService<S, K, T>
where
    S: ChallengeSessionStore,
    K: ChallengeScoreSink,
    T: TimeSource,
{
    config: ChallengeConfig,
    sessions: Arc<S>,
    scores: Arc<K>,
    clock: Arc<T>,
    rng: Mutex<StdRng>,
}

impl<S, K, T> ChallengeService<S, K, T>
where
    S: ChallengeSessionStore,
    K: ChallengeScoreSink,
    T: TimeSource,
{
    pub fn new(config: ChallengeConfig, sessions: Arc<S>, scores: Arc<K>, clock: Arc<T>) -> Self {
        Self::with_rng(config, sessions, scores, clock, StdRng::from_entropy())
    }

    /// Deterministic generator, for tests and reproducible demos.
    pub fn with_seed(
        config: ChallengeConfig,
        sessions: Arc<S>,
        scores: Arc<K>,
        clock: Arc<T>,
        seed: u64,
    ) -> Self {
        Self::with_rng(config, sessions, scores, clock, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        config: ChallengeConfig,
        sessions: Arc<S>,
        scores: Arc<K>,
        clock: Arc<T>,
        rng: StdRng,
    ) -> Self {
        Self {
            config,
            sessions,
            scores,
            clock,
            rng: Mutex::new(rng),
        }
    }

    pub fn config(&self) -> &ChallengeConfig {
        &self.config
    }
}

#[async_trait]
impl<S, K, T> ChallengeApi for ChallengeService<S, K, T>
where
    S: ChallengeSessionStore,
    K: ChallengeScoreSink,
    T: TimeSource,
{
    async fn issue(&self, account_id: AccountId) -> ChallengeResult<IssuedChallenge> {
        // The guard must not live across an await.
        let (expression, candidates) = {
            let mut rng = self.rng.lock();
            let expression = generate_expression(&mut *rng);
            let candidates = answer_candidates(expression.answer(), &mut *rng);
            (expression, candidates)
        };

        let session = ChallengeSession::new(account_id, expression.answer(), self.clock.now());
        let session_id = session.id;
        self.sessions.insert(session).await?;
        metrics::record_challenge_issued();

        debug!(account_id, %session_id, "Issued challenge");
        Ok(IssuedChallenge {
            session_id,
            expression,
            candidates,
        })
    }

    async fn evaluate(&self, session_id: SessionId, answer: i64) -> ChallengeResult<Evaluation> {
        let session = self
            .sessions
            .get(session_id)
            .await?
            .ok_or(ChallengeError::SessionNotFound(session_id))?;

        if session.solved {
            metrics::record_evaluation("already_solved");
            return Ok(Evaluation::already_solved());
        }

        let elapsed = self.clock.now() - session.issued_at;
        let latency = (elapsed.num_milliseconds() as f64 / 1000.0).max(0.0);

        if answer != session.expected_answer {
            metrics::record_evaluation("wrong");
            debug!(%session_id, "Wrong challenge answer");
            return Ok(Evaluation {
                correct: false,
                solve_latency_secs: latency,
                already_solved: false,
            });
        }

        if !self.sessions.mark_solved(session_id, latency).await? {
            metrics::record_evaluation("already_solved");
            return Ok(Evaluation::already_solved());
        }

        metrics::record_evaluation("correct");
        Ok(Evaluation {
            correct: true,
            solve_latency_secs: latency,
            already_solved: false,
        })
    }

    async fn evaluate_raw(
        &self,
        session_id: SessionId,
        answer: &str,
    ) -> ChallengeResult<Evaluation> {
        let parsed = answer
            .trim()
            .parse::<i64>()
            .map_err(|_| ChallengeError::InvalidAnswerFormat(answer.to_string()))?;
        self.evaluate(session_id, parsed).await
    }

    async fn complete(
        &self,
        session_id: SessionId,
        answer: i64,
    ) -> ChallengeResult<ChallengeOutcome> {
        let evaluation = self.evaluate(session_id, answer).await?;
        if !evaluation.correct {
            return Ok(ChallengeOutcome {
                evaluation,
                score: None,
            });
        }

        let session = self
            .sessions
            .get(session_id)
            .await?
            .ok_or(ChallengeError::SessionNotFound(session_id))?;
        let score = self.score(evaluation.solve_latency_secs);
        self.scores
            .record_challenge_score(session.account_id, score)
            .await?;
        metrics::record_challenge_score(score.value());

        info!(
            account_id = session.account_id,
            latency_secs = evaluation.solve_latency_secs,
            score = score.value(),
            "Challenge solved"
        );
        Ok(ChallengeOutcome {
            evaluation,
            score: Some(score),
        })
    }

    fn score(&self, latency_secs: f64) -> UnitScore {
        challenge_score(
            latency_secs,
            self.config.min_plausible_secs,
            self.config.max_plausible_secs,
        )
    }
}
