//! # Challenge Subsystem
//!
//! **Subsystem ID:** 1
//! **Architecture:** Hexagonal (Domain + Ports/Adapters)
//!
//! ## Purpose
//!
//! Issues a timed arithmetic challenge to a newly registered account and turns
//! the solve latency into a quality signal for the risk scorer.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | Non-negative answers | `domain/generator.rs` - subtraction operands ordered |
//! | INVARIANT-2 | Six distinct candidates, one correct | `domain/generator.rs` - `answer_candidates()` |
//! | INVARIANT-3 | A solved session is immutable | `service.rs` - `evaluate()` + store `mark_solved` CAS |
//! | INVARIANT-4 | Score in `[0.1, 1.0]` | `domain/scoring.rs` - `challenge_score()` |
//!
//! ## Session Lifecycle
//!
//! ```text
//! issue() ──→ [UNSOLVED] ──correct answer──→ [SOLVED] (latency recorded)
//!                 │  ↑                            │
//!                 └──┘ wrong answer (retry)       └── any further answer ──→ correct=false
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! rg-01-challenge/
//! ├── domain/      # ChallengeSession, expression generator, latency scoring, errors
//! ├── ports/       # ChallengeApi (inbound), session store + score sink (outbound)
//! ├── service.rs   # ChallengeService
//! ├── config.rs    # ChallengeConfig
//! └── metrics.rs   # Prometheus counters (feature = "metrics")
//! ```

pub mod config;
pub mod domain;
pub mod metrics;
pub mod ports;
pub mod service;

pub use config::ChallengeConfig;
pub use domain::{
    answer_candidates, challenge_score, generate_expression, ArithmeticExpression,
    ChallengeError, ChallengeOutcome, ChallengeResult, ChallengeSession, Evaluation,
    IssuedChallenge, Operation, SessionId, OPTIMAL_SOLVE_SECS,
};
pub use ports::{ChallengeApi, ChallengeScoreSink, ChallengeSessionStore};
pub use service::ChallengeService;
