//! # Challenge Metrics
//!
//! Enable with the `metrics` feature:
//! ```toml
//! rg-01-challenge = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `challenge_issued_total` - Counter of issued sessions
//! - `challenge_evaluations_total` - Counter of answers, by result
//! - `challenge_score` - Histogram of recorded quality scores

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, Histogram, IntCounter,
    IntCounterVec,
};

#[cfg(feature = "metrics")]
lazy_static! {
    pub static ref CHALLENGES_ISSUED: IntCounter = register_int_counter!(
        "challenge_issued_total",
        "Total number of challenge sessions issued"
    )
    .expect("Failed to create CHALLENGES_ISSUED metric");

    /// Answers labeled `correct`, `wrong` or `already_solved`
    pub static ref EVALUATIONS: IntCounterVec = register_int_counter_vec!(
        "challenge_evaluations_total",
        "Total number of challenge answers evaluated",
        &["result"]
    )
    .expect("Failed to create EVALUATIONS metric");

    pub static ref SCORES: Histogram = register_histogram!(
        "challenge_score",
        "Quality score of first correct solves",
        vec![0.1, 0.3, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0]
    )
    .expect("Failed to create SCORES metric");
}

#[cfg(feature = "metrics")]
pub fn record_challenge_issued() {
    CHALLENGES_ISSUED.inc();
}

#[cfg(feature = "metrics")]
pub fn record_evaluation(result: &str) {
    EVALUATIONS.with_label_values(&[result]).inc();
}

#[cfg(feature = "metrics")]
pub fn record_challenge_score(score: f64) {
    SCORES.observe(score);
}

#[cfg(not(feature = "metrics"))]
pub fn record_challenge_issued() {}

#[cfg(not(feature = "metrics"))]
pub fn record_evaluation(_result: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_challenge_score(_score: f64) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_noop_when_disabled() {
        record_challenge_issued();
        record_evaluation("correct");
        record_challenge_score(0.9);
    }
}
