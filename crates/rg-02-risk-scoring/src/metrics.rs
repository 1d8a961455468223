//! # Risk Scoring Metrics
//!
//! - `risk_score` - Histogram of computed risk scores

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_histogram, Histogram};

#[cfg(feature = "metrics")]
lazy_static! {
    pub static ref RISK_SCORES: Histogram = register_histogram!(
        "risk_score",
        "Distribution of computed risk scores",
        vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0]
    )
    .expect("Failed to create RISK_SCORES metric");
}

#[cfg(feature = "metrics")]
pub fn record_risk_score(risk: f64) {
    RISK_SCORES.observe(risk);
}

#[cfg(not(feature = "metrics"))]
pub fn record_risk_score(_risk: f64) {}
