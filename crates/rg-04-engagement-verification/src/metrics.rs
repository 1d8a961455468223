//! # Engagement Verification Metrics
//!
//! ## Metrics Exported
//!
//! - `engagement_verifications_total` - Counter of engagement scans, by outcome
//! - `engagement_messages_inspected` - Histogram of channel messages read per scan
//! - `subscription_checks_total` - Counter of subscription checks, by verdict
//! - `scan_session_transitions_total` - Counter of breaker transitions, by new state

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_histogram, register_int_counter_vec, Histogram, IntCounterVec};

#[cfg(feature = "metrics")]
lazy_static! {
    pub static ref VERIFICATIONS: IntCounterVec = register_int_counter_vec!(
        "engagement_verifications_total",
        "Total number of channel engagement verifications",
        &["outcome"]
    )
    .expect("Failed to create VERIFICATIONS metric");

    pub static ref MESSAGES_INSPECTED: Histogram = register_histogram!(
        "engagement_messages_inspected",
        "Channel messages inspected per engagement scan",
        vec![0.0, 10.0, 50.0, 100.0, 250.0, 500.0, 1000.0]
    )
    .expect("Failed to create MESSAGES_INSPECTED metric");

    pub static ref SUBSCRIPTION_CHECKS: IntCounterVec = register_int_counter_vec!(
        "subscription_checks_total",
        "Total number of channel subscription checks",
        &["verdict"]
    )
    .expect("Failed to create SUBSCRIPTION_CHECKS metric");

    pub static ref SESSION_TRANSITIONS: IntCounterVec = register_int_counter_vec!(
        "scan_session_transitions_total",
        "Scan session circuit breaker transitions",
        &["state"]
    )
    .expect("Failed to create SESSION_TRANSITIONS metric");
}

#[cfg(feature = "metrics")]
pub fn record_verification(outcome: &str, messages_inspected: usize) {
    VERIFICATIONS.with_label_values(&[outcome]).inc();
    MESSAGES_INSPECTED.observe(messages_inspected as f64);
}

#[cfg(feature = "metrics")]
pub fn record_subscription_check(verdict: &str) {
    SUBSCRIPTION_CHECKS.with_label_values(&[verdict]).inc();
}

#[cfg(feature = "metrics")]
pub fn record_session_transition(state: &str) {
    SESSION_TRANSITIONS.with_label_values(&[state]).inc();
}

#[cfg(not(feature = "metrics"))]
pub fn record_verification(_outcome: &str, _messages_inspected: usize) {}

#[cfg(not(feature = "metrics"))]
pub fn record_subscription_check(_verdict: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_session_transition(_state: &str) {}
