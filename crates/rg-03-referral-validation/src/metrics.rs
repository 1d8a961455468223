//! # Referral Validation Metrics
//!
//! ## Metrics Exported
//!
//! - `referral_decisions_total` - Counter of decisions, by outcome and reason
//! - `referral_intake_refused_total` - Counter of refused registrations
//! - `validator_iterations_total` - Counter of validator loop iterations

use crate::domain::Decision;

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};

#[cfg(feature = "metrics")]
lazy_static! {
    pub static ref DECISIONS: IntCounterVec = register_int_counter_vec!(
        "referral_decisions_total",
        "Total number of referral decisions",
        &["outcome", "reason"]
    )
    .expect("Failed to create DECISIONS metric");

    pub static ref INTAKE_REFUSED: IntCounterVec = register_int_counter_vec!(
        "referral_intake_refused_total",
        "Total number of referral registrations refused",
        &["reason"]
    )
    .expect("Failed to create INTAKE_REFUSED metric");

    pub static ref ITERATIONS: IntCounter = register_int_counter!(
        "validator_iterations_total",
        "Total number of validator loop iterations"
    )
    .expect("Failed to create ITERATIONS metric");
}

#[cfg(feature = "metrics")]
pub fn record_decision(decision: &Decision) {
    let (outcome, reason) = match decision {
        Decision::Accept => ("accepted", "none"),
        Decision::Reject(reason) => ("rejected", reason.kind()),
    };
    DECISIONS.with_label_values(&[outcome, reason]).inc();
}

#[cfg(feature = "metrics")]
pub fn record_intake_refused(reason: &str) {
    INTAKE_REFUSED.with_label_values(&[reason]).inc();
}

#[cfg(feature = "metrics")]
pub fn record_iteration() {
    ITERATIONS.inc();
}

#[cfg(not(feature = "metrics"))]
pub fn record_decision(_decision: &Decision) {}

#[cfg(not(feature = "metrics"))]
pub fn record_intake_refused(_reason: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_iteration() {}
