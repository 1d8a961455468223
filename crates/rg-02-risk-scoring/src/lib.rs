//! # Risk Scoring Subsystem
//!
//! **Subsystem ID:** 2
//! **Architecture:** Hexagonal (Domain + Ports/Adapters)
//!
//! ## Purpose
//!
//! Combines five weak "trust" signals into one suspicion score in `[0, 1]`.
//! Higher means more likely abusive.
//!
//! ## Signals
//!
//! | Signal | Weight | Source |
//! |--------|--------|--------|
//! | account age | 0.30 | identifier banding, `domain/signals.rs` |
//! | challenge | 0.20 | stored challenge score, neutral when absent |
//! | subscribe timing | 0.20 | registration → subscription confirmation |
//! | profile | 0.20 | display name + handle via `ProfileProvider` |
//! | channel activity | 0.10 | fixed neutral |
//!
//! `risk = clamp(1 - Σ weight·signal)`.
//!
//! ## Module Structure
//!
//! ```text
//! rg-02-risk-scoring/
//! ├── domain/      # signal heuristics, weights, RiskAssessment, errors
//! ├── ports/       # RiskScoringApi (inbound), ProfileProvider (outbound)
//! ├── service.rs   # RiskScorer
//! ├── config.rs    # RiskThresholds
//! └── metrics.rs   # Prometheus histograms (feature = "metrics")
//! ```

pub mod config;
pub mod domain;
pub mod metrics;
pub mod ports;
pub mod service;

pub use config::{RiskThresholds, MAX_QUARANTINE_HOURS};
pub use domain::{
    account_age_score, combine, handle_quality, name_quality, profile_score,
    subscribe_timing_score, RiskAssessment, RiskError, RiskResult, SignalScores, SignalWeights,
    ACTIVITY_NEUTRAL_SCORE,
};
pub use ports::{ProfileProvider, RiskScoringApi};
pub use service::RiskScorer;
