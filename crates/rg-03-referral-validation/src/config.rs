//! # Validator Configuration

use rg_02_risk_scoring::RiskThresholds;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Validator loop pacing and reward policy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Pending records fetched per iteration.
    pub batch_size: usize,
    /// Pause after each decided record, bounds external call rate.
    pub record_delay_ms: u64,
    /// Pause between iterations.
    pub iteration_interval_secs: u64,
    /// Fixed credit for an accepted referral.
    pub reward_amount: f64,
    /// Quarantine and rejection policy.
    pub thresholds: RiskThresholds,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            batch_size: 100,
            record_delay_ms: 1_000,
            iteration_interval_secs: 30,
            reward_amount: 1.0,
            thresholds: RiskThresholds::default(),
        }
    }
}

impl ValidatorConfig {
    /// Default policy with the standard one-hour quarantine, no pacing delays.
    pub fn for_testing() -> Self {
        Self {
            record_delay_ms: 0,
            iteration_interval_secs: 0,
            ..Self::default()
        }
    }

    pub fn record_delay(&self) -> Duration {
        Duration::from_millis(self.record_delay_ms)
    }

    pub fn iteration_interval(&self) -> Duration {
        Duration::from_secs(self.iteration_interval_secs)
    }
}
