//! # Risk Thresholds
//!
//! Deployment policy shared by the challenge band, the quarantine and the
//! referral velocity limits.

use crate::domain::{RiskError, RiskResult};
use serde::{Deserialize, Serialize};

/// Longest quarantine a deployment may configure (one year).
pub const MAX_QUARANTINE_HOURS: u32 = 24 * 365;

/// Anti-abuse policy knobs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    /// Faster challenge solves look scripted (seconds).
    pub captcha_time_min: f64,
    /// Slower challenge solves look farmed (seconds).
    pub captcha_time_max: f64,
    /// Minimum age of a referral record before it may be decided.
    pub quarantine_hours: u32,
    /// Referrals one referrer may create per trailing hour.
    pub max_refs_per_hour: u32,
    /// Referrals one referrer may create per trailing day.
    pub max_refs_per_day: u32,
    /// Risk at or above this value rejects a referral.
    pub rejection_threshold: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            captcha_time_min: 3.0,
            captcha_time_max: 120.0,
            quarantine_hours: 1,
            max_refs_per_hour: 5,
            max_refs_per_day: 20,
            rejection_threshold: 0.7,
        }
    }
}

impl RiskThresholds {
    /// No quarantine, generous limits.
    pub fn for_testing() -> Self {
        Self {
            quarantine_hours: 0,
            max_refs_per_hour: 1_000,
            max_refs_per_day: 10_000,
            ..Self::default()
        }
    }

    /// Quarantine as a chrono duration, capped at [`MAX_QUARANTINE_HOURS`].
    pub fn quarantine(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.quarantine_hours.min(MAX_QUARANTINE_HOURS)))
    }

    /// Whether a risk value must be rejected under this policy.
    pub fn rejects(&self, risk: f64) -> bool {
        risk >= self.rejection_threshold
    }

    pub fn validate(&self) -> RiskResult<()> {
        if !(self.rejection_threshold > 0.0 && self.rejection_threshold <= 1.0) {
            return Err(RiskError::InvalidThresholds(format!(
                "rejection_threshold {} outside (0, 1]",
                self.rejection_threshold
            )));
        }
        if !(self.captcha_time_min >= 0.0 && self.captcha_time_min < self.captcha_time_max) {
            return Err(RiskError::InvalidThresholds(format!(
                "captcha band [{}, {}] is empty",
                self.captcha_time_min, self.captcha_time_max
            )));
        }
        if self.quarantine_hours > MAX_QUARANTINE_HOURS {
            return Err(RiskError::InvalidThresholds(format!(
                "quarantine_hours {} exceeds {MAX_QUARANTINE_HOURS}",
                self.quarantine_hours
            )));
        }
        if self.max_refs_per_hour > self.max_refs_per_day {
            return Err(RiskError::InvalidThresholds(
                "hourly referral limit exceeds daily limit".into(),
            ));
        }
        Ok(())
    }
}
