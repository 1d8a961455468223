//! Signal weights and the combined risk.

use serde::{Deserialize, Serialize};
use shared_types::UnitScore;

/// Relative importance of each signal. The defaults sum to 1.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignalWeights {
    pub account_age: f64,
    pub challenge: f64,
    pub subscribe_timing: f64,
    pub profile: f64,
    pub activity: f64,
}

impl SignalWeights {
    pub const DEFAULT: SignalWeights = SignalWeights {
        account_age: 0.30,
        challenge: 0.20,
        subscribe_timing: 0.20,
        profile: 0.20,
        activity: 0.10,
    };

    pub fn total(&self) -> f64 {
        self.account_age + self.challenge + self.subscribe_timing + self.profile + self.activity
    }
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// The five trust signals for one account.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignalScores {
    pub account_age: UnitScore,
    pub challenge: UnitScore,
    pub subscribe_timing: UnitScore,
    pub profile: UnitScore,
    pub activity: UnitScore,
}

/// Risk plus the signals it came from, kept for audit logs.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub signals: SignalScores,
    /// Weighted trust before inversion.
    pub trust: UnitScore,
    pub risk: UnitScore,
    /// Risk reached the rejection threshold it was assessed against.
    pub high_risk: bool,
}

impl RiskAssessment {
    /// Audit tag used when a referral is rejected for this assessment.
    pub fn reason_tag(&self) -> String {
        format!("high_risk_score_{:.2}", self.risk.value())
    }
}

/// Weighted average of the signals, inverted and clamped.
pub fn combine(
    signals: &SignalScores,
    weights: &SignalWeights,
    rejection_threshold: f64,
) -> RiskAssessment {
    let total = weights.total();
    let weighted = signals.account_age.value() * weights.account_age
        + signals.challenge.value() * weights.challenge
        + signals.subscribe_timing.value() * weights.subscribe_timing
        + signals.profile.value() * weights.profile
        + signals.activity.value() * weights.activity;
    let trust = if total > 0.0 {
        UnitScore::clamped(weighted / total)
    } else {
        UnitScore::NEUTRAL
    };
    let risk = UnitScore::clamped(1.0 - trust.value());
    RiskAssessment {
        signals: *signals,
        trust,
        risk,
        high_risk: risk.value() >= rejection_threshold,
    }
}
