//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Identity**: `AccountId`, `Account`, `AccountProfile`
//! - **Scoring**: `UnitScore`
//!
//! The account record itself is owned by an external store. Components read
//! it and write back only the subset they are responsible for (challenge
//! score, risk score, validated-referral counter).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric account identifier assigned by the messaging platform.
///
/// Identifiers grow monotonically over the platform's lifetime, which is what
/// the account-age heuristic relies on.
pub type AccountId = i64;

/// All timestamps are normalised to UTC before they enter the domain.
pub type Timestamp = DateTime<Utc>;

/// A score in the closed interval `[0, 1]`.
///
/// Construction either validates (`new`) or clamps (`clamped`); there is no
/// way to hold a negative or >1 value.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct UnitScore(f64);

impl UnitScore {
    /// Lowest possible score.
    pub const ZERO: UnitScore = UnitScore(0.0);
    /// Neutral score used when a signal is unavailable.
    pub const NEUTRAL: UnitScore = UnitScore(0.5);
    /// Highest possible score.
    pub const ONE: UnitScore = UnitScore(1.0);

    /// Validate a raw value. Returns `None` for NaN or out-of-range input.
    pub fn new(value: f64) -> Option<Self> {
        if (0.0..=1.0).contains(&value) {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Clamp a raw value into `[0, 1]`. NaN maps to zero.
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// The underlying value.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for UnitScore {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        UnitScore::new(value).ok_or_else(|| format!("score {value} outside [0, 1]"))
    }
}

impl From<UnitScore> for f64 {
    fn from(score: UnitScore) -> Self {
        score.0
    }
}

impl fmt::Display for UnitScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Public profile fields as returned by the platform's chat lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountProfile {
    /// Display name (first name on most platforms).
    pub display_name: Option<String>,
    /// Public handle without the leading `@`.
    pub handle: Option<String>,
}

impl AccountProfile {
    /// Build a profile from optional name and handle.
    pub fn new(display_name: Option<&str>, handle: Option<&str>) -> Self {
        Self {
            display_name: display_name.map(str::to_string),
            handle: handle.map(str::to_string),
        }
    }
}

/// Subset of the externally-owned account record the core reads and writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Platform identifier.
    pub id: AccountId,
    /// When the account registered with the bot.
    pub registered_at: Timestamp,
    /// Who invited this account, if anyone.
    pub referrer_id: Option<AccountId>,
    /// Set by the external subscription check.
    pub subscription_confirmed: bool,
    /// When the subscription check passed.
    pub subscription_confirmed_at: Option<Timestamp>,
    /// Quality of the challenge solve.
    pub challenge_score: Option<UnitScore>,
    /// Last computed risk.
    pub risk_score: Option<UnitScore>,
    /// Number of this account's referrals that were accepted.
    pub validated_referrals: u32,
}

impl Account {
    /// A freshly registered account with no signals yet.
    pub fn new(id: AccountId, registered_at: Timestamp) -> Self {
        Self {
            id,
            registered_at,
            referrer_id: None,
            subscription_confirmed: false,
            subscription_confirmed_at: None,
            challenge_score: None,
            risk_score: None,
            validated_referrals: 0,
        }
    }

    /// Attach a referrer.
    pub fn with_referrer(mut self, referrer_id: AccountId) -> Self {
        self.referrer_id = Some(referrer_id);
        self
    }

    /// Mark the subscription check as passed at `at`.
    pub fn confirm_subscription(&mut self, at: Timestamp) {
        self.subscription_confirmed = true;
        self.subscription_confirmed_at = Some(at);
    }
}
