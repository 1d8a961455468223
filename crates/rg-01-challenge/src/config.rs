//! # Challenge Configuration

use serde::{Deserialize, Serialize};

/// Plausible solve-latency band.
///
/// Solves faster than `min_plausible_secs` look scripted, slower than
/// `max_plausible_secs` look like a farm operator juggling sessions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChallengeConfig {
    /// Lower bound of a human solve, in seconds.
    pub min_plausible_secs: f64,
    /// Upper bound of a human solve, in seconds.
    pub max_plausible_secs: f64,
}

impl Default for ChallengeConfig {
    fn default() -> Self {
        Self {
            min_plausible_secs: 3.0,
            max_plausible_secs: 120.0,
        }
    }
}

impl ChallengeConfig {
    /// The band must contain the optimum, otherwise the best score is unreachable.
    pub fn is_valid(&self) -> bool {
        self.min_plausible_secs >= 0.0
            && self.min_plausible_secs <= crate::domain::OPTIMAL_SOLVE_SECS
            && self.max_plausible_secs >= crate::domain::OPTIMAL_SOLVE_SECS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ChallengeConfig::default();
        assert_eq!(config.min_plausible_secs, 3.0);
        assert_eq!(config.max_plausible_secs, 120.0);
        assert!(config.is_valid());
    }

    #[test]
    fn test_band_excluding_optimum_is_invalid() {
        let config = ChallengeConfig {
            min_plausible_secs: 25.0,
            max_plausible_secs: 60.0,
        };
        assert!(!config.is_valid());
    }
}
