//! # Runtime Configuration
//!
//! One JSON document for every component, loaded from `RG_CONFIG_FILE` when
//! set, then overridden field by field from the environment.
//!
//! ## Production Requirements
//!
//! - Quarantine MUST NOT be zero
//! - Rejection threshold MUST lie in (0, 1]
//! - Scan credentials MUST be complete when engagement tasks are enabled

use rg_01_challenge::ChallengeConfig;
use rg_03_referral_validation::ValidatorConfig;
use rg_04_engagement_verification::{ScanClientConfig, ScanCredentials, VerifierConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Complete runtime configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Validator pacing, reward amount and the anti-abuse thresholds.
    pub validator: ValidatorConfig,
    /// History-scan session lifecycle.
    pub scan_client: ScanClientConfig,
    /// Engagement scan bounds.
    pub verifier: VerifierConfig,
    /// Whether channel engagement tasks are offered at all.
    pub engagement_tasks_enabled: bool,
    /// History-scan session credentials.
    pub scan_credentials: Option<ScanCredentials>,
}

impl RuntimeConfig {
    /// Challenge band derived from the risk thresholds, so both agree.
    pub fn challenge(&self) -> ChallengeConfig {
        ChallengeConfig {
            min_plausible_secs: self.validator.thresholds.captcha_time_min,
            max_plausible_secs: self.validator.thresholds.captcha_time_max,
        }
    }

    /// Validate configuration for production readiness.
    pub fn validate_for_production(&self) -> Result<(), ConfigError> {
        let thresholds = &self.validator.thresholds;
        thresholds
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if thresholds.quarantine_hours == 0 {
            return Err(ConfigError::ZeroQuarantine);
        }
        if !self.challenge().is_valid() {
            return Err(ConfigError::Invalid(format!(
                "captcha band [{}, {}] does not contain the optimal solve time",
                thresholds.captcha_time_min, thresholds.captcha_time_max
            )));
        }
        if self.engagement_tasks_enabled
            && !self
                .scan_credentials
                .as_ref()
                .is_some_and(ScanCredentials::is_complete)
        {
            return Err(ConfigError::MissingScanCredentials);
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },

    #[error("Invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("Quarantine is zero. Set RG_QUARANTINE_HOURS to at least 1.")]
    ZeroQuarantine,

    #[error(
        "Engagement tasks are enabled but scan credentials are incomplete. \
         Set RG_SCAN_API_ID, RG_SCAN_API_HASH and RG_SCAN_SESSION."
    )]
    MissingScanCredentials,

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Read a JSON config file. Missing fields take their defaults.
pub fn load_file(path: &Path) -> Result<RuntimeConfig, ConfigError> {
    let display = path.display().to_string();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: display.clone(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: display,
        source,
    })
}

fn parse_env<T: std::str::FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { var, value })
}

/// Apply environment overrides. `lookup` is `std::env::var` in production.
pub fn apply_env_overrides<F>(config: &mut RuntimeConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup("RG_QUARANTINE_HOURS") {
        config.validator.thresholds.quarantine_hours = parse_env("RG_QUARANTINE_HOURS", value)?;
    }
    if let Some(value) = lookup("RG_RISK_THRESHOLD") {
        config.validator.thresholds.rejection_threshold = parse_env("RG_RISK_THRESHOLD", value)?;
    }
    if let Some(value) = lookup("RG_VALIDATOR_INTERVAL_SECS") {
        config.validator.iteration_interval_secs = parse_env("RG_VALIDATOR_INTERVAL_SECS", value)?;
    }
    if let Some(value) = lookup("RG_ENGAGEMENT_TASKS") {
        config.engagement_tasks_enabled = parse_env("RG_ENGAGEMENT_TASKS", value)?;
    }

    let api_id = lookup("RG_SCAN_API_ID");
    let api_hash = lookup("RG_SCAN_API_HASH");
    let session = lookup("RG_SCAN_SESSION");
    if api_id.is_some() || api_hash.is_some() || session.is_some() {
        let mut credentials = config.scan_credentials.take().unwrap_or_default();
        if let Some(value) = api_id {
            credentials.api_id = parse_env("RG_SCAN_API_ID", value)?;
        }
        if let Some(value) = api_hash {
            credentials.api_hash = value;
        }
        if let Some(value) = session {
            credentials.session = value;
        }
        config.scan_credentials = Some(credentials);
    }
    Ok(())
}

/// Load configuration from `RG_CONFIG_FILE` (if set) and the environment.
pub fn load_config() -> Result<RuntimeConfig, ConfigError> {
    let mut config = match std::env::var("RG_CONFIG_FILE") {
        Ok(path) => {
            let config = load_file(Path::new(&path))?;
            info!(path = %path, "Loaded configuration file");
            config
        }
        Err(_) => RuntimeConfig::default(),
    };

    apply_env_overrides(&mut config, |var| std::env::var(var).ok())?;

    if config.scan_credentials.is_none() {
        warn!("No scan credentials configured, engagement scans will fail until rotated in");
    }
    Ok(config)
}
