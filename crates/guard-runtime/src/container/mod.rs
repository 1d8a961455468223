//! # Service Container
//!
//! Holds every component instance with its adapters injected.
//!
//! ## Wiring Order
//!
//! ```text
//! Level 0: clock, BotDatabase, ledger, notifier, scan transport, member directory
//! Level 1: ChallengeService, RiskScorer, HistoryScanClient, SubscriptionChecker
//! Level 2: ReferralIntake, ReferralValidator, ChannelEngagementVerifier
//! Level 3: ValidatorWorker (per run), TaskVerifier
//! ```

pub mod config;
pub mod services;

pub use config::{apply_env_overrides, load_config, load_file, ConfigError, RuntimeConfig};
pub use services::*;
