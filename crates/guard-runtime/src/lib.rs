//! # Referral-Guard Runtime
//!
//! Wires the anti-abuse components to their adapters and runs the
//! background tasks.
//!
//! ## Modular Structure
//!
//! - `adapters/` - Port implementations (bot database, ledger, notifier, clock)
//! - `container/` - Configuration and dependency injection
//! - `runtime` - Background tasks and graceful shutdown
//!
//! ## Flow
//!
//! ```text
//!  join ──► ChallengeService ──► challenge score ──┐
//!                                                  ▼
//!  referral link ──► ReferralIntake ──► Pending ──► ValidatorWorker (every N s)
//!                                                  │
//!                                   quarantine over? ──► ReferralValidator
//!                                                  │        │
//!                                                  │        └── RiskScorer
//!                                                  ▼
//!                                  Accepted / Rejected ──► ledger, notifier
//!
//!  task completion ──► TaskVerifier ──► ChannelEngagementVerifier ──► HistoryScanClient
//!                                  └──► SubscriptionChecker
//! ```
//!
//! ## Startup Sequence
//!
//! 1. Initialize telemetry
//! 2. Load configuration (file, then environment)
//! 3. Validate for production
//! 4. Wire components
//! 5. Spawn the validator loop and the scan-session health monitor
//! 6. Wait for Ctrl-C, then shut down gracefully

pub mod adapters;
pub mod container;
pub mod runtime;

pub use container::{GuardContainer, RuntimeConfig};
pub use runtime::GuardRuntime;
