//! # Referral Validation Subsystem
//!
//! **Subsystem ID:** 3
//! **Architecture:** Hexagonal (Domain + Ports/Adapters)
//!
//! ## Purpose
//!
//! Holds every referral in quarantine, then decides it exactly once using the
//! referred account's state and its risk assessment. Accepted referrals
//! credit the referrer through the external ledger.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | Pending → Accepted \| Rejected, nothing else | `domain/state_machine.rs` - `transition()` |
//! | INVARIANT-2 | No decision before `created_at + quarantine` | `service.rs` - `decide()` and `worker.rs` |
//! | INVARIANT-3 | A record is decided at most once | per-record lock + store `complete_if_pending` CAS |
//! | INVARIANT-4 | Rewards are keyed by record id | `service.rs` - ledger idempotency key |
//! | INVARIANT-5 | Notification failures never undo a decision | `service.rs` - `notify_referrer()` |
//!
//! ## State Machine
//!
//! ```text
//!              ┌── user_not_found ────────┐
//! [PENDING] ───┼── no_subscription_check ─┼──→ [REJECTED]
//!   (quarantine)── risk ≥ threshold ──────┘
//!              └── risk < threshold ──────────→ [ACCEPTED] ──→ counter +1, ledger credit
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! rg-03-referral-validation/
//! ├── domain/      # ValidationRecord, state machine, reasons, errors
//! ├── ports/       # inbound APIs, stores / ledger / notifier
//! ├── intake.rs    # ReferralIntake - record creation with velocity limits
//! ├── service.rs   # ReferralValidator - the decision procedure
//! ├── worker.rs    # ValidatorWorker - background polling loop
//! ├── config.rs    # ValidatorConfig
//! └── metrics.rs   # Prometheus counters (feature = "metrics")
//! ```

pub mod config;
pub mod domain;
pub mod intake;
pub mod metrics;
pub mod ports;
pub mod service;
pub mod worker;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::ValidatorConfig;
pub use domain::{
    evaluate_precheck, transition, Decision, DecisionReport, Precheck, RecordId, RejectReason,
    ValidationError, ValidationRecord, ValidationResult, ValidationStatus,
};
pub use intake::ReferralIntake;
pub use ports::{
    AccountStore, ReferralIntakeApi, ReferralNotifier, ReferralValidationApi, RewardLedger,
    ValidationStore,
};
pub use service::ReferralValidator;
pub use worker::{IterationSummary, ValidatorWorker};
