//! # Engagement Verification Subsystem
//!
//! **Subsystem ID:** 4
//! **Architecture:** Hexagonal (Domain + Ports/Adapters)
//!
//! ## Purpose
//!
//! Decides whether a user engaged with a partner channel: enough comments on
//! enough distinct posts inside a time window, found by scanning the channel
//! history through a stateful, session-based messaging client. Also checks
//! plain channel subscriptions through the request/response chat API.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | Comment time, not post time, must be in window | `domain/scan.rs` - `ScanWindow::contains()` |
//! | INVARIANT-2 | Pass needs comments AND distinct posts | `domain/scan.rs` - `EngagementTally::satisfied()` |
//! | INVARIANT-3 | All timestamps compared in UTC | `ports/outbound.rs` - `ScanMessage::sent_at_utc()` |
//! | INVARIANT-4 | Single writer on the scan session | `client.rs` - session lease holds the mutex |
//! | INVARIANT-5 | Disabled session only recovers via rotation | `domain/breaker.rs` - `SessionBreaker` |
//! | INVARIANT-6 | Engagement fails open, subscription fails closed | `verifier.rs`, `subscription.rs` |
//!
//! ## Session Circuit Breaker
//!
//! ```text
//! [DISCONNECTED] ──connect ok──→ [CONNECTED] ──close──→ [DISCONNECTED]
//!       │                             │
//!       └──connect failed──→ [COOLING_DOWN {failures}] ──failures ≥ max──→ [DISABLED]
//!                                     │                                       ↑  │
//!   auth expired / session compromised from any state ────────────────────────┘  │
//!                                                                                │
//!   [DISCONNECTED] ←──────────────── credentials rotated ────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! rg-04-engagement-verification/
//! ├── domain/          # channel refs, task requirements, scan window/tally, breaker, errors
//! ├── ports/           # verifier APIs (inbound), scan transport + chat member API (outbound)
//! ├── adapters/        # in-memory transport and member directory
//! ├── client.rs        # HistoryScanClient - session lifecycle + circuit breaker
//! ├── verifier.rs      # ChannelEngagementVerifier - the history walk
//! ├── subscription.rs  # SubscriptionChecker
//! ├── tasks.rs         # TaskVerifier - dispatch per requirement kind
//! ├── config.rs        # ScanClientConfig, VerifierConfig
//! └── metrics.rs       # Prometheus counters (feature = "metrics")
//! ```

pub mod adapters;
pub mod client;
pub mod config;
pub mod domain;
pub mod metrics;
pub mod ports;
pub mod subscription;
pub mod tasks;
pub mod verifier;

pub use adapters::{InMemoryChatMembers, InMemoryHistory};
pub use client::{HealthStatus, HistoryScanClient, ScanSession, SessionStatus};
pub use config::{ScanClientConfig, VerifierConfig};
pub use domain::{
    ActivityRequirement, ChannelRef, EngagementReport, EngagementTally, MemberStatus,
    ScanCredentials, ScanWindow, SessionBreaker, SessionEvent, SessionState, SubscriptionVerdict,
    TaskRequirement, TaskVerdict, VerifyError, VerifyResult, WaiverReason,
};
pub use ports::{
    ChannelHandle, ChatMemberApi, EngagementVerifierApi, HistoryScanTransport, MessageId,
    ScanMessage, SubscriptionApi, TaskVerificationApi,
};
pub use subscription::SubscriptionChecker;
pub use tasks::TaskVerifier;
pub use verifier::ChannelEngagementVerifier;
