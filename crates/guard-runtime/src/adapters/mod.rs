//! # Adapter Implementations
//!
//! Concrete implementations of the components' outbound ports:
//!
//! - `BotDatabase`: accounts, challenge sessions and referral records in memory
//! - `LoggingLedger`: idempotent reward ledger that logs every credit
//! - `LoggingNotifier`: outbound messages, logged and recorded
//! - `SharedClock`: one clock handle shared by every component
//!
//! The history-scan transport and chat member directory come from
//! `rg-04-engagement-verification::adapters`.

pub mod bot_db;
pub mod clock;
pub mod ledger;
pub mod notifier;

pub use bot_db::BotDatabase;
pub use clock::SharedClock;
pub use ledger::LoggingLedger;
pub use notifier::LoggingNotifier;
