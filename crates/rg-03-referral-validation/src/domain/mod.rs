//! # Domain Layer - Referral Validation
//!
//! - `entities`: ValidationRecord, ValidationStatus, decisions and reasons
//! - `state_machine`: allowed transitions and the pre-risk checks
//! - `errors`: ValidationError

pub mod entities;
pub mod errors;
pub mod state_machine;

pub use entities::*;
pub use errors::*;
pub use state_machine::*;
