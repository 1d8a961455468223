//! # Shared Types Crate
//!
//! Types every referral-guard component agrees on.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: The `Account` entity and identifier aliases
//!   live here, so the stores behind each component's ports share one shape.
//! - **Closed Error Taxonomy**: Every outbound call to an external
//!   collaborator fails with an [`ExternalError`] variant; callers match on it
//!   instead of inspecting message strings.
//! - **Injected Time**: Components never read the wall clock directly; they
//!   take a [`TimeSource`] so quarantine and window boundaries are testable.

pub mod entities;
pub mod errors;
pub mod time_source;

pub use entities::*;
pub use errors::*;
pub use time_source::*;
