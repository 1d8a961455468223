//! # Domain Layer - Engagement Verification
//!
//! - `channel`: public channel references
//! - `task`: task requirements, one variant per task kind
//! - `scan`: evaluation window and the comment/post tally
//! - `verdict`: reports, waivers and membership outcomes
//! - `breaker`: scan-session circuit breaker
//! - `credentials`: scan-session credentials
//! - `errors`: VerifyError

pub mod breaker;
pub mod channel;
pub mod credentials;
pub mod errors;
pub mod scan;
pub mod task;
pub mod verdict;

pub use breaker::*;
pub use channel::*;
pub use credentials::*;
pub use errors::*;
pub use scan::*;
pub use task::*;
pub use verdict::*;
