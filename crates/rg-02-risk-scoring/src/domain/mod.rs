//! # Domain Layer - Risk Scoring
//!
//! - `signals`: the individual trust heuristics, each in `[0, 1]`
//! - `assessment`: weights, combination and the audited result
//! - `errors`: RiskError

pub mod assessment;
pub mod errors;
pub mod signals;

pub use assessment::*;
pub use errors::*;
pub use signals::*;
