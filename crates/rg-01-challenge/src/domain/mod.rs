//! # Domain Layer - Challenge Subsystem
//!
//! Pure logic, no I/O.
//!
//! - `entities`: ChallengeSession, ArithmeticExpression, evaluation results
//! - `generator`: random expression and multiple-choice candidates
//! - `scoring`: solve latency → quality score
//! - `errors`: ChallengeError

pub mod entities;
pub mod errors;
pub mod generator;
pub mod scoring;

pub use entities::*;
pub use errors::*;
pub use generator::*;
pub use scoring::*;
