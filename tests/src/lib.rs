//! # Referral-Guard Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # Hot-path benchmarks (scoring, tallying)
//! └── src/integration/  # End-to-end flows through the wired container
//!     ├── referral_flow.rs
//!     └── engagement_flow.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p rg-tests
//!
//! # By flow
//! cargo test -p rg-tests integration::referral_flow::
//! cargo test -p rg-tests integration::engagement_flow::
//!
//! # Benchmarks
//! cargo bench -p rg-tests
//! ```

#![allow(dead_code)]

pub mod integration;
