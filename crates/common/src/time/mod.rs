//! Time abstractions
//!
//! Token expiry is computed against an injected [`Clock`] rather than
//! `Utc::now()` directly, so expiry and refresh decisions are testable.

// Re-export Clock abstractions from testing module
pub use crate::testing::time::{Clock, MockClock, SystemClock};
