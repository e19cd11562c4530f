//! Testing utilities and helpers
//!
//! - **[`time`]**: the [`Clock`] port with system and mock implementations
//! - **[`mocks`]**: a scripted [`MockTransport`](mocks::MockTransport)
//!
//! ## Usage
//!
//! ```rust
//! use std::time::Duration;
//!
//! use basalam_common::testing::{Clock, MockClock, MockTransport};
//!
//! let clock = MockClock::new();
//! let transport = MockTransport::new();
//! clock.advance(Duration::from_secs(5));
//! assert_eq!(transport.total_requests(), 0);
//! ```

pub mod mocks;
pub mod time;

pub use mocks::MockTransport;
pub use time::{Clock, MockClock, SystemClock};
