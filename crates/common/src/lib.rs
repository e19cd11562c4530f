//! Shared building blocks of the Basalam SDK.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: token values, scopes, OAuth errors and client settings
//! - `observability`: `tracing` instrumentation
//! - `runtime` (default): credential strategies, the auth context, the HTTP
//!   transport port, clocks and test doubles
//! - `test-utils`: alias for `runtime`, for dev-dependency declarations

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod auth;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod http;
#[cfg(feature = "runtime")]
pub mod time;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "runtime")]
pub use auth::{AuthContext, AuthorizationCode, BlockingAuthContext, ClientCredentials};
#[cfg(feature = "foundation")]
pub use auth::{AuthError, AuthResult, OAuthConfig, Scope, TokenRecord};
#[cfg(feature = "runtime")]
pub use http::{HttpTransport, TransportError};
#[cfg(feature = "runtime")]
pub use time::{Clock, SystemClock};
