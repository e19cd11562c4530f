//! Service API layer
//!
//! This module provides the HTTP core shared by the Basalam service clients:
//! token injection, the refresh-and-retry on 401, default headers and error
//! classification.
//!
//! # Architecture
//!
//! - Transport behind the [`HttpTransport`](basalam_common::http::HttpTransport)
//!   port (no direct reqwest)
//! - Tokens from an [`AccessTokenProvider`]: an OAuth
//!   [`AuthContext`](basalam_common::AuthContext) or a [`StaticToken`]
//! - One [`ServiceClient`] per service, aggregated by [`BasalamClient`]

pub mod auth;
pub mod client;
pub mod errors;
pub mod service;

pub use auth::{AccessTokenProvider, StaticToken};
pub use client::{oauth_config, BasalamClient, BasalamClientBuilder};
pub use errors::{ApiError, ApiErrorCategory, ApiResult};
pub use service::ServiceClient;
