//! OAuth 2.0 token lifecycle for the Basalam platform
//!
//! Obtains, caches and renews bearer tokens for every service client. Service
//! code only sees [`AuthContext::get_valid_token`] and
//! [`AuthContext::force_refresh`].
//!
//! # Features
//!
//! - **Client Credentials**: server-to-server tokens, renewed by re-acquiring
//! - **Authorization Code**: user-delegated tokens with CSRF-checked code
//!   exchange and refresh-token renewal
//! - **Single-Flight Refresh**: concurrent callers share one token request
//! - **Injectable Transport and Clock**: deterministic tests without a network
//! - **Blocking Facade**: the same core driven from synchronous code
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │ BlockingAuthContext  │  block_on over the async core
//! └──────────┬───────────┘
//!            │
//! ┌──────────▼───────────┐
//! │     AuthContext      │  TokenRecord cache + single-flight refresh
//! └──────────┬───────────┘
//!            │ CredentialStrategy
//!            ├──► ClientCredentials
//!            └──► AuthorizationCode   (CSRF state nonce)
//!                       │
//!              ┌────────▼────────┐
//!              │   TokenClient   │  form POST to the token endpoint
//!              └────────┬────────┘
//!                       ├──► HttpTransport
//!                       └──► Clock
//! ```
//!
//! # Usage Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use basalam_common::auth::{AuthContext, AuthorizationCode, OAuthConfig, Scope};
//! # use basalam_common::http::HttpTransport;
//!
//! # type BoxError = Box<dyn std::error::Error>;
//! # async fn example(transport: Arc<dyn HttpTransport>) -> Result<(), BoxError> {
//! let config = OAuthConfig::new("client-id", "client-secret")
//!     .with_redirect_uri("https://example.com/callback")
//!     .with_scopes([Scope::CustomerOrderRead]);
//! let context = AuthContext::new(AuthorizationCode::new(config, transport)?);
//!
//! // Send the user to the consent page
//! let (url, state) = context.begin_authorization();
//! println!("Open: {url}");
//!
//! // ... the redirect brings back `code` and `state` ...
//! context.exchange_code("code-from-redirect", &state).await?;
//!
//! // Valid token, renewed automatically before expiry
//! let token = context.get_valid_token().await?;
//! # let _ = token;
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - **[`types`]**: `TokenRecord` and the raw `TokenResponse`
//! - **[`error`]**: `AuthError` and OAuth error mapping
//! - **[`scope`]**: published Basalam scopes
//! - **[`state`]**: CSRF nonce generation and comparison
//! - **[`config`]**: client settings shared by both strategies
//! - **[`client`]**: token endpoint client
//! - **[`context`]**: token cache with single-flight refresh

pub mod config;
pub mod error;
pub mod scope;
pub mod state;
pub mod types;

#[cfg(feature = "runtime")]
mod authorization_code;
#[cfg(feature = "runtime")]
mod blocking;
#[cfg(feature = "runtime")]
pub mod client;
#[cfg(feature = "runtime")]
mod client_credentials;
#[cfg(feature = "runtime")]
pub mod context;
#[cfg(feature = "runtime")]
pub mod traits;

// Re-export commonly used types and functions
#[cfg(feature = "runtime")]
pub use authorization_code::{AuthorizationCode, AuthorizationState};
#[cfg(feature = "runtime")]
pub use blocking::BlockingAuthContext;
#[cfg(feature = "runtime")]
pub use client::TokenClient;
#[cfg(feature = "runtime")]
pub use client_credentials::ClientCredentials;
pub use config::{
    ClientSecret, OAuthConfig, DEFAULT_AUTHORIZE_URL, DEFAULT_TOKEN_TIMEOUT, DEFAULT_TOKEN_URL,
};
#[cfg(feature = "runtime")]
pub use context::{AuthContext, TokenStatus, DEFAULT_REFRESH_MARGIN};
pub use error::{AuthError, AuthResult, OAuthErrorResponse};
pub use scope::{join_scopes, Scope, WILDCARD_SCOPE};
pub use state::{generate_state, validate_state};
#[cfg(feature = "runtime")]
pub use traits::{CredentialStrategy, GrantKind};
pub use types::{TokenRecord, TokenResponse, DEFAULT_EXPIRES_IN, DEFAULT_TOKEN_TYPE};
