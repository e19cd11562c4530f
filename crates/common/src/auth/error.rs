//! Error types for the token lifecycle.
//!
//! [`AuthError`] is `Clone` so a single refresh outcome can be handed to every
//! caller waiting on the same in-flight operation.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// Result alias used throughout the auth module.
pub type AuthResult<T> = Result<T, AuthError>;

/// Failures surfaced by credential strategies and the auth context.
///
/// The OAuth 2.0 variants mirror the `error` codes of RFC 6749 §5.2 and carry
/// the provider's `error_description` (empty when none was sent).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The token request was malformed
    #[error("invalid_request: {0}")]
    InvalidRequest(String),

    /// Client authentication failed (unknown client or wrong secret)
    #[error("invalid_client: {0}")]
    InvalidClient(String),

    /// Authorization code or refresh token is invalid, expired or reused
    #[error("invalid_grant: {0}")]
    InvalidGrant(String),

    /// Client is not allowed to use this grant type
    #[error("unauthorized_client: {0}")]
    UnauthorizedClient(String),

    /// Grant type not supported by the authorization server
    #[error("unsupported_grant_type: {0}")]
    UnsupportedGrantType(String),

    /// Requested scope is invalid or exceeds what the client may request
    #[error("invalid_scope: {0}")]
    InvalidScope(String),

    /// Resource owner or server denied the request
    #[error("access_denied: {0}")]
    AccessDenied(String),

    /// Authorization server failed to process the request
    #[error("server_error: {0}")]
    ServerError(String),

    /// Authorization server is temporarily overloaded
    #[error("temporarily_unavailable: {0}")]
    TemporarilyUnavailable(String),

    /// Returned `state` did not match the pending authorization nonce
    #[error("state parameter mismatch, authorization response rejected")]
    CsrfMismatch,

    /// Transport-level failure (connect, timeout, unreadable body)
    #[error("network error: {0}")]
    Network(String),

    /// No token is available and the strategy cannot obtain one on its own
    #[error("not authorized: complete the authorization code flow first")]
    NotAuthorized,

    /// A refresh was required but the current record has no refresh token
    #[error("no refresh token available")]
    NoRefreshToken,

    /// The token endpoint answered with a payload that is not a usable token
    #[error("invalid token data: {0}")]
    InvalidTokenData(String),

    /// The current token lacks scopes the caller requires
    #[error("missing required scopes: {}", .0.join(", "))]
    MissingScopes(Vec<String>),

    /// Client settings are unusable (e.g. a malformed endpoint URL)
    #[error("invalid auth configuration: {0}")]
    Configuration(String),

    /// Unexpected internal failure (e.g. a refresh task was aborted)
    #[error("internal auth error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Whether recovering requires restarting the credential flow.
    ///
    /// Terminal failures discard the cached token; transient ones keep it so a
    /// later call can try again.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::InvalidClient(_)
                | Self::InvalidGrant(_)
                | Self::UnauthorizedClient(_)
                | Self::UnsupportedGrantType(_)
                | Self::InvalidScope(_)
                | Self::CsrfMismatch
                | Self::NotAuthorized
                | Self::NoRefreshToken
        )
    }

    /// OAuth 2.0 error code for provider-originated variants.
    #[must_use]
    pub const fn oauth_code(&self) -> Option<&'static str> {
        match self {
            Self::InvalidRequest(_) => Some("invalid_request"),
            Self::InvalidClient(_) => Some("invalid_client"),
            Self::InvalidGrant(_) => Some("invalid_grant"),
            Self::UnauthorizedClient(_) => Some("unauthorized_client"),
            Self::UnsupportedGrantType(_) => Some("unsupported_grant_type"),
            Self::InvalidScope(_) => Some("invalid_scope"),
            Self::AccessDenied(_) => Some("access_denied"),
            Self::ServerError(_) => Some("server_error"),
            Self::TemporarilyUnavailable(_) => Some("temporarily_unavailable"),
            _ => None,
        }
    }

    /// Map a non-2xx token endpoint response to an error.
    ///
    /// A parseable `{error, error_description}` body wins. Otherwise the HTTP
    /// status decides: 401 is a client failure, 5xx a server failure and
    /// anything else an invalid request.
    #[must_use]
    pub fn from_token_response(status: u16, body: &serde_json::Value) -> Self {
        match OAuthErrorResponse::deserialize(body) {
            Ok(parsed) => parsed.into(),
            Err(_) => {
                let detail = format!("token endpoint returned HTTP {status}");
                match status {
                    401 => Self::InvalidClient(detail),
                    500..=599 => Self::ServerError(detail),
                    _ => Self::InvalidRequest(detail),
                }
            }
        }
    }
}

/// OAuth error response from authorization server
///
/// Standard OAuth 2.0 error response format (RFC 6749 §5.2).
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthErrorResponse {
    /// Error code, e.g. `invalid_grant`
    pub error: String,
    /// Human-readable explanation
    #[serde(default)]
    pub error_description: Option<String>,
}

impl fmt::Display for OAuthErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error_description {
            Some(desc) => write!(f, "{}: {}", self.error, desc),
            None => write!(f, "{}", self.error),
        }
    }
}

impl From<OAuthErrorResponse> for AuthError {
    fn from(response: OAuthErrorResponse) -> Self {
        let description = response.error_description.unwrap_or_default();
        match response.error.as_str() {
            "invalid_request" => Self::InvalidRequest(description),
            "invalid_client" => Self::InvalidClient(description),
            "invalid_grant" => Self::InvalidGrant(description),
            "unauthorized_client" => Self::UnauthorizedClient(description),
            "unsupported_grant_type" => Self::UnsupportedGrantType(description),
            "invalid_scope" => Self::InvalidScope(description),
            "access_denied" => Self::AccessDenied(description),
            "server_error" => Self::ServerError(description),
            "temporarily_unavailable" => Self::TemporarilyUnavailable(description),
            other => {
                Self::InvalidRequest(format!("unrecognized error code {other}: {description}"))
            }
        }
    }
}
