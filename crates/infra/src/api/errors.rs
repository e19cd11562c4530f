//! API-specific error types
//!
//! Provides error classification for service calls with retry metadata.

use basalam_common::http::TransportError;
use basalam_common::AuthError;
use basalam_domain::DomainError;
use serde_json::Value;
use thiserror::Error;

/// Result alias for service calls
pub type ApiResult<T> = Result<T, ApiError>;

/// Categories of API errors for retry logic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Authentication errors (401, 403, token failures) - non-retryable
    Authentication,
    /// Rate limiting errors (429) - retry with backoff
    RateLimit,
    /// Server errors (5xx) - retryable
    Server,
    /// Client errors (4xx except auth) - non-retryable
    Client,
    /// Network/connection errors - retryable
    Network,
    /// Configuration or input errors - non-retryable
    Config,
}

/// Service call errors
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Obtaining or refreshing the access token failed
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The service answered with a non-2xx status
    #[error("HTTP {status}: {message}")]
    Http {
        /// Status code
        status: u16,
        /// Service error code, when the body carried one
        code: Option<String>,
        /// Human-readable message extracted from the body
        message: String,
        /// Raw response body
        body: Value,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The response body did not match the expected model
    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A request failed validation before it was sent
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ApiError {
    /// Build an [`ApiError::Http`] from a non-2xx response.
    ///
    /// The message is taken from `message`, `error_description`, `detail` or
    /// `error` (first string wins); the code from `code` or a string `error`.
    #[must_use]
    pub fn from_response(status: u16, body: &Value) -> Self {
        let message = match body {
            Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
            Value::Object(map) => ["message", "error_description", "detail", "error"]
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_str))
                .map(str::to_string),
            _ => None,
        }
        .unwrap_or_else(|| format!("request failed with status {status}"));

        let code = match body.get("code") {
            Some(Value::String(code)) => Some(code.clone()),
            Some(Value::Number(code)) => Some(code.to_string()),
            _ => body.get("error").and_then(Value::as_str).map(str::to_string),
        };

        Self::Http { status, code, message, body: body.clone() }
    }

    /// HTTP status of an [`ApiError::Http`]
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Get the error category for this error
    #[must_use]
    pub const fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Auth(AuthError::Network(_)) => ApiErrorCategory::Network,
            Self::Auth(AuthError::ServerError(_) | AuthError::TemporarilyUnavailable(_)) => {
                ApiErrorCategory::Server
            }
            Self::Auth(AuthError::Configuration(_) | AuthError::Internal(_)) => {
                ApiErrorCategory::Config
            }
            Self::Auth(_) => ApiErrorCategory::Authentication,
            Self::Http { status, .. } => match *status {
                401 | 403 => ApiErrorCategory::Authentication,
                429 => ApiErrorCategory::RateLimit,
                500..=599 => ApiErrorCategory::Server,
                _ => ApiErrorCategory::Client,
            },
            Self::Network(_) | Self::Timeout(_) => ApiErrorCategory::Network,
            Self::Decode(_) => ApiErrorCategory::Client,
            Self::Config(_) | Self::InvalidInput(_) => ApiErrorCategory::Config,
        }
    }

    /// Check if this error should be retried
    #[must_use]
    pub const fn should_retry(&self) -> bool {
        matches!(
            self.category(),
            ApiErrorCategory::RateLimit | ApiErrorCategory::Server | ApiErrorCategory::Network
        )
    }

    /// Get suggested retry delay in seconds
    #[must_use]
    pub const fn retry_delay_secs(&self) -> u64 {
        match self.category() {
            ApiErrorCategory::RateLimit => 60, // Wait for rate limit window
            ApiErrorCategory::Server => 10,
            ApiErrorCategory::Network => 5,
            ApiErrorCategory::Authentication
            | ApiErrorCategory::Client
            | ApiErrorCategory::Config => 0,
        }
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout(msg) => Self::Timeout(msg),
            TransportError::Connect(msg) | TransportError::Request(msg) => Self::Network(msg),
            TransportError::Decode(msg) => Self::Decode(msg),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Config(msg) => Self::Config(msg),
            DomainError::InvalidInput(msg) | DomainError::NotFound(msg) => {
                Self::InvalidInput(msg)
            }
        }
    }
}
