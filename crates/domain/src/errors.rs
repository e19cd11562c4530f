//! Error types used throughout the domain layer

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Domain error for configuration and request validation
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum DomainError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl DomainError {
    pub(crate) fn invalid(field: &str, reason: &str) -> Self {
        Self::InvalidInput(format!("{field}: {reason}"))
    }
}

/// Result type alias for domain operations
pub type Result<T> = std::result::Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            DomainError::Config("missing client id".into()).to_string(),
            "Configuration error: missing client id"
        );
        assert_eq!(
            DomainError::invalid("amount", "must be positive").to_string(),
            "Invalid input: amount: must be positive"
        );
    }

    #[test]
    fn test_error_serializes_tagged() {
        let json = serde_json::to_value(DomainError::NotFound("vendor 7".into())).unwrap();
        assert_eq!(json, serde_json::json!({"type": "NotFound", "message": "vendor 7"}));
    }
}
