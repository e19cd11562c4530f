//! Token values exchanged with the authorization server
//!
//! [`TokenRecord`] is the immutable in-memory form of an issued token.
//! [`TokenResponse`] is the raw RFC 6749 success payload it is built from.

use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{AuthError, AuthResult};
use super::scope::WILDCARD_SCOPE;

/// Token type assumed when the provider omits `token_type`.
pub const DEFAULT_TOKEN_TYPE: &str = "Bearer";

/// Lifetime assumed when the provider omits `expires_in`.
pub const DEFAULT_EXPIRES_IN: i64 = 3600;

/// An issued access token and its metadata.
///
/// Records are immutable: a refresh produces a new record rather than
/// mutating the existing one. Construction validates the payload so a record
/// always holds a non-empty token with a positive lifetime.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use basalam_common::auth::TokenRecord;
/// use chrono::Utc;
///
/// let now = Utc::now();
/// let record = TokenRecord::new("tok1", 10, now).unwrap();
///
/// assert_eq!(record.expires_at(), now + chrono::Duration::seconds(10));
/// assert!(!record.is_expired(now));
/// assert!(record.should_refresh(now, Duration::from_secs(30)));
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredRecord", into = "StoredRecord")]
pub struct TokenRecord {
    access_token: String,
    token_type: String,
    expires_in: i64,
    refresh_token: Option<String>,
    scope: Option<String>,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl TokenRecord {
    /// Create a record issued at `created_at`, valid for `expires_in` seconds.
    ///
    /// # Errors
    /// Returns [`AuthError::InvalidTokenData`] if the token is empty, the
    /// lifetime is not positive, or the expiry is not representable.
    pub fn new(
        access_token: impl Into<String>,
        expires_in: i64,
        created_at: DateTime<Utc>,
    ) -> AuthResult<Self> {
        let access_token = access_token.into();
        if access_token.is_empty() {
            return Err(AuthError::InvalidTokenData("access_token is empty".to_string()));
        }
        if expires_in <= 0 {
            return Err(AuthError::InvalidTokenData(format!(
                "expires_in must be positive, got {expires_in}"
            )));
        }
        let expires_at = chrono::Duration::try_seconds(expires_in)
            .and_then(|lifetime| created_at.checked_add_signed(lifetime))
            .ok_or_else(|| {
                AuthError::InvalidTokenData(format!("expires_in {expires_in} is out of range"))
            })?;

        Ok(Self {
            access_token,
            token_type: DEFAULT_TOKEN_TYPE.to_string(),
            expires_in,
            refresh_token: None,
            scope: None,
            created_at,
            expires_at,
        })
    }

    /// Replace the token type.
    #[must_use]
    pub fn with_token_type(mut self, token_type: impl Into<String>) -> Self {
        self.token_type = token_type.into();
        self
    }

    /// Attach a refresh token.
    #[must_use]
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Attach the space-delimited granted scope.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Keep this record's refresh token, or adopt `fallback` if it has none.
    #[must_use]
    pub fn or_refresh_token(mut self, fallback: Option<&str>) -> Self {
        if self.refresh_token.is_none() {
            self.refresh_token = fallback.map(str::to_string);
        }
        self
    }

    /// Keep this record's scope, or adopt `fallback` if it has none.
    #[must_use]
    pub fn or_scope(mut self, fallback: Option<&str>) -> Self {
        if self.scope.is_none() {
            self.scope = fallback.filter(|s| !s.is_empty()).map(str::to_string);
        }
        self
    }

    /// Opaque bearer credential
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Token type, normally `Bearer`
    #[must_use]
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// Lifetime in seconds as reported by the provider
    #[must_use]
    pub const fn expires_in(&self) -> i64 {
        self.expires_in
    }

    /// Refresh token, when the grant issued one
    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// Space-delimited granted scope
    #[must_use]
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Issue time, taken from the clock at construction
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// `created_at + expires_in`
    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// `true` once `now` has reached the expiry instant.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// `true` once `now` is within `margin` of the expiry instant.
    ///
    /// A margin too large to represent is treated as always due.
    #[must_use]
    pub fn should_refresh(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        chrono::Duration::from_std(margin)
            .ok()
            .and_then(|margin| self.expires_at.checked_sub_signed(margin))
            .map_or(true, |threshold| now >= threshold)
    }

    /// Whole seconds left until expiry (negative once expired).
    #[must_use]
    pub fn seconds_until_expiry(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds()
    }

    /// Scopes granted to this token.
    #[must_use]
    pub fn granted_scopes(&self) -> BTreeSet<String> {
        self.scope
            .as_deref()
            .map(|scope| scope.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Whether `scope` was granted, directly or through the wildcard scope.
    #[must_use]
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scope.as_deref().is_some_and(|granted| {
            granted.split_whitespace().any(|s| s == scope || s == WILDCARD_SCOPE)
        })
    }

    /// Value for the `Authorization` header, e.g. `Bearer abc`.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

impl fmt::Debug for TokenRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenRecord")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("scope", &self.scope)
            .field("created_at", &self.created_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Serialized shape of a [`TokenRecord`]; deserialization re-validates.
#[derive(Serialize, Deserialize)]
struct StoredRecord {
    access_token: String,
    token_type: String,
    expires_in: i64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    refresh_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    scope: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<StoredRecord> for TokenRecord {
    type Error = AuthError;

    fn try_from(stored: StoredRecord) -> AuthResult<Self> {
        let mut record = Self::new(stored.access_token, stored.expires_in, stored.created_at)?
            .with_token_type(stored.token_type);
        record.refresh_token = stored.refresh_token;
        record.scope = stored.scope;
        Ok(record)
    }
}

impl From<TokenRecord> for StoredRecord {
    fn from(record: TokenRecord) -> Self {
        Self {
            access_token: record.access_token,
            token_type: record.token_type,
            expires_in: record.expires_in,
            refresh_token: record.refresh_token,
            scope: record.scope,
            created_at: record.created_at,
        }
    }
}

/// OAuth token response from authorization server
///
/// Standard OAuth 2.0 token response format (RFC 6749 §5.1). Everything but
/// `access_token` is optional on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// Issued access token
    pub access_token: String,
    /// Token type, defaults to `Bearer`
    #[serde(default)]
    pub token_type: Option<String>,
    /// Lifetime in seconds, defaults to one hour
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Refresh token, if issued
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Granted scope, if reported
    #[serde(default)]
    pub scope: Option<String>,
}

impl TokenResponse {
    /// Parse a success body returned by the token endpoint.
    ///
    /// # Errors
    /// Returns [`AuthError::InvalidTokenData`] if the body is not a token
    /// response.
    pub fn from_json(body: &serde_json::Value) -> AuthResult<Self> {
        Self::deserialize(body)
            .map_err(|e| AuthError::InvalidTokenData(format!("malformed token response: {e}")))
    }

    /// Build a validated record issued at `created_at`.
    ///
    /// # Errors
    /// Returns [`AuthError::InvalidTokenData`] if the payload fails
    /// [`TokenRecord::new`] validation.
    pub fn into_record(self, created_at: DateTime<Utc>) -> AuthResult<TokenRecord> {
        let expires_in = self.expires_in.unwrap_or(DEFAULT_EXPIRES_IN);
        let mut record = TokenRecord::new(self.access_token, expires_in, created_at)?;
        if let Some(token_type) = self.token_type.filter(|t| !t.is_empty()) {
            record = record.with_token_type(token_type);
        }
        if let Some(refresh_token) = self.refresh_token.filter(|t| !t.is_empty()) {
            record = record.with_refresh_token(refresh_token);
        }
        if let Some(scope) = self.scope.filter(|s| !s.is_empty()) {
            record = record.with_scope(scope);
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for auth::types.
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    /// Validates the freshly issued record scenario.
    ///
    /// Assertions:
    /// - A new record is neither expired nor due for refresh when the margin
    ///   is shorter than its lifetime.
    #[test]
    fn test_fresh_record_not_expired() {
        for expires_in in [1_i64, 10, 60, 3600, 86_400] {
            let record = TokenRecord::new("tok", expires_in, epoch()).unwrap();
            let margin = Duration::from_secs(u64::try_from(expires_in - 1).unwrap());
            assert!(!record.is_expired(epoch()));
            assert!(!record.should_refresh(epoch(), margin), "expires_in={expires_in}");
        }
    }

    /// Validates `TokenRecord::is_expired` at and past the expiry instant.
    ///
    /// Assertions:
    /// - Expired exactly at `created_at + expires_in` and afterwards.
    /// - Not expired one second before.
    #[test]
    fn test_expired_at_and_after_expiry() {
        let record = TokenRecord::new("tok", 10, epoch()).unwrap();
        let expiry = epoch() + chrono::Duration::seconds(10);

        assert!(!record.is_expired(expiry - chrono::Duration::seconds(1)));
        assert!(record.is_expired(expiry));
        assert!(record.is_expired(expiry + chrono::Duration::seconds(3600)));
    }

    /// Validates the refresh window boundary.
    ///
    /// Assertions:
    /// - `should_refresh` flips exactly at `expires_at - margin`.
    #[test]
    fn test_should_refresh_boundary() {
        let record = TokenRecord::new("tok", 3600, epoch()).unwrap();
        let margin = Duration::from_secs(60);
        let threshold = epoch() + chrono::Duration::seconds(3540);

        assert!(!record.should_refresh(threshold - chrono::Duration::seconds(1), margin));
        assert!(record.should_refresh(threshold, margin));
        assert!(record.should_refresh(epoch(), Duration::MAX));
    }

    #[test]
    fn test_rejects_invalid_payloads() {
        assert!(matches!(
            TokenRecord::new("tok", 0, epoch()),
            Err(AuthError::InvalidTokenData(_))
        ));
        assert!(matches!(
            TokenRecord::new("tok", -5, epoch()),
            Err(AuthError::InvalidTokenData(_))
        ));
        assert!(matches!(TokenRecord::new("", 60, epoch()), Err(AuthError::InvalidTokenData(_))));
        assert!(matches!(
            TokenRecord::new("tok", i64::MAX, epoch()),
            Err(AuthError::InvalidTokenData(_))
        ));
    }

    /// Validates defaults applied to a minimal token response.
    ///
    /// Assertions:
    /// - Token type defaults to `Bearer` and lifetime to 3600 seconds.
    /// - Missing refresh token and scope stay `None`.
    #[test]
    fn test_token_response_defaults() {
        let response = TokenResponse::from_json(&json!({"access_token": "abc"})).unwrap();
        let record = response.into_record(epoch()).unwrap();

        assert_eq!(record.token_type(), DEFAULT_TOKEN_TYPE);
        assert_eq!(record.expires_in(), DEFAULT_EXPIRES_IN);
        assert_eq!(record.refresh_token(), None);
        assert_eq!(record.scope(), None);
        assert_eq!(record.authorization_header(), "Bearer abc");
    }

    #[test]
    fn test_token_response_rejects_missing_access_token() {
        let result = TokenResponse::from_json(&json!({"expires_in": 60}));
        assert!(matches!(result, Err(AuthError::InvalidTokenData(_))));
    }

    #[test]
    fn test_token_response_rejects_zero_lifetime() {
        let response =
            TokenResponse::from_json(&json!({"access_token": "abc", "expires_in": 0})).unwrap();
        assert!(matches!(response.into_record(epoch()), Err(AuthError::InvalidTokenData(_))));
    }

    /// Validates refresh token carryover helpers.
    ///
    /// Assertions:
    /// - A missing refresh token adopts the fallback.
    /// - A fresh refresh token wins over the fallback.
    #[test]
    fn test_refresh_token_carryover() {
        let without = TokenRecord::new("new", 60, epoch()).unwrap().or_refresh_token(Some("R1"));
        assert_eq!(without.refresh_token(), Some("R1"));

        let with = TokenRecord::new("new", 60, epoch())
            .unwrap()
            .with_refresh_token("R2")
            .or_refresh_token(Some("R1"));
        assert_eq!(with.refresh_token(), Some("R2"));
    }

    #[test]
    fn test_scope_queries() {
        let record = TokenRecord::new("tok", 60, epoch())
            .unwrap()
            .with_scope("customer.wallet.read  vendor.product.write");

        assert!(record.has_scope("customer.wallet.read"));
        assert!(!record.has_scope("customer.wallet"));
        assert_eq!(record.granted_scopes().len(), 2);
        assert_eq!(record.seconds_until_expiry(epoch()), 60);
    }

    #[test]
    fn test_wildcard_scope_grants_everything() {
        let record = TokenRecord::new("tok", 60, epoch()).unwrap().with_scope("*");
        assert!(record.has_scope("vendor.parcel.write"));

        let unscoped = TokenRecord::new("tok", 60, epoch()).unwrap();
        assert!(!unscoped.has_scope("vendor.parcel.write"));
    }

    /// Validates that serialized records are re-validated when loaded.
    ///
    /// Assertions:
    /// - A stored record round-trips with its expiry intact.
    /// - A stored record with a non-positive lifetime is rejected.
    #[test]
    fn test_serde_revalidates() {
        let record = TokenRecord::new("tok", 120, epoch()).unwrap().with_refresh_token("r");
        let value = serde_json::to_value(&record).unwrap();
        let loaded: TokenRecord = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(loaded, record);
        assert!(value.get("expires_at").is_none());

        let mut corrupted = value;
        corrupted["expires_in"] = json!(0);
        assert!(serde_json::from_value::<TokenRecord>(corrupted).is_err());
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let record = TokenRecord::new("access-secret", 60, epoch())
            .unwrap()
            .with_token_type("MAC")
            .with_refresh_token("refresh-secret");

        let printed = format!("{record:?}");

        assert!(!printed.contains("access-secret"));
        assert!(!printed.contains("refresh-secret"));
        assert!(printed.contains("MAC"));
        assert!(printed.contains("[REDACTED]"));
    }
}
