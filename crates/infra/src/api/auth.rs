//! Access token sources for the service clients
//!
//! [`AccessTokenProvider`] is the seam between the service clients and the
//! OAuth core: an [`AuthContext`] for either grant, or a [`StaticToken`] for a
//! personal access token that cannot be refreshed.

use std::collections::BTreeSet;
use std::fmt;

use async_trait::async_trait;
use basalam_common::auth::{AuthError, CredentialStrategy, WILDCARD_SCOPE};
use basalam_common::AuthContext;

use super::errors::ApiError;

/// Trait for providing access tokens
///
/// This trait allows dependency injection and testing with mock providers.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Get a valid access token
    ///
    /// Implementations refresh an expiring token before returning it.
    async fn access_token(&self) -> Result<String, ApiError>;

    /// Replace the current token even if it has not expired.
    ///
    /// Called after a service rejected the token with 401.
    async fn force_refresh(&self) -> Result<String, ApiError>;

    /// Value of the `Authorization` header for the current token.
    ///
    /// Defaults to the `Bearer` scheme; providers that know the issued token
    /// type use it instead.
    async fn authorization_header(&self) -> Result<String, ApiError> {
        Ok(format!("Bearer {}", self.access_token().await?))
    }

    /// [`force_refresh`](Self::force_refresh), returned as a header value.
    async fn refreshed_authorization_header(&self) -> Result<String, ApiError> {
        Ok(format!("Bearer {}", self.force_refresh().await?))
    }

    /// Whether [`force_refresh`](Self::force_refresh) can produce a new token.
    fn can_refresh(&self) -> bool {
        true
    }

    /// Scopes granted to the current token
    fn granted_scopes(&self) -> BTreeSet<String> {
        BTreeSet::new()
    }

    /// `true` if `scope` (or the wildcard) was granted.
    fn has_scope(&self, scope: &str) -> bool {
        let granted = self.granted_scopes();
        granted.contains(scope) || granted.contains(WILDCARD_SCOPE)
    }
}

#[async_trait]
impl<S: CredentialStrategy> AccessTokenProvider for AuthContext<S> {
    async fn access_token(&self) -> Result<String, ApiError> {
        Ok(self.get_valid_token().await?)
    }

    async fn force_refresh(&self) -> Result<String, ApiError> {
        Ok(Self::force_refresh(self).await?)
    }

    async fn authorization_header(&self) -> Result<String, ApiError> {
        Ok(self.valid_record().await?.authorization_header())
    }

    async fn refreshed_authorization_header(&self) -> Result<String, ApiError> {
        Ok(self.refreshed_record().await?.authorization_header())
    }

    fn granted_scopes(&self) -> BTreeSet<String> {
        Self::granted_scopes(self)
    }

    fn has_scope(&self, scope: &str) -> bool {
        Self::has_scope(self, scope)
    }
}

/// A fixed bearer token, e.g. a personal access token
#[derive(Clone)]
pub struct StaticToken {
    token: String,
    scopes: BTreeSet<String>,
}

impl StaticToken {
    /// Wrap `token`; no scopes are assumed unless declared.
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into(), scopes: BTreeSet::new() }
    }

    /// Declare the scopes the token was issued with.
    #[must_use]
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }
}

impl fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticToken")
            .field("token", &"[REDACTED]")
            .field("scopes", &self.scopes)
            .finish()
    }
}

#[async_trait]
impl AccessTokenProvider for StaticToken {
    async fn access_token(&self) -> Result<String, ApiError> {
        Ok(self.token.clone())
    }

    async fn force_refresh(&self) -> Result<String, ApiError> {
        Err(AuthError::NoRefreshToken.into())
    }

    fn can_refresh(&self) -> bool {
        false
    }

    fn granted_scopes(&self) -> BTreeSet<String> {
        self.scopes.clone()
    }
}
