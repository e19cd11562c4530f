//! Trait seam between the auth context and credential strategies
//!
//! [`AuthContext`](super::AuthContext) only knows how to cache and
//! single-flight; how a token is obtained is up to the strategy.

use async_trait::async_trait;

use super::error::AuthResult;
use super::types::TokenRecord;

/// OAuth 2.0 grant used by a strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrantKind {
    /// `client_credentials`
    ClientCredentials,
    /// `authorization_code` (with `refresh_token` renewals)
    AuthorizationCode,
}

impl GrantKind {
    /// Wire value of the initial grant
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ClientCredentials => "client_credentials",
            Self::AuthorizationCode => "authorization_code",
        }
    }
}

/// Knows how to obtain and renew tokens for one OAuth 2.0 client
///
/// Each call makes at most one request to the token endpoint. Callers that
/// need deduplication go through [`AuthContext`](super::AuthContext).
#[async_trait]
pub trait CredentialStrategy: Send + Sync + 'static {
    /// Grant this strategy performs
    fn grant_kind(&self) -> GrantKind;

    /// Obtain a token without prior state.
    ///
    /// # Errors
    /// Returns the mapped OAuth error, [`AuthError::Network`] on transport
    /// failure, or [`AuthError::NotAuthorized`] when the grant needs user
    /// interaction first.
    ///
    /// [`AuthError::Network`]: super::AuthError::Network
    /// [`AuthError::NotAuthorized`]: super::AuthError::NotAuthorized
    async fn acquire(&self) -> AuthResult<TokenRecord>;

    /// Renew `current`.
    ///
    /// # Errors
    /// Same as [`acquire`](Self::acquire), plus
    /// [`AuthError::NoRefreshToken`](super::AuthError::NoRefreshToken) for
    /// grants that need one.
    async fn refresh(&self, current: &TokenRecord) -> AuthResult<TokenRecord>;

    /// Drop any per-flow state after logout or a terminal failure.
    fn reset(&self) {}
}
