//! Client credentials grant (server-to-server)

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;

use super::client::TokenClient;
use super::config::OAuthConfig;
use super::error::AuthResult;
use super::scope::join_scopes;
use super::traits::{CredentialStrategy, GrantKind};
use super::types::TokenRecord;
use crate::http::HttpTransport;
use crate::testing::time::{Clock, SystemClock};

/// Obtains application tokens with `grant_type=client_credentials`
///
/// The grant issues no refresh token, so [`refresh`](CredentialStrategy::refresh)
/// simply acquires a new token. When no scopes are configured the wildcard
/// scope `*` is requested.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
///
/// use basalam_common::auth::{AuthContext, ClientCredentials, OAuthConfig};
/// # use basalam_common::http::HttpTransport;
/// # use basalam_common::auth::AuthError;
/// # async fn example(transport: Arc<dyn HttpTransport>) -> Result<(), AuthError> {
/// let strategy = ClientCredentials::new(OAuthConfig::new("client-id", "secret"), transport)?;
/// let context = AuthContext::new(strategy);
/// let token = context.get_valid_token().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    client: TokenClient,
    scopes: BTreeSet<String>,
}

impl ClientCredentials {
    /// Create the strategy with the system clock.
    ///
    /// # Errors
    /// Returns [`AuthError::Configuration`](super::AuthError::Configuration)
    /// for unusable settings.
    pub fn new(config: OAuthConfig, transport: Arc<dyn HttpTransport>) -> AuthResult<Self> {
        Self::with_clock(config, transport, Arc::new(SystemClock))
    }

    /// Create the strategy with an explicit clock.
    ///
    /// # Errors
    /// Returns [`AuthError::Configuration`](super::AuthError::Configuration)
    /// for unusable settings.
    pub fn with_clock(
        config: OAuthConfig,
        transport: Arc<dyn HttpTransport>,
        clock: Arc<dyn Clock>,
    ) -> AuthResult<Self> {
        let client = TokenClient::new(&config, transport, clock)?;
        Ok(Self { client, scopes: config.scopes_or_wildcard() })
    }

    /// Scopes requested on every acquire
    #[must_use]
    pub const fn scopes(&self) -> &BTreeSet<String> {
        &self.scopes
    }

    /// Client ID
    #[must_use]
    pub fn client_id(&self) -> &str {
        self.client.client_id()
    }
}

#[async_trait]
impl CredentialStrategy for ClientCredentials {
    fn grant_kind(&self) -> GrantKind {
        GrantKind::ClientCredentials
    }

    async fn acquire(&self) -> AuthResult<TokenRecord> {
        let scope = join_scopes(&self.scopes);
        let params = vec![("scope".to_string(), scope.clone())];
        let record =
            self.client.request_token(GrantKind::ClientCredentials.as_str(), params).await?;
        Ok(record.or_scope(Some(&scope)))
    }

    async fn refresh(&self, _current: &TokenRecord) -> AuthResult<TokenRecord> {
        self.acquire().await
    }
}
