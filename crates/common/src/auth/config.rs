//! OAuth client settings shared by both credential strategies

use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use url::Url;

use super::error::{AuthError, AuthResult};
use super::scope::{join_scopes, WILDCARD_SCOPE};

/// Basalam token endpoint
pub const DEFAULT_TOKEN_URL: &str = "https://auth.basalam.com/oauth/token";

/// Basalam authorization (consent) page
pub const DEFAULT_AUTHORIZE_URL: &str = "https://basalam.com/accounts/sso";

/// Token endpoint timeout when none is configured
pub const DEFAULT_TOKEN_TIMEOUT: Duration = Duration::from_secs(30);

/// Client secret that never shows up in `Debug` output or logs
#[derive(Clone, PartialEq, Eq)]
pub struct ClientSecret(String);

impl ClientSecret {
    /// Wrap a secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// The raw secret, for building the token request.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClientSecret(***)")
    }
}

impl From<&str> for ClientSecret {
    fn from(secret: &str) -> Self {
        Self::new(secret)
    }
}

impl From<String> for ClientSecret {
    fn from(secret: String) -> Self {
        Self(secret)
    }
}

/// OAuth configuration for the Basalam authorization server
///
/// URLs are kept as strings here and parsed once when a strategy is built,
/// so a bad value fails at construction rather than on the first request.
///
/// # Examples
///
/// ```
/// use basalam_common::auth::{OAuthConfig, Scope};
///
/// let config = OAuthConfig::new("client-id", "client-secret")
///     .with_redirect_uri("https://example.com/callback")
///     .with_scopes([Scope::CustomerWalletRead, Scope::CustomerOrderRead]);
///
/// assert_eq!(config.scope_string(), "customer.order.read customer.wallet.read");
/// ```
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    /// OAuth client ID
    pub client_id: String,

    /// OAuth client secret
    pub client_secret: ClientSecret,

    /// Token endpoint URL
    pub token_url: String,

    /// Authorization page URL (authorization code flow only)
    pub authorize_url: String,

    /// Redirect URI registered for the client (authorization code flow only)
    pub redirect_uri: Option<String>,

    /// Requested scopes
    pub scopes: BTreeSet<String>,

    /// Timeout applied to each token endpoint request
    pub timeout: Duration,
}

impl OAuthConfig {
    /// Create a configuration pointing at the production Basalam endpoints.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<ClientSecret>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            authorize_url: DEFAULT_AUTHORIZE_URL.to_string(),
            redirect_uri: None,
            scopes: BTreeSet::new(),
            timeout: DEFAULT_TOKEN_TIMEOUT,
        }
    }

    /// Override the token endpoint.
    #[must_use]
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    /// Override the authorization page.
    #[must_use]
    pub fn with_authorize_url(mut self, url: impl Into<String>) -> Self {
        self.authorize_url = url.into();
        self
    }

    /// Set the redirect URI.
    #[must_use]
    pub fn with_redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(uri.into());
        self
    }

    /// Replace the requested scopes.
    #[must_use]
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).filter(|s| !s.is_empty()).collect();
        self
    }

    /// Set the token endpoint timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Requested scopes as a space-separated string
    #[must_use]
    pub fn scope_string(&self) -> String {
        join_scopes(&self.scopes)
    }

    /// Requested scopes, or the wildcard scope when none were set.
    #[must_use]
    pub fn scopes_or_wildcard(&self) -> BTreeSet<String> {
        if self.scopes.is_empty() {
            BTreeSet::from([WILDCARD_SCOPE.to_string()])
        } else {
            self.scopes.clone()
        }
    }

    pub(crate) fn parsed_token_url(&self) -> AuthResult<Url> {
        parse_url("token_url", &self.token_url)
    }

    pub(crate) fn parsed_authorize_url(&self) -> AuthResult<Url> {
        parse_url("authorize_url", &self.authorize_url)
    }

    pub(crate) fn validate_client(&self) -> AuthResult<()> {
        if self.client_id.is_empty() {
            return Err(AuthError::Configuration("client_id is empty".to_string()));
        }
        Ok(())
    }
}

fn parse_url(field: &str, value: &str) -> AuthResult<Url> {
    Url::parse(value).map_err(|e| AuthError::Configuration(format!("{field} {value:?}: {e}")))
}

#[cfg(test)]
mod tests {
    //! Unit tests for auth::config.
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OAuthConfig::new("c", "s");
        assert_eq!(config.token_url, DEFAULT_TOKEN_URL);
        assert_eq!(config.authorize_url, DEFAULT_AUTHORIZE_URL);
        assert_eq!(config.timeout, DEFAULT_TOKEN_TIMEOUT);
        assert!(config.scopes.is_empty());
        assert_eq!(config.scopes_or_wildcard(), BTreeSet::from(["*".to_string()]));
    }

    /// Validates that secrets stay out of debug output.
    ///
    /// Assertions:
    /// - The rendered config does not contain the secret.
    #[test]
    fn test_secret_redacted() {
        let config = OAuthConfig::new("c", "super-secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert_eq!(config.client_secret.expose(), "super-secret");
    }

    #[test]
    fn test_url_validation() {
        let config = OAuthConfig::new("c", "s").with_token_url("not a url");
        assert!(matches!(config.parsed_token_url(), Err(AuthError::Configuration(_))));
        assert!(config.parsed_authorize_url().is_ok());
        assert!(matches!(
            OAuthConfig::new("", "s").validate_client(),
            Err(AuthError::Configuration(_))
        ));
    }
}
