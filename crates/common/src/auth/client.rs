//! Token endpoint client
//!
//! Performs the form-encoded POST of RFC 6749 §4 and turns the answer into a
//! [`TokenRecord`] or an [`AuthError`]. Both strategies share it; neither
//! retries.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};
use url::Url;

use super::config::{ClientSecret, OAuthConfig};
use super::error::{AuthError, AuthResult};
use super::types::{TokenRecord, TokenResponse};
use crate::http::{HttpMethod, HttpRequest, HttpTransport};
use crate::testing::time::Clock;

/// Client for one OAuth token endpoint
#[derive(Clone)]
pub struct TokenClient {
    transport: Arc<dyn HttpTransport>,
    clock: Arc<dyn Clock>,
    token_url: Url,
    client_id: String,
    client_secret: ClientSecret,
    timeout: Duration,
}

impl fmt::Debug for TokenClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenClient")
            .field("token_url", &self.token_url.as_str())
            .field("client_id", &self.client_id)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl TokenClient {
    /// Build a client from the shared OAuth settings.
    ///
    /// # Errors
    /// Returns [`AuthError::Configuration`] for an empty client ID or a
    /// malformed token URL.
    pub fn new(
        config: &OAuthConfig,
        transport: Arc<dyn HttpTransport>,
        clock: Arc<dyn Clock>,
    ) -> AuthResult<Self> {
        config.validate_client()?;
        Ok(Self {
            transport,
            clock,
            token_url: config.parsed_token_url()?,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            timeout: config.timeout,
        })
    }

    /// Client ID sent with every request
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Token endpoint URL
    #[must_use]
    pub const fn token_url(&self) -> &Url {
        &self.token_url
    }

    /// Clock used to stamp issued records
    #[must_use]
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// POST a grant to the token endpoint.
    ///
    /// `grant_type`, `client_id` and `client_secret` are always sent; `params`
    /// carries the grant-specific fields.
    ///
    /// # Errors
    /// - [`AuthError::Network`] if no response was obtained
    /// - the mapped OAuth error for a non-2xx response
    /// - [`AuthError::InvalidTokenData`] for a 2xx response that is not a
    ///   usable token
    pub async fn request_token(
        &self,
        grant_type: &str,
        params: Vec<(String, String)>,
    ) -> AuthResult<TokenRecord> {
        let mut form = vec![
            ("grant_type".to_string(), grant_type.to_string()),
            ("client_id".to_string(), self.client_id.clone()),
            ("client_secret".to_string(), self.client_secret.expose().to_string()),
        ];
        form.extend(params);

        let request = HttpRequest::new(HttpMethod::Post, self.token_url.clone())
            .header("Accept", "application/json")
            .form(form)
            .timeout(self.timeout);

        debug!(grant_type, url = %self.token_url, "Requesting token");

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        if !response.is_success() {
            let error = AuthError::from_token_response(response.status, &response.body);
            warn!(grant_type, status = response.status, error = %error, "Token request rejected");
            return Err(error);
        }

        let record = TokenResponse::from_json(&response.body)?.into_record(self.clock.now())?;
        debug!(
            grant_type,
            expires_in = record.expires_in(),
            has_refresh_token = record.refresh_token().is_some(),
            "Token issued"
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for auth::client.
    use serde_json::json;

    use super::*;
    use crate::http::HttpResponse;
    use crate::testing::{MockClock, MockTransport};

    const TOKEN_URL: &str = "https://auth.test/oauth/token";

    fn client(transport: &MockTransport, clock: &MockClock) -> TokenClient {
        let config = OAuthConfig::new("c", "s").with_token_url(TOKEN_URL);
        TokenClient::new(&config, Arc::new(transport.clone()), Arc::new(clock.clone())).unwrap()
    }

    /// Validates the form sent to the token endpoint.
    ///
    /// Assertions:
    /// - Grant type and client credentials are form fields.
    /// - Extra params are appended.
    /// - The record is stamped with the clock's time.
    #[tokio::test]
    async fn test_request_token_sends_form() {
        let transport = MockTransport::new();
        let clock = MockClock::new();
        transport.push_json(TOKEN_URL, 200, json!({"access_token": "tok", "expires_in": 60}));

        let record = client(&transport, &clock)
            .request_token("client_credentials", vec![("scope".into(), "*".into())])
            .await
            .unwrap();

        assert_eq!(record.access_token(), "tok");
        assert_eq!(record.created_at(), clock.now());

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.form_value("grant_type"), Some("client_credentials"));
        assert_eq!(sent.form_value("client_id"), Some("c"));
        assert_eq!(sent.form_value("client_secret"), Some("s"));
        assert_eq!(sent.form_value("scope"), Some("*"));
        assert_eq!(sent.timeout, Some(crate::auth::config::DEFAULT_TOKEN_TIMEOUT));
    }

    #[tokio::test]
    async fn test_request_token_maps_oauth_error() {
        let transport = MockTransport::new();
        transport.push_json(
            TOKEN_URL,
            401,
            json!({"error": "invalid_client", "error_description": "bad secret"}),
        );

        let err = client(&transport, &MockClock::new())
            .request_token("client_credentials", Vec::new())
            .await
            .unwrap_err();

        assert_eq!(err, AuthError::InvalidClient("bad secret".into()));
    }

    #[tokio::test]
    async fn test_request_token_maps_transport_failure() {
        let transport = MockTransport::new();
        transport.push_network_error(TOKEN_URL, "connection refused");

        let err = client(&transport, &MockClock::new())
            .request_token("client_credentials", Vec::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::Network(msg) if msg.contains("connection refused")));
    }

    #[tokio::test]
    async fn test_request_token_rejects_malformed_success() {
        let transport = MockTransport::new();
        transport.push(TOKEN_URL, Ok(HttpResponse::new(200, json!("<html>"))));

        let err = client(&transport, &MockClock::new())
            .request_token("client_credentials", Vec::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::InvalidTokenData(_)));
    }

    #[test]
    fn test_rejects_bad_token_url() {
        let config = OAuthConfig::new("c", "s").with_token_url("::");
        let result = TokenClient::new(
            &config,
            Arc::new(MockTransport::new()),
            Arc::new(MockClock::new()),
        );
        assert!(matches!(result, Err(AuthError::Configuration(_))));
    }
}
