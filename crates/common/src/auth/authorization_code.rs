//! Authorization code grant (user-delegated access)
//!
//! The flow has two explicit states:
//!
//! ```text
//!   AwaitingAuthorization ──exchange_code──► Authorized
//!            ▲                                   │
//!            └────────────── reset ──────────────┘
//! ```
//!
//! `authorization_url` stores a single pending CSRF nonce; calling it again
//! replaces the nonce, and `exchange_code` consumes it whether or not it
//! matches.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{info, warn};
use url::Url;

use super::client::TokenClient;
use super::config::OAuthConfig;
use super::error::{AuthError, AuthResult};
use super::scope::join_scopes;
use super::state::{generate_state, validate_state};
use super::traits::{CredentialStrategy, GrantKind};
use super::types::TokenRecord;
use crate::http::HttpTransport;
use crate::testing::time::{Clock, SystemClock};

/// Where the authorization code flow currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationState {
    /// No successful code exchange yet
    AwaitingAuthorization,
    /// A code was exchanged; renewals use the refresh token
    Authorized,
}

#[derive(Debug)]
struct FlowState {
    phase: AuthorizationState,
    pending_state: Option<String>,
}

/// Obtains user tokens with `grant_type=authorization_code` and renews them
/// with `grant_type=refresh_token`
///
/// There is no implicit acquire: until [`exchange_code`](Self::exchange_code)
/// succeeds, [`acquire`](CredentialStrategy::acquire) fails with
/// [`AuthError::NotAuthorized`].
#[derive(Debug)]
pub struct AuthorizationCode {
    client: TokenClient,
    authorize_url: Url,
    redirect_uri: String,
    scopes: BTreeSet<String>,
    flow: Mutex<FlowState>,
}

impl AuthorizationCode {
    /// Create the strategy with the system clock.
    ///
    /// # Errors
    /// Returns [`AuthError::Configuration`] if the redirect URI is missing or
    /// a URL is malformed.
    pub fn new(config: OAuthConfig, transport: Arc<dyn HttpTransport>) -> AuthResult<Self> {
        Self::with_clock(config, transport, Arc::new(SystemClock))
    }

    /// Create the strategy with an explicit clock.
    ///
    /// # Errors
    /// Returns [`AuthError::Configuration`] if the redirect URI is missing or
    /// a URL is malformed.
    pub fn with_clock(
        config: OAuthConfig,
        transport: Arc<dyn HttpTransport>,
        clock: Arc<dyn Clock>,
    ) -> AuthResult<Self> {
        let redirect_uri = config
            .redirect_uri
            .clone()
            .filter(|uri| !uri.is_empty())
            .ok_or_else(|| AuthError::Configuration("redirect_uri is required".to_string()))?;
        let authorize_url = config.parsed_authorize_url()?;
        let client = TokenClient::new(&config, transport, clock)?;

        Ok(Self {
            client,
            authorize_url,
            redirect_uri,
            scopes: config.scopes,
            flow: Mutex::new(FlowState {
                phase: AuthorizationState::AwaitingAuthorization,
                pending_state: None,
            }),
        })
    }

    /// Current flow state
    #[must_use]
    pub fn state(&self) -> AuthorizationState {
        self.flow.lock().phase
    }

    /// Registered redirect URI
    #[must_use]
    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// Build the consent page URL and remember `state` as the pending nonce.
    ///
    /// Any previously issued nonce is invalidated. No network call is made.
    #[must_use]
    pub fn authorization_url(&self, state: &str) -> Url {
        let mut url = self.authorize_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("client_id", self.client.client_id())
                .append_pair("response_type", "code")
                .append_pair("redirect_uri", &self.redirect_uri);
            if !self.scopes.is_empty() {
                query.append_pair("scope", &join_scopes(&self.scopes));
            }
            query.append_pair("state", state);
        }

        self.flow.lock().pending_state = Some(state.to_string());
        url
    }

    /// Like [`authorization_url`](Self::authorization_url) with a freshly
    /// generated nonce, which is returned alongside the URL.
    #[must_use]
    pub fn begin_authorization(&self) -> (Url, String) {
        let state = generate_state();
        (self.authorization_url(&state), state)
    }

    /// Exchange an authorization code for a token.
    ///
    /// The pending nonce is consumed before anything else, so a second call
    /// for the same authorization attempt always fails with
    /// [`AuthError::CsrfMismatch`] without touching the network.
    ///
    /// # Errors
    /// - [`AuthError::CsrfMismatch`] if no nonce is pending or it differs
    /// - the mapped OAuth error, e.g. [`AuthError::InvalidGrant`] for a reused
    ///   code
    /// - [`AuthError::InvalidTokenData`] if the provider issued no refresh
    ///   token
    pub async fn exchange_code(
        &self,
        code: &str,
        returned_state: &str,
    ) -> AuthResult<TokenRecord> {
        let pending = self.flow.lock().pending_state.take();
        match pending {
            Some(expected) if validate_state(&expected, returned_state) => {}
            _ => {
                warn!("Authorization response rejected: state mismatch");
                return Err(AuthError::CsrfMismatch);
            }
        }

        let params = vec![
            ("code".to_string(), code.to_string()),
            ("redirect_uri".to_string(), self.redirect_uri.clone()),
        ];
        let record =
            self.client.request_token(GrantKind::AuthorizationCode.as_str(), params).await?;
        if record.refresh_token().is_none() {
            return Err(AuthError::InvalidTokenData(
                "authorization code response has no refresh_token".to_string(),
            ));
        }

        self.flow.lock().phase = AuthorizationState::Authorized;
        info!("Authorization code exchanged");
        Ok(record)
    }
}

#[async_trait]
impl CredentialStrategy for AuthorizationCode {
    fn grant_kind(&self) -> GrantKind {
        GrantKind::AuthorizationCode
    }

    async fn acquire(&self) -> AuthResult<TokenRecord> {
        Err(AuthError::NotAuthorized)
    }

    async fn refresh(&self, current: &TokenRecord) -> AuthResult<TokenRecord> {
        let refresh_token = current.refresh_token().ok_or(AuthError::NoRefreshToken)?;
        let params = vec![("refresh_token".to_string(), refresh_token.to_string())];
        let record = self.client.request_token("refresh_token", params).await?;
        Ok(record.or_refresh_token(Some(refresh_token)).or_scope(current.scope()))
    }

    fn reset(&self) {
        let mut flow = self.flow.lock();
        flow.phase = AuthorizationState::AwaitingAuthorization;
        flow.pending_state = None;
    }
}
