//! Aggregate client over every Basalam service
//!
//! One [`BasalamClient`] shares a single transport and a single token source
//! between all service clients, so a token refreshed by one service call is
//! reused by the others.

use std::collections::BTreeSet;
use std::sync::Arc;

use basalam_common::auth::{AuthorizationCode, ClientCredentials, OAuthConfig};
use basalam_common::http::HttpTransport;
use basalam_common::AuthContext;
use basalam_domain::config::{BasalamConfig, Credentials, Service};
use tracing::{debug, info, instrument};

use super::auth::{AccessTokenProvider, StaticToken};
use super::errors::{ApiError, ApiResult};
use super::service::ServiceClient;
use crate::http::ReqwestTransport;
use crate::services::{
    ChatService, CoreService, OrderProcessingService, OrderService, SearchService, UploadService,
    WalletService, WebhookService,
};

/// Build the OAuth settings for `credentials` against the endpoints of
/// `config`.
#[must_use]
pub fn oauth_config(credentials: &Credentials, config: &BasalamConfig) -> OAuthConfig {
    let oauth = OAuthConfig::new(credentials.client_id.clone(), credentials.client_secret.clone())
        .with_token_url(config.token_url())
        .with_authorize_url(config.authorize_url())
        .with_scopes(credentials.scopes.iter().cloned())
        .with_timeout(config.timeout());
    match &credentials.redirect_uri {
        Some(uri) => oauth.with_redirect_uri(uri.clone()),
        None => oauth,
    }
}

/// Client for every Basalam service
#[derive(Clone)]
pub struct BasalamClient {
    config: BasalamConfig,
    auth: Arc<dyn AccessTokenProvider>,
    core: CoreService,
    chat: ChatService,
    wallet: WalletService,
    webhook: WebhookService,
    order: OrderService,
    order_processing: OrderProcessingService,
    upload: UploadService,
    search: SearchService,
}

impl std::fmt::Debug for BasalamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasalamClient").field("config", &self.config).finish_non_exhaustive()
    }
}

impl BasalamClient {
    /// Create a builder for fluent configuration
    #[must_use]
    pub fn builder() -> BasalamClientBuilder {
        BasalamClientBuilder::default()
    }

    /// Client authenticated with the client credentials grant, talking to
    /// Basalam over a [`ReqwestTransport`].
    ///
    /// # Errors
    /// Returns [`ApiError::Config`] for unusable credentials or settings, and
    /// [`ApiError::Auth`] if the OAuth endpoints do not parse.
    pub fn client_credentials(
        credentials: &Credentials,
        config: BasalamConfig,
    ) -> ApiResult<Self> {
        let transport = default_transport(&config)?;
        Self::client_credentials_with_transport(credentials, config, transport)
    }

    /// [`client_credentials`](Self::client_credentials) over a caller-supplied
    /// transport.
    ///
    /// # Errors
    /// See [`client_credentials`](Self::client_credentials).
    pub fn client_credentials_with_transport(
        credentials: &Credentials,
        config: BasalamConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> ApiResult<Self> {
        credentials.validate()?;
        config.validate()?;
        let strategy =
            ClientCredentials::new(oauth_config(credentials, &config), transport.clone())?;
        let auth = AuthContext::new(strategy).with_refresh_margin(config.refresh_margin());
        info!(client_id = %credentials.client_id, "client credentials client created");
        Self::builder().config(config).transport(transport).auth(Arc::new(auth)).build()
    }

    /// Client for the authorization code grant.
    ///
    /// The returned context drives the consent flow
    /// ([`authorization_url`](AuthContext::authorization_url),
    /// [`exchange_code`](AuthContext::exchange_code)); it shares its token
    /// state with the client.
    ///
    /// # Errors
    /// Returns [`ApiError::Config`] for unusable credentials or settings, and
    /// [`ApiError::Auth`] if the redirect URI is missing.
    pub fn authorization_code(
        credentials: &Credentials,
        config: BasalamConfig,
    ) -> ApiResult<(Self, AuthContext<AuthorizationCode>)> {
        let transport = default_transport(&config)?;
        Self::authorization_code_with_transport(credentials, config, transport)
    }

    /// [`authorization_code`](Self::authorization_code) over a
    /// caller-supplied transport.
    ///
    /// # Errors
    /// See [`authorization_code`](Self::authorization_code).
    pub fn authorization_code_with_transport(
        credentials: &Credentials,
        config: BasalamConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> ApiResult<(Self, AuthContext<AuthorizationCode>)> {
        credentials.validate()?;
        config.validate()?;
        let strategy =
            AuthorizationCode::new(oauth_config(credentials, &config), transport.clone())?;
        let context = AuthContext::new(strategy).with_refresh_margin(config.refresh_margin());
        let client = Self::builder()
            .config(config)
            .transport(transport)
            .auth(Arc::new(context.clone()))
            .build()?;
        Ok((client, context))
    }

    /// Client using a fixed personal access token.
    ///
    /// # Errors
    /// Returns [`ApiError::Config`] for unusable settings.
    pub fn with_static_token(token: impl Into<String>, config: BasalamConfig) -> ApiResult<Self> {
        let transport = default_transport(&config)?;
        Self::builder()
            .config(config)
            .transport(transport)
            .auth(Arc::new(StaticToken::new(token)))
            .build()
    }

    /// Settings the client was built with
    #[must_use]
    pub const fn config(&self) -> &BasalamConfig {
        &self.config
    }

    /// A valid access token, refreshed first if it is about to expire.
    ///
    /// # Errors
    /// Returns [`ApiError::Auth`] if no token can be obtained.
    pub async fn access_token(&self) -> ApiResult<String> {
        self.auth.access_token().await
    }

    /// Replace the current token now.
    ///
    /// # Errors
    /// Returns [`ApiError::Auth`] if the refresh fails or the token source
    /// cannot refresh.
    #[instrument(skip(self))]
    pub async fn refresh_auth_token(&self) -> ApiResult<String> {
        let token = self.auth.force_refresh().await?;
        debug!("access token refreshed on request");
        Ok(token)
    }

    /// Scopes granted to the current token
    #[must_use]
    pub fn granted_scopes(&self) -> BTreeSet<String> {
        self.auth.granted_scopes()
    }

    /// `true` if `scope` (or the wildcard) was granted to the current token.
    #[must_use]
    pub fn has_scope(&self, scope: &str) -> bool {
        self.auth.has_scope(scope)
    }

    /// Users, vendors, shipping, bank accounts and catalog
    #[must_use]
    pub const fn core(&self) -> &CoreService {
        &self.core
    }

    /// Conversations and messages
    #[must_use]
    pub const fn chat(&self) -> &ChatService {
        &self.chat
    }

    /// Balances, spending and refunds
    #[must_use]
    pub const fn wallet(&self) -> &WalletService {
        &self.wallet
    }

    /// Webhook subscriptions and delivery logs
    #[must_use]
    pub const fn webhook(&self) -> &WebhookService {
        &self.webhook
    }

    /// Baskets, invoices and payments
    #[must_use]
    pub const fn order(&self) -> &OrderService {
        &self.order
    }

    /// Customer orders, vendor parcels and their items
    #[must_use]
    pub const fn order_processing(&self) -> &OrderProcessingService {
        &self.order_processing
    }

    /// File uploads
    #[must_use]
    pub const fn upload(&self) -> &UploadService {
        &self.upload
    }

    /// Product search
    #[must_use]
    pub const fn search(&self) -> &SearchService {
        &self.search
    }
}

fn default_transport(config: &BasalamConfig) -> ApiResult<Arc<dyn HttpTransport>> {
    let transport = ReqwestTransport::from_config(config)
        .map_err(|e| ApiError::Config(format!("Failed to build transport: {e}")))?;
    Ok(Arc::new(transport))
}

/// Builder for [`BasalamClient`]
#[derive(Default)]
pub struct BasalamClientBuilder {
    config: Option<BasalamConfig>,
    transport: Option<Arc<dyn HttpTransport>>,
    auth: Option<Arc<dyn AccessTokenProvider>>,
}

impl BasalamClientBuilder {
    /// Settings to use; production defaults when unset.
    #[must_use]
    pub fn config(mut self, config: BasalamConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Transport to use; a [`ReqwestTransport`] built from the settings when
    /// unset.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Token source shared by every service client.
    #[must_use]
    pub fn auth(mut self, auth: Arc<dyn AccessTokenProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// # Errors
    /// Returns [`ApiError::Config`] if no token source was set, the settings
    /// are invalid or the default transport cannot be built.
    pub fn build(self) -> ApiResult<BasalamClient> {
        let auth =
            self.auth.ok_or_else(|| ApiError::Config("Access token provider not set".into()))?;
        let config = self.config.unwrap_or_default();
        config.validate()?;
        let transport = match self.transport {
            Some(transport) => transport,
            None => default_transport(&config)?,
        };

        let client = |service: Service| {
            ServiceClient::from_config(service, &config, transport.clone(), auth.clone())
        };

        Ok(BasalamClient {
            core: CoreService::new(client(Service::Core)),
            chat: ChatService::new(client(Service::Chat)),
            wallet: WalletService::new(client(Service::Wallet)),
            webhook: WebhookService::new(client(Service::Webhook)),
            order: OrderService::new(client(Service::Order)),
            order_processing: OrderProcessingService::new(client(Service::OrderProcessing)),
            upload: UploadService::new(client(Service::Upload)),
            search: SearchService::new(client(Service::Search)),
            auth,
            config,
        })
    }
}
