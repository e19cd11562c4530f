//! SDK configuration
//!
//! [`BasalamConfig`] is an immutable value: build it once (constructor,
//! builder methods, or `basalam_infra::config::loader`) and hand it to every
//! client. [`Credentials`] carries the OAuth client registration separately so
//! that configuration files can be shared without secrets.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{
    DEFAULT_REFRESH_MARGIN_SECONDS, DEFAULT_TIMEOUT_SECONDS, DEFAULT_USER_AGENT,
    DEVELOPMENT_AUTHORIZE_URL, DEVELOPMENT_HOST, DEVELOPMENT_TOKEN_URL, PRODUCTION_AUTHORIZE_URL,
    PRODUCTION_HOST, PRODUCTION_TOKEN_URL,
};
use crate::errors::{DomainError, Result};

/// Deployment the SDK talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Production,
    Development,
}

impl Environment {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Development => "development",
        }
    }

    const fn host(self) -> &'static str {
        match self {
            Self::Production => PRODUCTION_HOST,
            Self::Development => DEVELOPMENT_HOST,
        }
    }

    #[must_use]
    pub const fn token_url(self) -> &'static str {
        match self {
            Self::Production => PRODUCTION_TOKEN_URL,
            Self::Development => DEVELOPMENT_TOKEN_URL,
        }
    }

    #[must_use]
    pub const fn authorize_url(self) -> &'static str {
        match self {
            Self::Production => PRODUCTION_AUTHORIZE_URL,
            Self::Development => DEVELOPMENT_AUTHORIZE_URL,
        }
    }
}

impl FromStr for Environment {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "development" | "dev" => Ok(Self::Development),
            other => Err(DomainError::Config(format!("Unknown environment: {other}"))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Basalam API service, each served from its own host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Service {
    Core,
    Chat,
    Wallet,
    Webhook,
    Order,
    OrderProcessing,
    Upload,
    Search,
}

impl Service {
    pub const ALL: [Self; 8] = [
        Self::Core,
        Self::Chat,
        Self::Wallet,
        Self::Webhook,
        Self::Order,
        Self::OrderProcessing,
        Self::Upload,
        Self::Search,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Chat => "chat",
            Self::Wallet => "wallet",
            Self::Webhook => "webhook",
            Self::Order => "order",
            Self::OrderProcessing => "order_processing",
            Self::Upload => "upload",
            Self::Search => "search",
        }
    }

    const fn subdomain(self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Chat => "conversation",
            Self::Wallet => "wallet",
            Self::Webhook => "webhook",
            Self::Order => "order",
            Self::OrderProcessing => "order-processing",
            Self::Upload => "uploadio",
            Self::Search => "search",
        }
    }

    /// Default base URL of this service in `environment`
    #[must_use]
    pub fn default_url(self, environment: Environment) -> String {
        format!("https://{}.{}", self.subdomain(), environment.host())
    }
}

impl FromStr for Service {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|service| service.as_str() == normalized)
            .ok_or_else(|| DomainError::Config(format!("Unknown service: {s}")))
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable SDK configuration
///
/// Every field has a default, so configuration files only need to name what
/// they change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasalamConfig {
    pub environment: Environment,
    pub timeout_seconds: u64,
    pub refresh_margin_seconds: u64,
    pub user_agent: String,
    /// Token endpoint override
    pub token_url: Option<String>,
    /// Consent page override
    pub authorize_url: Option<String>,
    /// Per-service base URL overrides
    pub service_urls: BTreeMap<Service, String>,
}

impl Default for BasalamConfig {
    fn default() -> Self {
        Self::new(Environment::default())
    }
}

impl BasalamConfig {
    #[must_use]
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            refresh_margin_seconds: DEFAULT_REFRESH_MARGIN_SECONDS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            token_url: None,
            authorize_url: None,
            service_urls: BTreeMap::new(),
        }
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_seconds = timeout.as_secs();
        self
    }

    #[must_use]
    pub const fn with_refresh_margin(mut self, margin: Duration) -> Self {
        self.refresh_margin_seconds = margin.as_secs();
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_authorize_url(mut self, url: impl Into<String>) -> Self {
        self.authorize_url = Some(url.into());
        self
    }

    /// Point one service at a different base URL (e.g. a local mock server).
    #[must_use]
    pub fn with_service_url(mut self, service: Service, url: impl Into<String>) -> Self {
        self.service_urls.insert(service, url.into());
        self
    }

    /// Point every service at the same base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: &str) -> Self {
        for service in Service::ALL {
            self.service_urls.insert(service, url.to_string());
        }
        self
    }

    /// Base URL of `service`, without a trailing slash
    #[must_use]
    pub fn service_url(&self, service: Service) -> String {
        self.service_urls.get(&service).map_or_else(
            || service.default_url(self.environment),
            |url| url.trim_end_matches('/').to_string(),
        )
    }

    #[must_use]
    pub fn token_url(&self) -> &str {
        self.token_url.as_deref().unwrap_or_else(|| self.environment.token_url())
    }

    #[must_use]
    pub fn authorize_url(&self) -> &str {
        self.authorize_url.as_deref().unwrap_or_else(|| self.environment.authorize_url())
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    #[must_use]
    pub const fn refresh_margin(&self) -> Duration {
        Duration::from_secs(self.refresh_margin_seconds)
    }

    /// Check that every URL parses and the timeout is usable.
    ///
    /// # Errors
    /// Returns [`DomainError::Config`] naming the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_seconds == 0 {
            return Err(DomainError::Config("timeout_seconds must be greater than zero".into()));
        }
        if self.user_agent.trim().is_empty() {
            return Err(DomainError::Config("user_agent must not be empty".into()));
        }
        validate_url("token_url", self.token_url())?;
        validate_url("authorize_url", self.authorize_url())?;
        for service in Service::ALL {
            validate_url(service.as_str(), &self.service_url(service))?;
        }
        Ok(())
    }
}

fn validate_url(name: &str, value: &str) -> Result<()> {
    let url =
        Url::parse(value).map_err(|e| DomainError::Config(format!("Invalid {name} URL: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(DomainError::Config(format!("Unsupported {name} URL scheme: {scheme}"))),
    }
}

/// OAuth client registration
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub redirect_uri: Option<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("scopes", &self.scopes)
            .finish()
    }
}

impl Credentials {
    #[must_use]
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: None,
            scopes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(uri.into());
        self
    }

    #[must_use]
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Split a space- or comma-separated scope list.
    #[must_use]
    pub fn parse_scopes(raw: &str) -> Vec<String> {
        raw.split(|c: char| c.is_whitespace() || c == ',')
            .filter(|scope| !scope.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// # Errors
    /// Returns [`DomainError::Config`] if the client id or secret is blank.
    pub fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() {
            return Err(DomainError::Config("client_id must not be empty".into()));
        }
        if self.client_secret.trim().is_empty() {
            return Err(DomainError::Config("client_secret must not be empty".into()));
        }
        Ok(())
    }
}
