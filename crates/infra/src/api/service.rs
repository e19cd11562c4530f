//! Shared request core of every service client
//!
//! A [`ServiceClient`] knows one service's base URL, attaches the default
//! headers and the `Authorization` value built from the token's type, and
//! maps non-2xx answers to [`ApiError`]. A 401 triggers one forced token
//! refresh and one retry; a second 401 is returned to the caller.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use basalam_common::http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use basalam_domain::config::{BasalamConfig, Service};
use basalam_domain::constants::DEFAULT_USER_AGENT;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use super::auth::AccessTokenProvider;
use super::errors::{ApiError, ApiResult};

/// HTTP core bound to one Basalam service
#[derive(Clone)]
pub struct ServiceClient {
    service: Service,
    base_url: String,
    transport: Arc<dyn HttpTransport>,
    auth: Arc<dyn AccessTokenProvider>,
    user_agent: String,
    timeout: Option<Duration>,
}

impl fmt::Debug for ServiceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceClient")
            .field("service", &self.service)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ServiceClient {
    /// Create a client for `service` rooted at `base_url`.
    pub fn new(
        service: Service,
        base_url: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
        auth: Arc<dyn AccessTokenProvider>,
    ) -> Self {
        Self {
            service,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            transport,
            auth,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
        }
    }

    /// Create a client using the URL, user agent and timeout of `config`.
    pub fn from_config(
        service: Service,
        config: &BasalamConfig,
        transport: Arc<dyn HttpTransport>,
        auth: Arc<dyn AccessTokenProvider>,
    ) -> Self {
        Self::new(service, config.service_url(service), transport, auth)
            .with_user_agent(config.user_agent.clone())
            .with_timeout(config.timeout())
    }

    /// Override the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Timeout applied to every request of this client.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The service this client talks to
    #[must_use]
    pub const fn service(&self) -> Service {
        self.service
    }

    /// Base URL without a trailing slash
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The token source shared by this client
    #[must_use]
    pub fn auth(&self) -> &Arc<dyn AccessTokenProvider> {
        &self.auth
    }

    /// Start a request for `path` (which begins with `/`) with the default
    /// headers set.
    ///
    /// # Errors
    /// Returns [`ApiError::Config`] if the base URL and path do not form a
    /// valid URL.
    pub fn request(&self, method: HttpMethod, path: &str) -> ApiResult<HttpRequest> {
        let raw = format!("{}{path}", self.base_url);
        let url = Url::parse(&raw)
            .map_err(|e| ApiError::Config(format!("invalid request URL {raw}: {e}")))?;

        let mut request = HttpRequest::new(method, url)
            .header("User-Agent", self.user_agent.clone())
            .header("Accept", "application/json");
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }
        Ok(request)
    }

    /// Send `request` and return the JSON body of a 2xx answer.
    ///
    /// # Errors
    /// - [`ApiError::Auth`] if no token can be obtained
    /// - [`ApiError::Http`] for a non-2xx answer (after the 401 retry)
    /// - [`ApiError::Network`], [`ApiError::Timeout`] or [`ApiError::Decode`]
    ///   for transport failures
    #[instrument(
        skip(self, request),
        fields(service = self.service.as_str(), method = %request.method, url = %request.url)
    )]
    pub async fn send(&self, request: HttpRequest) -> ApiResult<Value> {
        let authorization = self.auth.authorization_header().await?;
        let response = self.dispatch(request.clone(), authorization).await?;

        if response.status == 401 && self.auth.can_refresh() {
            warn!("token rejected, refreshing and retrying once");
            let authorization = self.auth.refreshed_authorization_header().await?;
            let retried = self.dispatch(request, authorization).await?;
            return Self::into_body(retried);
        }

        Self::into_body(response)
    }

    /// Send `request` and decode the 2xx body into `T`.
    ///
    /// # Errors
    /// See [`send`](Self::send); additionally [`ApiError::Decode`] if the body
    /// does not match `T`.
    pub async fn execute<T: DeserializeOwned>(&self, request: HttpRequest) -> ApiResult<T> {
        let body = self.send(request).await?;
        decode(body)
    }

    async fn dispatch(
        &self,
        request: HttpRequest,
        authorization: String,
    ) -> ApiResult<HttpResponse> {
        let request = request.header("Authorization", authorization);
        let response = self.transport.send(request).await?;
        debug!(status = response.status, "service responded");
        Ok(response)
    }

    fn into_body(response: HttpResponse) -> ApiResult<Value> {
        if response.is_success() {
            Ok(response.body)
        } else {
            Err(ApiError::from_response(response.status, &response.body))
        }
    }
}

/// Serialize a request model into a JSON body.
///
/// # Errors
/// Returns [`ApiError::InvalidInput`] if `value` cannot be represented as JSON.
pub fn to_body<T: Serialize>(value: &T) -> ApiResult<Value> {
    serde_json::to_value(value).map_err(|e| ApiError::InvalidInput(e.to_string()))
}

/// Decode a response body into a model.
///
/// # Errors
/// Returns [`ApiError::Decode`] if the body does not match `T`.
pub fn decode<T: DeserializeOwned>(body: Value) -> ApiResult<T> {
    serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))
}
