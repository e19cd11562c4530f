use std::time::Duration;

use async_trait::async_trait;
use basalam_common::http::{
    FilePart, HttpMethod, HttpRequest, HttpResponse, HttpTransport, RequestBody, TransportError,
};
use basalam_domain::BasalamConfig;
use reqwest::header::HeaderMap;
use reqwest::multipart::{Form, Part};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder};
use serde_json::Value;
use tracing::debug;

/// reqwest-backed [`HttpTransport`] with timeout and retry support.
///
/// Only idempotent requests (`GET`, `PUT`, `DELETE`) are retried; token
/// exchanges and other `POST`/`PATCH` calls are sent exactly once.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: ReqwestClient,
    max_attempts: usize,
    base_backoff: Duration,
}

impl ReqwestTransport {
    /// Start building a new transport.
    pub fn builder() -> ReqwestTransportBuilder {
        ReqwestTransportBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, TransportError> {
        Self::builder().build()
    }

    /// Transport using the timeout and user agent of `config`.
    pub fn from_config(config: &BasalamConfig) -> Result<Self, TransportError> {
        Self::builder().timeout(config.timeout()).user_agent(config.user_agent.clone()).build()
    }

    fn request_builder(&self, request: &HttpRequest) -> Result<RequestBuilder, TransportError> {
        let mut builder = self.client.request(to_method(request.method), request.url.clone());

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Form(fields) => builder.form(fields),
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart { fields, files } => {
                builder.multipart(multipart_form(fields, files)?)
            }
        })
    }

    fn backoff_delay(&self, retry_number: usize) -> Duration {
        let shift = retry_number.saturating_sub(1).min(8) as u32;
        let multiplier = 1u32 << shift;
        self.base_backoff.saturating_mul(multiplier)
    }

    async fn sleep_with_backoff(&self, retry_number: usize) {
        let delay = self.backoff_delay(retry_number);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let attempts = if is_idempotent(request.method) { self.max_attempts.max(1) } else { 1 };
        let method = request.method;
        let url = request.url.clone();

        for attempt in 0..attempts {
            // Multipart bodies are consumed on send, so each attempt rebuilds.
            let builder = self.request_builder(&request)?;
            debug!(attempt = attempt + 1, %method, %url, "sending HTTP request");

            match builder.send().await {
                Ok(response) => {
                    let status = response.status();
                    debug!(attempt = attempt + 1, %method, %url, %status, "received HTTP response");

                    if status.is_server_error() && attempt + 1 < attempts {
                        self.sleep_with_backoff(attempt + 1).await;
                        continue;
                    }

                    let status = status.as_u16();
                    let bytes = response.bytes().await.map_err(map_reqwest_error)?;
                    return Ok(HttpResponse::new(status, decode_body(&bytes)));
                }
                Err(err) => {
                    debug!(
                        attempt = attempt + 1, %method, %url, error = %err,
                        "HTTP request failed"
                    );

                    if attempt + 1 < attempts && should_retry_error(&err) {
                        self.sleep_with_backoff(attempt + 1).await;
                        continue;
                    }

                    return Err(map_reqwest_error(err));
                }
            }
        }

        Err(TransportError::Request(
            "transport exhausted retries without producing a result".into(),
        ))
    }
}

/// Builder for [`ReqwestTransport`].
#[derive(Debug)]
pub struct ReqwestTransportBuilder {
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
    user_agent: Option<String>,
    default_headers: Option<HeaderMap>,
}

impl Default for ReqwestTransportBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(basalam_domain::constants::DEFAULT_TIMEOUT_SECONDS),
            max_attempts: 3,
            base_backoff: Duration::from_millis(200),
            user_agent: None,
            default_headers: None,
        }
    }
}

impl ReqwestTransportBuilder {
    /// Whole-request timeout used when a request sets none.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configure the total number of attempts for idempotent requests
    /// (initial try + retries).
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// First retry delay; doubles on each further attempt.
    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    /// Fallback `User-Agent` for requests without one.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Headers sent with every request.
    pub fn default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    /// # Errors
    /// Returns [`TransportError::Request`] if the reqwest client cannot be built.
    pub fn build(self) -> Result<ReqwestTransport, TransportError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder
            .build()
            .map_err(|err| TransportError::Request(format!("failed to build HTTP client: {err}")))?;

        Ok(ReqwestTransport {
            client,
            max_attempts: self.max_attempts.max(1),
            base_backoff: self.base_backoff,
        })
    }
}

const fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

const fn is_idempotent(method: HttpMethod) -> bool {
    matches!(method, HttpMethod::Get | HttpMethod::Put | HttpMethod::Delete)
}

fn multipart_form(fields: &[(String, String)], files: &[FilePart]) -> Result<Form, TransportError> {
    let mut form = Form::new();
    for (name, value) in fields {
        form = form.text(name.clone(), value.clone());
    }
    for file in files {
        let mut part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
        if let Some(content_type) = &file.content_type {
            part = part
                .mime_str(content_type)
                .map_err(|e| TransportError::Request(format!("invalid content type: {e}")))?;
        }
        form = form.part(file.field.clone(), part);
    }
    Ok(form)
}

/// Empty bodies decode to `Null`, non-JSON bodies to a string.
fn decode_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

fn should_retry_error(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect()
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(err.to_string())
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else if err.is_decode() || err.is_body() {
        TransportError::Decode(err.to_string())
    } else {
        TransportError::Request(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use serde_json::json;
    use url::Url;
    use wiremock::matchers::{body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn transport() -> ReqwestTransport {
        ReqwestTransport::builder()
            .base_backoff(Duration::from_millis(10))
            .max_attempts(3)
            .build()
            .expect("transport")
    }

    fn url(server: &MockServer, path: &str) -> Url {
        Url::parse(&format!("{}{path}", server.uri())).expect("url")
    }

    #[tokio::test]
    async fn decodes_json_response_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v3/users/me"))
            .and(query_param("page", "2"))
            .and(header("authorization", "Bearer t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7})))
            .expect(1)
            .mount(&server)
            .await;

        let request = HttpRequest::new(HttpMethod::Get, url(&server, "/v3/users/me"))
            .query("page", "2")
            .header("Authorization", "Bearer t1");
        let response = transport().send(request).await.expect("response");

        assert_eq!(response.status, 200);
        assert_eq!(response.body, json!({"id": 7}));
    }

    #[tokio::test]
    async fn empty_and_text_bodies_are_preserved() {
        let server = MockServer::start().await;
        Mock::given(path("/empty"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;
        Mock::given(path("/text"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let transport = ReqwestTransport::builder().max_attempts(1).build().expect("transport");
        let empty = transport
            .send(HttpRequest::new(HttpMethod::Delete, url(&server, "/empty")))
            .await
            .expect("response");
        assert_eq!(empty.body, Value::Null);

        let text = transport
            .send(HttpRequest::new(HttpMethod::Get, url(&server, "/text")))
            .await
            .expect("response");
        assert_eq!(text.status, 502);
        assert_eq!(text.body, json!("Bad Gateway"));
    }

    #[tokio::test]
    async fn retries_idempotent_server_errors_until_success() {
        let server = MockServer::start().await;
        let attempts = Arc::new(AtomicUsize::new(0));
        let attempts_clone = attempts.clone();
        Mock::given(method("GET"))
            .respond_with(move |_req: &wiremock::Request| -> ResponseTemplate {
                let current = attempts_clone.fetch_add(1, Ordering::SeqCst);
                if current < 2 {
                    ResponseTemplate::new(500)
                } else {
                    ResponseTemplate::new(200).set_body_json(json!({"ok": true}))
                }
            })
            .expect(3)
            .mount(&server)
            .await;

        let response = transport()
            .send(HttpRequest::new(HttpMethod::Get, url(&server, "/")))
            .await
            .expect("response");

        assert_eq!(response.status, 200);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn does_not_retry_post_requests() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .and(body_string_contains("grant_type=client_credentials"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let request = HttpRequest::new(HttpMethod::Post, url(&server, "/oauth/token"))
            .form(vec![("grant_type".into(), "client_credentials".into())]);
        let response = transport().send(request).await.expect("response");

        assert_eq!(response.status, 503);
    }

    #[tokio::test]
    async fn sends_multipart_fields_and_files() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v3/files"))
            .and(body_string_contains("product.photo"))
            .and(body_string_contains("filename=\"a.png\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
            .expect(1)
            .mount(&server)
            .await;

        let file = FilePart {
            field: "file".into(),
            file_name: "a.png".into(),
            content_type: Some("image/png".into()),
            bytes: vec![1, 2, 3],
        };
        let request = HttpRequest::new(HttpMethod::Post, url(&server, "/v3/files"))
            .multipart(vec![("file_type".into(), "product.photo".into())], vec![file]);

        assert_eq!(transport().send(request).await.expect("response").status, 200);
    }

    #[tokio::test]
    async fn per_request_timeout_maps_to_timeout_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let transport = ReqwestTransport::builder().max_attempts(1).build().expect("transport");
        let request = HttpRequest::new(HttpMethod::Get, url(&server, "/slow"))
            .timeout(Duration::from_millis(50));

        assert!(matches!(transport.send(request).await, Err(TransportError::Timeout(_))));
    }

    #[tokio::test]
    async fn connection_refused_maps_to_connect_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener); // release the port so that requests fail with ECONNREFUSED
        let target = Url::parse(&format!("http://{addr}/")).unwrap();

        let transport = ReqwestTransport::builder()
            .base_backoff(Duration::from_millis(5))
            .max_attempts(2)
            .build()
            .expect("transport");

        let result = transport.send(HttpRequest::new(HttpMethod::Get, target)).await;
        assert!(matches!(result, Err(TransportError::Connect(_))), "got {result:?}");
    }

    #[test]
    fn decode_body_handles_whitespace_and_text() {
        assert_eq!(decode_body(b""), Value::Null);
        assert_eq!(decode_body(b"  \n"), Value::Null);
        assert_eq!(decode_body(b"{\"a\":1}"), json!({"a": 1}));
        assert_eq!(decode_body(b"<html>"), json!("<html>"));
    }
}
