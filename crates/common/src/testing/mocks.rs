//! Mock implementations of common traits
//!
//! Provides a scripted [`HttpTransport`] for testing the auth core and the
//! service clients without a network.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use url::Url;

use crate::http::{HttpRequest, HttpResponse, HttpTransport, TransportError};

type Reply = Result<HttpResponse, TransportError>;

#[derive(Default)]
struct TransportState {
    queued: HashMap<String, VecDeque<Reply>>,
    fallback: HashMap<String, Reply>,
    requests: Vec<HttpRequest>,
    delay: Duration,
}

/// Mock HTTP transport for testing
///
/// Replies are scripted per URL (query string excluded). Queued replies are
/// consumed in order; once a URL's queue is empty its fallback reply, if any,
/// is returned on every call. Every request is recorded before the optional
/// delay, so a slow reply still counts immediately.
///
/// # Examples
///
/// ```
/// use basalam_common::http::{HttpMethod, HttpRequest, HttpTransport};
/// use basalam_common::testing::MockTransport;
/// use serde_json::json;
///
/// # tokio_test::block_on(async {
/// let transport = MockTransport::new();
/// transport.push_json("https://api.example.com/v1/items", 200, json!({"id": 1}));
///
/// let url = "https://api.example.com/v1/items".parse().unwrap();
/// let response = transport.send(HttpRequest::new(HttpMethod::Get, url)).await.unwrap();
///
/// assert_eq!(response.status, 200);
/// assert_eq!(transport.request_count("https://api.example.com/v1/items"), 1);
/// # });
/// ```
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<TransportState>>,
}

impl MockTransport {
    /// Create a transport with no scripted replies
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply for a URL
    pub fn push(&self, url: &str, reply: Result<HttpResponse, TransportError>) {
        self.state.lock().queued.entry(normalize(url)).or_default().push_back(reply);
    }

    /// Queue a JSON reply for a URL
    pub fn push_json(&self, url: &str, status: u16, body: serde_json::Value) {
        self.push(url, Ok(HttpResponse::new(status, body)));
    }

    /// Queue a connection failure for a URL
    pub fn push_network_error(&self, url: &str, message: &str) {
        self.push(url, Err(TransportError::Connect(message.to_string())));
    }

    /// Reply with `status`/`body` whenever the URL's queue is empty
    pub fn respond_always(&self, url: &str, status: u16, body: serde_json::Value) {
        self.state.lock().fallback.insert(normalize(url), Ok(HttpResponse::new(status, body)));
    }

    /// Delay every reply, to widen race windows in concurrency tests
    pub fn set_delay(&self, delay: Duration) {
        self.state.lock().delay = delay;
    }

    /// All recorded requests, oldest first
    #[must_use]
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.lock().requests.clone()
    }

    /// Recorded requests for one URL
    #[must_use]
    pub fn requests_to(&self, url: &str) -> Vec<HttpRequest> {
        let url = normalize(url);
        self.state.lock().requests.iter().filter(|r| r.url.as_str() == url).cloned().collect()
    }

    /// Get the number of requests made to a URL
    #[must_use]
    pub fn request_count(&self, url: &str) -> usize {
        let url = normalize(url);
        self.state.lock().requests.iter().filter(|r| r.url.as_str() == url).count()
    }

    /// Number of requests made to any URL
    #[must_use]
    pub fn total_requests(&self) -> usize {
        self.state.lock().requests.len()
    }

    /// Verify that a request was made to the given URL
    #[must_use]
    pub fn was_called(&self, url: &str) -> bool {
        self.request_count(url) > 0
    }

    /// Get the last request made
    #[must_use]
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.state.lock().requests.last().cloned()
    }

    /// Clear all recorded requests
    pub fn clear_requests(&self) {
        self.state.lock().requests.clear();
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let key = request.url.as_str().to_string();
        let delay = {
            let mut state = self.state.lock();
            state.requests.push(request);
            state.delay
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.lock();
        if let Some(reply) = state.queued.get_mut(&key).and_then(VecDeque::pop_front) {
            return reply;
        }
        state.fallback.get(&key).cloned().unwrap_or_else(|| {
            Err(TransportError::Request(format!("no response configured for {key}")))
        })
    }
}

fn normalize(url: &str) -> String {
    Url::parse(url).map_or_else(|_| url.to_string(), |parsed| parsed.as_str().to_string())
}
