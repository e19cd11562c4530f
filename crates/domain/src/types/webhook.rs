//! Webhook service models

use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::{DomainError, Result};

/// A client service that owns webhooks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookServiceInfo {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Body of `POST /v1/webhooks/services`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateServiceRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CreateServiceRequest {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), description: None }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// # Errors
    /// Returns [`DomainError::InvalidInput`] for a blank name.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::invalid("name", "must not be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Webhook {
    pub id: i64,
    #[serde(default)]
    pub service_id: Option<i64>,
    pub url: String,
    #[serde(default)]
    pub event_ids: Vec<serde_json::Value>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub request_method: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Body of `POST /v1/webhooks`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateWebhookRequest {
    pub service_id: i64,
    pub url: String,
    pub event_ids: Vec<i64>,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_headers: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_method: Option<String>,
}

impl CreateWebhookRequest {
    #[must_use]
    pub fn new(service_id: i64, url: impl Into<String>, event_ids: Vec<i64>) -> Self {
        Self {
            service_id,
            url: url.into(),
            event_ids,
            is_active: true,
            request_headers: None,
            request_method: None,
        }
    }

    #[must_use]
    pub const fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    #[must_use]
    pub fn with_request_method(mut self, method: impl Into<String>) -> Self {
        self.request_method = Some(method.into());
        self
    }

    #[must_use]
    pub fn with_request_headers(mut self, headers: impl Into<String>) -> Self {
        self.request_headers = Some(headers.into());
        self
    }

    /// # Errors
    /// Returns [`DomainError::InvalidInput`] for an unusable URL or an empty
    /// event list.
    pub fn validate(&self) -> Result<()> {
        validate_callback_url(&self.url)?;
        if self.event_ids.is_empty() {
            return Err(DomainError::invalid("event_ids", "at least one event is required"));
        }
        Ok(())
    }
}

/// Body of `PATCH /v1/webhooks/{webhook_id}`; only set fields are sent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateWebhookRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_ids: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_headers: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl UpdateWebhookRequest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_event_ids(mut self, event_ids: Vec<i64>) -> Self {
        self.event_ids = Some(event_ids);
        self
    }

    #[must_use]
    pub const fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    /// # Errors
    /// Returns [`DomainError::InvalidInput`] for an empty update or an
    /// unusable URL.
    pub fn validate(&self) -> Result<()> {
        if *self == Self::default() {
            return Err(DomainError::invalid("webhook update", "at least one field is required"));
        }
        if let Some(url) = &self.url {
            validate_callback_url(url)?;
        }
        Ok(())
    }
}

fn validate_callback_url(raw: &str) -> Result<()> {
    let url = Url::parse(raw).map_err(|e| DomainError::invalid("url", &e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        _ => Err(DomainError::invalid("url", "must be http or https")),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedWebhook {
    pub id: i64,
    #[serde(default)]
    pub deleted_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub id: serde_json::Value,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub service_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookLog {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub status_code: u16,
    #[serde(default)]
    pub request: Option<serde_json::Value>,
    #[serde(default)]
    pub response: Option<serde_json::Value>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Paged list envelope shared by the webhook endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookPage<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub result_count: Option<u64>,
    #[serde(default)]
    pub total_count: Option<u64>,
    #[serde(default)]
    pub total_page: Option<u32>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

/// Query of `GET /v1/webhooks/{webhook_id}/logs`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LogsQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl LogsQuery {
    #[must_use]
    pub const fn page(page: u32, per_page: u32) -> Self {
        Self { page: Some(page), per_page: Some(per_page) }
    }

    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        super::push_opt(&mut query, "page", self.page.as_ref());
        super::push_opt(&mut query, "per_page", self.per_page.as_ref());
        query
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_create_webhook_validation() {
        let request = CreateWebhookRequest::new(1, "https://example.com/hook", vec![10, 11]);
        assert!(request.is_active);
        assert!(request.validate().is_ok());

        assert!(CreateWebhookRequest::new(1, "not a url", vec![10]).validate().is_err());
        assert!(CreateWebhookRequest::new(1, "ftp://example.com", vec![10]).validate().is_err());
        assert!(matches!(
            CreateWebhookRequest::new(1, "https://example.com", Vec::new()).validate(),
            Err(DomainError::InvalidInput(msg)) if msg.starts_with("event_ids")
        ));
    }

    #[test]
    fn test_update_webhook_partial_body() {
        let request = UpdateWebhookRequest::new().active(false);
        assert_eq!(serde_json::to_value(&request).unwrap(), json!({"is_active": false}));
        assert!(request.validate().is_ok());
        assert!(UpdateWebhookRequest::new().validate().is_err());
        assert!(UpdateWebhookRequest::new().with_url("nope").validate().is_err());
    }

    #[test]
    fn test_page_envelope_defaults() {
        let page: WebhookPage<WebhookLog> = serde_json::from_value(json!({
            "data": [{"id": 1, "status_code": 200, "request": {"event": "order.created"}}],
            "total_count": 1
        }))
        .unwrap();
        assert_eq!(page.data[0].status_code, 200);
        assert_eq!(page.total_count, Some(1));
        assert!(page.page.is_none());

        let empty: WebhookPage<WebhookServiceInfo> = serde_json::from_value(json!({})).unwrap();
        assert!(empty.data.is_empty());
    }

    #[test]
    fn test_logs_query() {
        assert!(LogsQuery::default().to_query().is_empty());
        assert_eq!(LogsQuery::page(2, 25).to_query().len(), 2);
    }
}
