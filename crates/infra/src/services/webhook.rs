//! Webhook service client: services, subscriptions, events and delivery logs

use basalam_common::http::HttpMethod;
use basalam_domain::types::webhook::{
    CreateServiceRequest, CreateWebhookRequest, DeletedWebhook, LogsQuery, UpdateWebhookRequest,
    Webhook, WebhookEvent, WebhookLog, WebhookPage, WebhookServiceInfo,
};
use tracing::instrument;

use crate::api::service::{to_body, ServiceClient};
use crate::api::ApiResult;

/// Client for `webhook.basalam.com`
#[derive(Debug, Clone)]
pub struct WebhookService {
    client: ServiceClient,
}

impl WebhookService {
    /// Wrap a client bound to the webhook service.
    pub const fn new(client: ServiceClient) -> Self {
        Self { client }
    }

    /// The underlying request core, for endpoints without a typed method
    #[must_use]
    pub const fn client(&self) -> &ServiceClient {
        &self.client
    }

    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self))]
    pub async fn get_services(&self) -> ApiResult<WebhookPage<WebhookServiceInfo>> {
        let request = self.client.request(HttpMethod::Get, "/v1/webhooks/services")?;
        self.client.execute(request).await
    }

    /// # Errors
    /// [`ApiError::InvalidInput`](crate::api::ApiError::InvalidInput) for a
    /// blank name; otherwise any error of the request.
    #[instrument(skip(self, service), fields(name = %service.name))]
    pub async fn create_service(
        &self,
        service: &CreateServiceRequest,
    ) -> ApiResult<WebhookServiceInfo> {
        service.validate()?;
        let request = self
            .client
            .request(HttpMethod::Post, "/v1/webhooks/services")?
            .json(to_body(service)?);
        self.client.execute(request).await
    }

    /// Webhooks registered by the current client.
    ///
    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self))]
    pub async fn get_webhooks(&self, service_id: Option<i64>) -> ApiResult<WebhookPage<Webhook>> {
        let mut request = self.client.request(HttpMethod::Get, "/v1/webhooks")?;
        if let Some(service_id) = service_id {
            request = request.query("service_id", service_id.to_string());
        }
        self.client.execute(request).await
    }

    /// # Errors
    /// [`ApiError::InvalidInput`](crate::api::ApiError::InvalidInput) for a
    /// non-http(s) URL or no events; otherwise any error of the request.
    #[instrument(skip(self, webhook), fields(service_id = webhook.service_id))]
    pub async fn create_webhook(&self, webhook: &CreateWebhookRequest) -> ApiResult<Webhook> {
        webhook.validate()?;
        let request =
            self.client.request(HttpMethod::Post, "/v1/webhooks")?.json(to_body(webhook)?);
        self.client.execute(request).await
    }

    /// # Errors
    /// [`ApiError::InvalidInput`](crate::api::ApiError::InvalidInput) for an
    /// empty update; otherwise any error of the request.
    #[instrument(skip(self, update))]
    pub async fn update_webhook(
        &self,
        webhook_id: i64,
        update: &UpdateWebhookRequest,
    ) -> ApiResult<Webhook> {
        update.validate()?;
        let request = self
            .client
            .request(HttpMethod::Patch, &format!("/v1/webhooks/{webhook_id}"))?
            .json(to_body(update)?);
        self.client.execute(request).await
    }

    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self))]
    pub async fn delete_webhook(&self, webhook_id: i64) -> ApiResult<DeletedWebhook> {
        let path = format!("/v1/webhooks/{webhook_id}");
        let request = self.client.request(HttpMethod::Delete, &path)?;
        self.client.execute(request).await
    }

    /// Events a webhook can subscribe to.
    ///
    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self))]
    pub async fn get_events(&self) -> ApiResult<WebhookPage<WebhookEvent>> {
        let request = self.client.request(HttpMethod::Get, "/v1/webhooks/events")?;
        self.client.execute(request).await
    }

    /// Delivery attempts of a webhook.
    ///
    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self))]
    pub async fn get_webhook_logs(
        &self,
        webhook_id: i64,
        page: LogsQuery,
    ) -> ApiResult<WebhookPage<WebhookLog>> {
        let request = self
            .client
            .request(HttpMethod::Get, &format!("/v1/webhooks/{webhook_id}/logs"))?
            .query_pairs(page.to_query());
        self.client.execute(request).await
    }
}

#[cfg(test)]
mod tests {
    use basalam_common::testing::MockTransport;
    use basalam_domain::config::Service;
    use serde_json::json;

    use super::*;
    use crate::api::ApiError;
    use crate::services::test_support;

    const BASE: &str = "https://webhook.basalam.com";

    fn service(transport: &MockTransport) -> WebhookService {
        WebhookService::new(test_support::client(Service::Webhook, transport))
    }

    /// Validates the webhook registration lifecycle.
    ///
    /// # Test Steps
    /// 1. Create a webhook and decode it.
    /// 2. Deactivate it with a PATCH.
    /// 3. Delete it and read the deletion receipt.
    #[tokio::test]
    async fn test_webhook_lifecycle() {
        let transport = MockTransport::new();
        let hook = json!({"id": 31, "url": "https://shop.example/hook", "is_active": true});
        transport.push_json(&format!("{BASE}/v1/webhooks"), 201, hook);
        transport.push_json(
            &format!("{BASE}/v1/webhooks/31"),
            200,
            json!({"id": 31, "url": "https://shop.example/hook", "is_active": false}),
        );
        transport.push_json(&format!("{BASE}/v1/webhooks/31"), 200, json!({"id": 31}));
        let webhooks = service(&transport);

        let create = CreateWebhookRequest::new(2, "https://shop.example/hook", vec![5]);
        assert!(webhooks.create_webhook(&create).await.unwrap().is_active);

        let update = UpdateWebhookRequest::new().active(false);
        assert!(!webhooks.update_webhook(31, &update).await.unwrap().is_active);

        assert_eq!(webhooks.delete_webhook(31).await.unwrap().id, 31);
        let methods: Vec<_> = transport.requests().iter().map(|r| r.method).collect();
        assert_eq!(methods, vec![HttpMethod::Post, HttpMethod::Patch, HttpMethod::Delete]);
    }

    #[tokio::test]
    async fn test_invalid_webhook_rejected_locally() {
        let transport = MockTransport::new();
        let create = CreateWebhookRequest::new(2, "ftp://shop.example/hook", vec![5]);

        let webhooks = service(&transport);
        assert!(matches!(webhooks.create_webhook(&create).await, Err(ApiError::InvalidInput(_))));
        assert_eq!(transport.total_requests(), 0);
    }

    #[tokio::test]
    async fn test_logs_page_query() {
        let transport = MockTransport::new();
        transport.push_json(
            &format!("{BASE}/v1/webhooks/31/logs"),
            200,
            json!({"data": [{"id": 1, "status_code": 500}], "total_count": 1}),
        );

        let page = service(&transport).get_webhook_logs(31, LogsQuery::page(2, 10)).await.unwrap();

        assert_eq!(page.data[0].status_code, 500);
        let sent = transport.last_request().unwrap();
        assert_eq!(sent.query, vec![("page".into(), "2".into()), ("per_page".into(), "10".into())]);
    }
}
