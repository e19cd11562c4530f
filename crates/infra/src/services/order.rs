//! Order service client: basket status, invoices and payments

use basalam_common::http::HttpMethod;
use basalam_domain::types::order::{
    CreatePaymentRequest, PaymentCallbackRequest, UnpaidInvoicesQuery, VerifyPaymentRequest,
};
use serde_json::Value;
use tracing::instrument;

use crate::api::service::{to_body, ServiceClient};
use crate::api::ApiResult;

/// Client for `order.basalam.com`
///
/// Invoice and payment payloads differ per payment gateway, so every call
/// returns the raw JSON body.
#[derive(Debug, Clone)]
pub struct OrderService {
    client: ServiceClient,
}

impl OrderService {
    /// Wrap a client bound to the order service.
    pub const fn new(client: ServiceClient) -> Self {
        Self { client }
    }

    /// The underlying request core, for endpoints without a typed method
    #[must_use]
    pub const fn client(&self) -> &ServiceClient {
        &self.client
    }

    /// Availability of a product's variations for the basket.
    ///
    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self))]
    pub async fn get_product_variation_status(&self, product_id: i64) -> ApiResult<Value> {
        let path = format!("/v2/basket/product/{product_id}/status");
        let request = self.client.request(HttpMethod::Get, &path)?;
        self.client.send(request).await
    }

    /// Start paying an invoice.
    ///
    /// # Errors
    /// [`ApiError::InvalidInput`](crate::api::ApiError::InvalidInput) for a
    /// blank payment method; otherwise any error of the request.
    #[instrument(skip(self, payment), fields(method = %payment.payment_method))]
    pub async fn create_payment(
        &self,
        invoice_id: i64,
        payment: &CreatePaymentRequest,
    ) -> ApiResult<Value> {
        payment.validate()?;
        let request = self
            .client
            .request(HttpMethod::Post, &format!("/v2/invoice/{invoice_id}/payment"))?
            .json(to_body(payment)?);
        self.client.send(request).await
    }

    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self))]
    pub async fn get_payable_invoices(&self, page: u32, per_page: u32) -> ApiResult<Value> {
        let request = self
            .client
            .request(HttpMethod::Get, "/v2/invoice/payable")?
            .query("page", page.to_string())
            .query("per_page", per_page.to_string());
        self.client.send(request).await
    }

    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self))]
    pub async fn get_unpaid_invoices(&self, query: &UnpaidInvoicesQuery) -> ApiResult<Value> {
        let request = self
            .client
            .request(HttpMethod::Get, "/v2/invoice/unpaid")?
            .query_pairs(query.to_query());
        self.client.send(request).await
    }

    /// Report a gateway callback for a payment.
    ///
    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self, callback), fields(status = %callback.status))]
    pub async fn payment_callback(
        &self,
        payment_id: i64,
        callback: &PaymentCallbackRequest,
    ) -> ApiResult<Value> {
        let request = self
            .client
            .request(HttpMethod::Get, &format!("/v2/payment/{payment_id}/callback"))?
            .query_pairs(callback.to_query());
        self.client.send(request).await
    }

    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self, verify))]
    pub async fn verify_payment(
        &self,
        payment_id: i64,
        verify: &VerifyPaymentRequest,
    ) -> ApiResult<Value> {
        let request = self
            .client
            .request(HttpMethod::Post, &format!("/v2/payment/{payment_id}/verify"))?
            .json(to_body(verify)?);
        self.client.send(request).await
    }

    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self))]
    pub async fn get_payment_status(&self, payment_id: i64) -> ApiResult<Value> {
        let path = format!("/v2/payment/{payment_id}/status");
        let request = self.client.request(HttpMethod::Get, &path)?;
        self.client.send(request).await
    }
}

#[cfg(test)]
mod tests {
    use basalam_common::http::RequestBody;
    use basalam_common::testing::MockTransport;
    use basalam_domain::config::Service;
    use basalam_domain::types::order::InvoiceStatus;
    use serde_json::json;

    use super::*;
    use crate::services::test_support;

    const BASE: &str = "https://order.basalam.com";

    fn service(transport: &MockTransport) -> OrderService {
        OrderService::new(test_support::client(Service::Order, transport))
    }

    #[tokio::test]
    async fn test_create_payment_body() {
        let transport = MockTransport::new();
        transport.push_json(
            &format!("{BASE}/v2/invoice/77/payment"),
            200,
            json!({"redirect_url": "https://pay.example/77"}),
        );

        let payment = CreatePaymentRequest::new("drgateway").with_description("basket");
        let body = service(&transport).create_payment(77, &payment).await.unwrap();

        assert_eq!(body["redirect_url"], json!("https://pay.example/77"));
        let sent = transport.last_request().unwrap();
        assert!(matches!(
            sent.body,
            RequestBody::Json(ref body) if body["payment_method"] == json!("drgateway")
        ));
    }

    /// Validates the invoice listing queries.
    ///
    /// Assertions:
    /// - Payable invoices send `page` and `per_page`.
    /// - Unpaid invoices send the status filter.
    #[tokio::test]
    async fn test_invoice_queries() {
        let transport = MockTransport::new();
        transport.push_json(&format!("{BASE}/v2/invoice/payable"), 200, json!({"data": []}));
        transport.push_json(&format!("{BASE}/v2/invoice/unpaid"), 200, json!({"data": []}));
        let orders = service(&transport);

        orders.get_payable_invoices(2, 30).await.unwrap();
        let sent = transport.last_request().unwrap();
        assert_eq!(sent.query, vec![("page".into(), "2".into()), ("per_page".into(), "30".into())]);

        let query = UnpaidInvoicesQuery::default().with_status(InvoiceStatus::Pending);
        orders.get_unpaid_invoices(&query).await.unwrap();
        let sent = transport.last_request().unwrap();
        assert!(sent.query.iter().any(|(k, v)| k == "status" && v == "pending"));
    }

    #[tokio::test]
    async fn test_payment_status_error() {
        let transport = MockTransport::new();
        transport.push_json(
            &format!("{BASE}/v2/payment/5/status"),
            503,
            json!({"detail": "gateway offline"}),
        );

        let err = service(&transport).get_payment_status(5).await.unwrap_err();
        assert!(err.should_retry());
        assert_eq!(err.to_string(), "HTTP 503: gateway offline");
    }
}
