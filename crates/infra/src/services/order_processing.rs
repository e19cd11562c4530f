//! Order-processing service client: customer orders, items and vendor parcels

use basalam_common::http::HttpMethod;
use basalam_domain::types::order_processing::{
    CustomerOrder, ItemFilter, ItemsPage, OrderFilter, OrderStatsQuery, OrdersPage, Parcel,
    ParcelFilter, ParcelItem, ParcelsPage,
};
use serde_json::Value;
use tracing::instrument;

use crate::api::service::ServiceClient;
use crate::api::ApiResult;

/// Client for `order-processing.basalam.com`
#[derive(Debug, Clone)]
pub struct OrderProcessingService {
    client: ServiceClient,
}

impl OrderProcessingService {
    /// Wrap a client bound to the order-processing service.
    pub const fn new(client: ServiceClient) -> Self {
        Self { client }
    }

    /// The underlying request core, for endpoints without a typed method
    #[must_use]
    pub const fn client(&self) -> &ServiceClient {
        &self.client
    }

    /// Orders of the current customer, newest payment first by default.
    ///
    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self, filter))]
    pub async fn get_customer_orders(&self, filter: &OrderFilter) -> ApiResult<OrdersPage> {
        let request = self
            .client
            .request(HttpMethod::Get, "/v3/customer-orders")?
            .query_pairs(filter.to_query());
        self.client.execute(request).await
    }

    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self))]
    pub async fn get_customer_order(&self, order_id: i64) -> ApiResult<CustomerOrder> {
        let path = format!("/v3/customer-orders/{order_id}");
        let request = self.client.request(HttpMethod::Get, &path)?;
        self.client.execute(request).await
    }

    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self, filter))]
    pub async fn get_customer_items(&self, filter: &ItemFilter) -> ApiResult<ItemsPage> {
        let request = self
            .client
            .request(HttpMethod::Get, "/customer-items")?
            .query_pairs(filter.to_query());
        self.client.execute(request).await
    }

    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self))]
    pub async fn get_customer_item(&self, item_id: i64) -> ApiResult<ParcelItem> {
        let path = format!("/customer-items/{item_id}");
        let request = self.client.request(HttpMethod::Get, &path)?;
        self.client.execute(request).await
    }

    /// Parcels the current vendor has to prepare or has sent.
    ///
    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self, filter))]
    pub async fn get_vendor_parcels(&self, filter: &ParcelFilter) -> ApiResult<ParcelsPage> {
        let request = self
            .client
            .request(HttpMethod::Get, "/vendor-parcels")?
            .query_pairs(filter.to_query());
        self.client.execute(request).await
    }

    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self))]
    pub async fn get_vendor_parcel(&self, parcel_id: i64) -> ApiResult<Parcel> {
        let path = format!("/vendor-parcels/{parcel_id}");
        let request = self.client.request(HttpMethod::Get, &path)?;
        self.client.execute(request).await
    }

    /// Aggregated order counters; `cache_control` is forwarded as the
    /// `Cache-Control` header.
    ///
    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self, query), fields(resource = query.resource_count.as_str()))]
    pub async fn get_order_stats(&self, query: &OrderStatsQuery) -> ApiResult<Value> {
        let mut request = self
            .client
            .request(HttpMethod::Get, "/orders-calculate-stats")?
            .query_pairs(query.to_query());
        if let Some(cache_control) = &query.cache_control {
            request = request.header("Cache-Control", cache_control.clone());
        }
        self.client.send(request).await
    }
}

#[cfg(test)]
mod tests {
    use basalam_common::testing::MockTransport;
    use basalam_domain::config::Service;
    use basalam_domain::types::order_processing::{ParcelStatus, ResourceStats};
    use serde_json::json;

    use super::*;
    use crate::services::test_support;

    const BASE: &str = "https://order-processing.basalam.com";

    fn service(transport: &MockTransport) -> OrderProcessingService {
        OrderProcessingService::new(test_support::client(Service::OrderProcessing, transport))
    }

    /// Validates the vendor dashboard parcel listing.
    ///
    /// Assertions:
    /// - Status filters are sent as comma-joined codes.
    /// - Parcel statuses decode into their typed form.
    /// - The next cursor is exposed.
    #[tokio::test]
    async fn test_vendor_parcels() {
        let transport = MockTransport::new();
        transport.push_json(
            &format!("{BASE}/vendor-parcels"),
            200,
            json!({
                "data": [{"id": 1, "status": 3739}, {"id": 2, "status": 1}],
                "meta": {"next_cursor": "c2"}
            }),
        );

        let filter = ParcelFilter::default()
            .with_statuses(vec![ParcelStatus::NewOrder, ParcelStatus::Posted]);
        let page = service(&transport).get_vendor_parcels(&filter).await.unwrap();

        assert_eq!(page.data[0].parcel_status(), Some(ParcelStatus::NewOrder));
        assert_eq!(page.data[1].parcel_status(), None);
        assert_eq!(page.meta.next_cursor.as_deref(), Some("c2"));
        let sent = transport.last_request().unwrap();
        assert!(sent.query.contains(&("statuses".to_string(), "3739,3238".to_string())));
    }

    #[tokio::test]
    async fn test_customer_orders_default_sort() {
        let transport = MockTransport::new();
        transport.push_json(&format!("{BASE}/v3/customer-orders"), 200, json!({"data": []}));

        let page = service(&transport).get_customer_orders(&OrderFilter::default()).await.unwrap();

        assert!(page.data.is_empty());
        let sent = transport.last_request().unwrap();
        assert!(sent.query.contains(&("sort".to_string(), "paid_at:desc".to_string())));
    }

    #[tokio::test]
    async fn test_order_stats_cache_control() {
        let transport = MockTransport::new();
        transport.push_json(&format!("{BASE}/orders-calculate-stats"), 200, json!({"count": 4}));

        let query = OrderStatsQuery::new(ResourceStats::OrdersPerVendor)
            .for_vendor(12)
            .with_cache_control("no-cache");
        let stats = service(&transport).get_order_stats(&query).await.unwrap();

        assert_eq!(stats["count"], json!(4));
        let sent = transport.last_request().unwrap();
        assert_eq!(sent.header_value("cache-control"), Some("no-cache"));
        assert!(sent.query.contains(&("vendor_id".to_string(), "12".to_string())));
    }
}
