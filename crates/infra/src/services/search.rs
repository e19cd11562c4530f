//! Search service client

use basalam_common::http::HttpMethod;
use basalam_domain::types::search::ProductSearchRequest;
use serde_json::Value;
use tracing::instrument;

use crate::api::service::{to_body, ServiceClient};
use crate::api::ApiResult;

/// Client for `search.basalam.com`
#[derive(Debug, Clone)]
pub struct SearchService {
    client: ServiceClient,
}

impl SearchService {
    /// Wrap a client bound to the search service.
    pub const fn new(client: ServiceClient) -> Self {
        Self { client }
    }

    /// The underlying request core, for endpoints without a typed method
    #[must_use]
    pub const fn client(&self) -> &ServiceClient {
        &self.client
    }

    /// Full-text product search with optional filters.
    ///
    /// # Errors
    /// [`ApiError::InvalidInput`](crate::api::ApiError::InvalidInput) for an
    /// empty page or an inverted price range; otherwise any error of the
    /// request.
    #[instrument(skip(self, search), fields(q = ?search.q, rows = search.rows))]
    pub async fn search_products(&self, search: &ProductSearchRequest) -> ApiResult<Value> {
        search.validate()?;
        let request = self
            .client
            .request(HttpMethod::Post, "/v1/products/search")?
            .json(to_body(search)?);
        self.client.send(request).await
    }
}
