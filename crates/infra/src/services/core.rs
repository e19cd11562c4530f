//! Core service client: users, vendors, shipping, bank accounts and catalog

use basalam_common::http::HttpMethod;
use basalam_domain::constants::PREFER_HEADER;
use basalam_domain::types::core::{
    Acknowledgement, AttributeQuery, BankAccount, BankAccountUpdate, BulkActionRequest,
    BulkUpdateJob, Category, CategoryList, City, CreateVendorRequest, MobileChange,
    NewBankAccount, OtpCode, PrivateProductQuery, ProductBulkUpdate, Representation,
    ShippingMethod, ShippingMethodQuery, ShippingMethodUpdate, UpdateVendorRequest, User,
    UserVerification, VariationUpdate, Vendor, VendorProductQuery, VendorStatusUpdate,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use crate::api::service::{to_body, ServiceClient};
use crate::api::ApiResult;

/// Client for `core.basalam.com`
#[derive(Debug, Clone)]
pub struct CoreService {
    client: ServiceClient,
}

impl CoreService {
    /// Wrap a client bound to the core service.
    pub const fn new(client: ServiceClient) -> Self {
        Self { client }
    }

    /// The underlying request core, for endpoints without a typed method
    #[must_use]
    pub const fn client(&self) -> &ServiceClient {
        &self.client
    }

    /// The user the current token belongs to.
    ///
    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self))]
    pub async fn get_current_user(&self) -> ApiResult<User> {
        let request = self.client.request(HttpMethod::Get, "/v3/users/me")?;
        self.client.execute(request).await
    }

    /// Fetch a vendor; [`Representation::Full`] asks for the private
    /// representation, available to the vendor's owner.
    ///
    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self))]
    pub async fn get_vendor(
        &self,
        vendor_id: i64,
        representation: Representation,
    ) -> ApiResult<Vendor> {
        let request = self
            .client
            .request(HttpMethod::Get, &format!("/v3/vendors/{vendor_id}"))?
            .header(PREFER_HEADER, representation.prefer_header());
        self.client.execute(request).await
    }

    /// # Errors
    /// [`ApiError::InvalidInput`](crate::api::ApiError::InvalidInput) if the
    /// request does not validate; otherwise any error of the request.
    #[instrument(skip(self, vendor), fields(identifier = %vendor.identifier))]
    pub async fn create_vendor(
        &self,
        user_id: i64,
        vendor: &CreateVendorRequest,
    ) -> ApiResult<Vendor> {
        vendor.validate()?;
        let request = self
            .client
            .request(HttpMethod::Post, &format!("/v3/users/{user_id}/vendors"))?
            .json(to_body(vendor)?);
        self.client.execute(request).await
    }

    /// # Errors
    /// [`ApiError::InvalidInput`](crate::api::ApiError::InvalidInput) for an
    /// empty update; otherwise any error of the request.
    #[instrument(skip(self, update))]
    pub async fn update_vendor(
        &self,
        vendor_id: i64,
        update: &UpdateVendorRequest,
    ) -> ApiResult<Vendor> {
        update.validate()?;
        let request = self
            .client
            .request(HttpMethod::Patch, &format!("/v3/vendors/{vendor_id}"))?
            .json(to_body(update)?);
        self.client.execute(request).await
    }

    /// The category tree.
    ///
    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self))]
    pub async fn get_categories(&self) -> ApiResult<CategoryList> {
        let request = self.client.request(HttpMethod::Get, "/v3/categories")?;
        self.client.execute(request).await
    }

    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self))]
    pub async fn get_category(&self, category_id: i64) -> ApiResult<Category> {
        let path = format!("/v3/categories/{category_id}");
        let request = self.client.request(HttpMethod::Get, &path)?;
        self.client.execute(request).await
    }

    // ------------------------------------------------------------------
    // Shipping methods
    // ------------------------------------------------------------------

    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self))]
    pub async fn get_default_shipping_methods(&self) -> ApiResult<Vec<ShippingMethod>> {
        let request = self.client.request(HttpMethod::Get, "/v3/shipping-methods/defaults")?;
        self.client.execute(request).await
    }

    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self))]
    pub async fn get_shipping_methods(&self, query: &ShippingMethodQuery) -> ApiResult<Value> {
        let request = self
            .client
            .request(HttpMethod::Get, "/v3/shipping-methods")?
            .query_pairs(query.to_query());
        self.client.send(request).await
    }

    /// Shipping methods the vendor currently works with.
    ///
    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self))]
    pub async fn get_vendor_shipping_methods(
        &self,
        vendor_id: i64,
    ) -> ApiResult<Vec<ShippingMethod>> {
        let path = format!("/v3/vendors/{vendor_id}/shipping-methods");
        let request = self.client.request(HttpMethod::Get, &path)?;
        self.client.execute(request).await
    }

    /// # Errors
    /// [`ApiError::InvalidInput`](crate::api::ApiError::InvalidInput) for an
    /// empty or inconsistent update; otherwise any error of the request.
    #[instrument(skip(self, update))]
    pub async fn update_vendor_shipping_methods(
        &self,
        vendor_id: i64,
        update: &ShippingMethodUpdate,
    ) -> ApiResult<Vec<ShippingMethod>> {
        update.validate()?;
        let path = format!("/v3/vendors/{vendor_id}/shipping-methods");
        let request = self.client.request(HttpMethod::Put, &path)?.json(to_body(update)?);
        self.client.execute(request).await
    }

    // ------------------------------------------------------------------
    // Vendor management
    // ------------------------------------------------------------------

    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self, query))]
    pub async fn get_vendor_products(
        &self,
        vendor_id: i64,
        query: &VendorProductQuery,
    ) -> ApiResult<Value> {
        let path = format!("/v3/vendors/{vendor_id}/products");
        let request = self.client.request(HttpMethod::Get, &path)?.query_pairs(query.to_query());
        self.client.send(request).await
    }

    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self, update), fields(status = update.status))]
    pub async fn update_vendor_status(
        &self,
        vendor_id: i64,
        update: &VendorStatusUpdate,
    ) -> ApiResult<Value> {
        let path = format!("/v3/vendors/{vendor_id}/status");
        let request = self.client.request(HttpMethod::Patch, &path)?.json(to_body(update)?);
        self.client.send(request).await
    }

    /// Start moving the vendor to a new mobile number; an OTP is sent to it.
    ///
    /// # Errors
    /// [`ApiError::InvalidInput`](crate::api::ApiError::InvalidInput) for a
    /// blank number; otherwise any error of the request.
    #[instrument(skip(self, change))]
    pub async fn change_vendor_mobile_request(
        &self,
        vendor_id: i64,
        change: &MobileChange,
    ) -> ApiResult<Acknowledgement> {
        change.validate()?;
        self.post_json(&format!("/v3/vendors/{vendor_id}/change-mobile-request"), change).await
    }

    /// # Errors
    /// [`ApiError::InvalidInput`](crate::api::ApiError::InvalidInput) for a
    /// blank code; otherwise any error of the request.
    #[instrument(skip(self, code))]
    pub async fn change_vendor_mobile_confirm(
        &self,
        vendor_id: i64,
        code: &OtpCode,
    ) -> ApiResult<Acknowledgement> {
        code.validate()?;
        self.post_json(&format!("/v3/vendors/{vendor_id}/change-mobile-confirm"), code).await
    }

    /// # Errors
    /// [`ApiError::InvalidInput`](crate::api::ApiError::InvalidInput) if the
    /// request does not validate; otherwise any error of the request.
    #[instrument(skip(self, action), fields(action = %action.action))]
    pub async fn create_bulk_update_product_request(
        &self,
        vendor_id: i64,
        action: &BulkActionRequest,
    ) -> ApiResult<BulkUpdateJob> {
        action.validate()?;
        self.post_json(&format!("/v3/vendors/{vendor_id}/bulk-update-product-request"), action)
            .await
    }

    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self))]
    pub async fn get_bulk_update_requests(
        &self,
        vendor_id: i64,
        page: u32,
        per_page: u32,
    ) -> ApiResult<Value> {
        let path = format!("/v3/vendors/{vendor_id}/bulk-update-product-request");
        let request =
            self.client.request(HttpMethod::Get, &path)?.query_pairs(paging(page, per_page));
        self.client.send(request).await
    }

    /// Products a bulk update request failed to change.
    ///
    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self))]
    pub async fn get_unsuccessful_bulk_update_products(
        &self,
        request_id: i64,
        page: u32,
        per_page: u32,
    ) -> ApiResult<Value> {
        let path = format!("/v3/bulk-update-product-request/{request_id}/unsuccessful_products");
        let request =
            self.client.request(HttpMethod::Get, &path)?.query_pairs(paging(page, per_page));
        self.client.send(request).await
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    /// Ask for a code confirming the user's current mobile number.
    ///
    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self))]
    pub async fn confirm_current_user_mobile_request(
        &self,
        user_id: i64,
    ) -> ApiResult<Acknowledgement> {
        let path = format!("/v3/users/{user_id}/confirm-mobile-request");
        let request = self.client.request(HttpMethod::Post, &path)?;
        self.client.execute(request).await
    }

    /// # Errors
    /// [`ApiError::InvalidInput`](crate::api::ApiError::InvalidInput) for a
    /// blank code; otherwise any error of the request.
    #[instrument(skip(self, code))]
    pub async fn confirm_current_user_mobile(
        &self,
        user_id: i64,
        code: &OtpCode,
    ) -> ApiResult<Acknowledgement> {
        code.validate()?;
        self.post_json(&format!("/v3/users/{user_id}/confirm-mobile"), code).await
    }

    /// # Errors
    /// [`ApiError::InvalidInput`](crate::api::ApiError::InvalidInput) for a
    /// blank number; otherwise any error of the request.
    #[instrument(skip(self, change))]
    pub async fn change_user_mobile_request(
        &self,
        user_id: i64,
        change: &MobileChange,
    ) -> ApiResult<Acknowledgement> {
        change.validate()?;
        self.post_json(&format!("/v3/users/{user_id}/change-mobile-request"), change).await
    }

    /// # Errors
    /// [`ApiError::InvalidInput`](crate::api::ApiError::InvalidInput) for a
    /// blank code; otherwise any error of the request.
    #[instrument(skip(self, code))]
    pub async fn change_user_mobile_confirm(
        &self,
        user_id: i64,
        code: &OtpCode,
    ) -> ApiResult<Acknowledgement> {
        code.validate()?;
        self.post_json(&format!("/v3/users/{user_id}/change-mobile-confirm"), code).await
    }

    /// Submit identity details for review; answers with the updated user.
    ///
    /// # Errors
    /// [`ApiError::InvalidInput`](crate::api::ApiError::InvalidInput) for
    /// blank details; otherwise any error of the request.
    #[instrument(skip(self, verification))]
    pub async fn user_verification_request(
        &self,
        user_id: i64,
        verification: &UserVerification,
    ) -> ApiResult<User> {
        verification.validate()?;
        let path = format!("/v3/users/{user_id}/verification-request");
        let request =
            self.client.request(HttpMethod::Patch, &path)?.json(to_body(verification)?);
        self.client.execute(request).await
    }

    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self, query))]
    pub async fn get_private_product_list(
        &self,
        user_id: i64,
        query: &PrivateProductQuery,
    ) -> ApiResult<Value> {
        let path = format!("/v3/users/{user_id}/products");
        let request = self.client.request(HttpMethod::Get, &path)?.query_pairs(query.to_query());
        self.client.send(request).await
    }

    // ------------------------------------------------------------------
    // Bank information
    // ------------------------------------------------------------------

    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self))]
    pub async fn get_user_bank_information(
        &self,
        user_id: i64,
        representation: Representation,
    ) -> ApiResult<Vec<BankAccount>> {
        let request = self
            .client
            .request(HttpMethod::Get, &format!("/v3/users/{user_id}/bank-information"))?
            .header(PREFER_HEADER, representation.prefer_header());
        self.client.execute(request).await
    }

    /// # Errors
    /// [`ApiError::InvalidInput`](crate::api::ApiError::InvalidInput) naming
    /// a blank field; otherwise any error of the request.
    #[instrument(skip(self, account))]
    pub async fn create_user_bank_information(
        &self,
        user_id: i64,
        account: &NewBankAccount,
        representation: Representation,
    ) -> ApiResult<BankAccount> {
        account.validate()?;
        let request = self
            .client
            .request(HttpMethod::Post, &format!("/v3/users/{user_id}/bank-information"))?
            .header(PREFER_HEADER, representation.prefer_header())
            .json(to_body(account)?);
        self.client.execute(request).await
    }

    /// # Errors
    /// [`ApiError::InvalidInput`](crate::api::ApiError::InvalidInput) for a
    /// blank code; otherwise any error of the request.
    #[instrument(skip(self, code))]
    pub async fn verify_bank_information_otp(
        &self,
        user_id: i64,
        code: &OtpCode,
    ) -> ApiResult<Acknowledgement> {
        code.validate()?;
        self.post_json(&format!("/v3/users/{user_id}/bank-information/verify-otp"), code).await
    }

    /// # Errors
    /// [`ApiError::InvalidInput`](crate::api::ApiError::InvalidInput) for a
    /// blank code; otherwise any error of the request.
    #[instrument(skip(self, code))]
    pub async fn verify_bank_information(
        &self,
        user_id: i64,
        code: &OtpCode,
    ) -> ApiResult<Acknowledgement> {
        code.validate()?;
        self.post_json(&format!("/v3/users/{user_id}/bank-information/verify"), code).await
    }

    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self))]
    pub async fn delete_bank_information(
        &self,
        user_id: i64,
        bank_account_id: i64,
    ) -> ApiResult<Acknowledgement> {
        let path = format!("/v3/users/{user_id}/bank-information/{bank_account_id}");
        let request = self.client.request(HttpMethod::Delete, &path)?;
        self.client.execute(request).await
    }

    /// # Errors
    /// [`ApiError::InvalidInput`](crate::api::ApiError::InvalidInput) for an
    /// empty update; otherwise any error of the request.
    #[instrument(skip(self, update))]
    pub async fn update_bank_information(
        &self,
        bank_account_id: i64,
        update: &BankAccountUpdate,
    ) -> ApiResult<Value> {
        update.validate()?;
        let path = format!("/v3/bank-information/{bank_account_id}");
        let request = self.client.request(HttpMethod::Patch, &path)?.json(to_body(update)?);
        self.client.send(request).await
    }

    // ------------------------------------------------------------------
    // Catalog
    // ------------------------------------------------------------------

    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self))]
    pub async fn get_category_attributes(
        &self,
        category_id: i64,
        query: AttributeQuery,
    ) -> ApiResult<Value> {
        let path = format!("/v3/categories/{category_id}/attributes");
        let request = self.client.request(HttpMethod::Get, &path)?.query_pairs(query.to_query());
        self.client.send(request).await
    }

    /// Flat category list.
    ///
    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self))]
    pub async fn get_category_list(&self) -> ApiResult<Value> {
        self.get_value("/v3/categories/list").await
    }

    /// Categories of the first two levels.
    ///
    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self))]
    pub async fn get_category_lv12(&self) -> ApiResult<Value> {
        self.get_value("/v3/categories/lv12").await
    }

    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self))]
    pub async fn get_cities(&self) -> ApiResult<Vec<City>> {
        let request = self.client.request(HttpMethod::Get, "/v3/cities")?;
        self.client.execute(request).await
    }

    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self))]
    pub async fn get_navigation(&self) -> ApiResult<Value> {
        self.get_value("/v3/navigation").await
    }

    // ------------------------------------------------------------------
    // Products
    // ------------------------------------------------------------------

    /// # Errors
    /// [`ApiError::InvalidInput`](crate::api::ApiError::InvalidInput) for an
    /// empty variant list; otherwise any error of the request.
    #[instrument(skip(self, update))]
    pub async fn update_product_variation(
        &self,
        product_id: i64,
        variation_id: i64,
        update: &VariationUpdate,
    ) -> ApiResult<Value> {
        update.validate()?;
        let path = format!("/v4/products/{product_id}/variations/{variation_id}");
        let request = self.client.request(HttpMethod::Patch, &path)?.json(to_body(update)?);
        self.client.send(request).await
    }

    /// Apply one field operation to many of the vendor's products.
    ///
    /// # Errors
    /// [`ApiError::InvalidInput`](crate::api::ApiError::InvalidInput) when no
    /// product is targeted; otherwise any error of the request.
    #[instrument(skip(self, update), fields(products = update.product_ids.len()))]
    pub async fn create_vendor_bulk_action_request(
        &self,
        vendor_id: i64,
        update: &ProductBulkUpdate,
    ) -> ApiResult<Value> {
        update.validate()?;
        let path = format!("/v4/vendors/{vendor_id}/bulk-update-product-request");
        let request = self.client.request(HttpMethod::Post, &path)?.json(to_body(update)?);
        self.client.send(request).await
    }

    async fn get_value(&self, path: &str) -> ApiResult<Value> {
        let request = self.client.request(HttpMethod::Get, path)?;
        self.client.send(request).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let request = self.client.request(HttpMethod::Post, path)?.json(to_body(body)?);
        self.client.execute(request).await
    }
}

fn paging(page: u32, per_page: u32) -> Vec<(String, String)> {
    vec![("page".to_string(), page.to_string()), ("per_page".to_string(), per_page.to_string())]
}

#[cfg(test)]
mod tests {
    use basalam_common::http::RequestBody;
    use basalam_common::testing::MockTransport;
    use basalam_domain::config::Service;
    use basalam_domain::types::core::{BulkField, BulkOperation, ProductStatus};
    use serde_json::json;

    use super::*;
    use crate::api::ApiError;
    use crate::services::test_support;

    const BASE: &str = "https://core.basalam.com";

    fn service(transport: &MockTransport) -> CoreService {
        CoreService::new(test_support::client(Service::Core, transport))
    }

    #[tokio::test]
    async fn test_get_current_user() {
        let transport = MockTransport::new();
        transport.push_json(&format!("{BASE}/v3/users/me"), 200, json!({"id": 5, "name": "Ali"}));

        let user = service(&transport).get_current_user().await.unwrap();

        assert_eq!(user.id, 5);
        let sent = transport.last_request().unwrap();
        assert_eq!(sent.header_value("authorization"), Some("Bearer test-token"));
    }

    #[tokio::test]
    async fn test_get_vendor_sends_prefer_header() {
        let transport = MockTransport::new();
        transport.push_json(&format!("{BASE}/v3/vendors/12"), 200, json!({"id": 12}));

        let vendor =
            service(&transport).get_vendor(12, Representation::Full).await.unwrap();

        assert_eq!(vendor.id, 12);
        let sent = transport.last_request().unwrap();
        assert_eq!(sent.header_value("prefer"), Some("return=representation"));
    }

    /// Validates vendor creation.
    ///
    /// Assertions:
    /// - The body is the serialized request.
    /// - An invalid request never reaches the transport.
    #[tokio::test]
    async fn test_create_vendor() {
        let transport = MockTransport::new();
        transport.push_json(&format!("{BASE}/v3/users/3/vendors"), 201, json!({"id": 40}));
        let core = service(&transport);

        let request = CreateVendorRequest::new("Handmade Shop", "handmade-shop").with_city(1);
        let vendor = core.create_vendor(3, &request).await.unwrap();
        assert_eq!(vendor.id, 40);
        let RequestBody::Json(body) = transport.last_request().unwrap().body else {
            unreachable!("vendor creation sends JSON");
        };
        assert_eq!(body["identifier"], json!("handmade-shop"));

        transport.clear_requests();
        let invalid = CreateVendorRequest::new("", "x");
        assert!(matches!(core.create_vendor(3, &invalid).await, Err(ApiError::InvalidInput(_))));
        assert_eq!(transport.total_requests(), 0);
    }

    #[tokio::test]
    async fn test_update_vendor_uses_patch() {
        let transport = MockTransport::new();
        transport.push_json(&format!("{BASE}/v3/vendors/40"), 200, json!({"id": 40}));

        let update = UpdateVendorRequest::new().with_summary("Now shipping nationwide");
        service(&transport).update_vendor(40, &update).await.unwrap();

        assert_eq!(transport.last_request().unwrap().method, HttpMethod::Patch);
    }

    #[tokio::test]
    async fn test_error_status_is_mapped() {
        let transport = MockTransport::new();
        transport.push_json(
            &format!("{BASE}/v3/categories/99"),
            404,
            json!({"message": "category not found"}),
        );

        let err = service(&transport).get_category(99).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "HTTP 404: category not found");
    }

    /// Validates the vendor shipping-method round trip.
    ///
    /// Assertions:
    /// - The working methods decode into typed models.
    /// - Updates go out as PUT with only the set fields.
    /// - An empty update never reaches the transport.
    #[tokio::test]
    async fn test_vendor_shipping_methods() {
        let transport = MockTransport::new();
        let url = format!("{BASE}/v3/vendors/7/shipping-methods");
        transport.push_json(&url, 200, json!([{"id": 1, "vendor_id": 7, "is_default": true}]));
        transport.push_json(&url, 200, json!([{"id": 1, "price": 30_000}]));
        let core = service(&transport);

        let methods = core.get_vendor_shipping_methods(7).await.unwrap();
        assert_eq!(methods[0].is_default, Some(true));

        let update = ShippingMethodUpdate::new().with_price(30_000);
        let updated = core.update_vendor_shipping_methods(7, &update).await.unwrap();
        assert_eq!(updated[0].price, Some(30_000));
        let sent = transport.last_request().unwrap();
        assert_eq!(sent.method, HttpMethod::Put);
        let expected = json!({"price": 30_000});
        assert!(matches!(sent.body, RequestBody::Json(ref body) if *body == expected));

        transport.clear_requests();
        let empty = ShippingMethodUpdate::new();
        let result = core.update_vendor_shipping_methods(7, &empty).await;
        assert!(matches!(result, Err(ApiError::InvalidInput(_))));
        assert_eq!(transport.total_requests(), 0);
    }

    #[tokio::test]
    async fn test_vendor_products_sends_filters() {
        let transport = MockTransport::new();
        transport.push_json(&format!("{BASE}/v3/vendors/7/products"), 200, json!({"data": []}));

        let query = VendorProductQuery::default()
            .with_title("saffron")
            .with_statuses(vec![ProductStatus::Published]);
        let products = service(&transport).get_vendor_products(7, &query).await.unwrap();

        assert_eq!(products, json!({"data": []}));
        let sent = transport.last_request().unwrap();
        assert!(sent.query.contains(&("title".to_string(), "saffron".to_string())));
        assert!(sent.query.contains(&("statuses".to_string(), "published".to_string())));
    }

    /// Validates the vendor mobile change flow.
    ///
    /// # Test Steps
    /// 1. Request the change; the body carries the new number.
    /// 2. Confirm with the code; the acknowledgement message is decoded.
    /// 3. A blank code is rejected locally.
    #[tokio::test]
    async fn test_vendor_mobile_change_flow() {
        let transport = MockTransport::new();
        let request_url = format!("{BASE}/v3/vendors/7/change-mobile-request");
        let confirm_url = format!("{BASE}/v3/vendors/7/change-mobile-confirm");
        transport.push_json(&request_url, 200, json!({"message": "code sent"}));
        transport.push_json(&confirm_url, 200, json!({"message": "mobile changed"}));
        let core = service(&transport);

        let sent = core.change_vendor_mobile_request(7, &MobileChange::new("09121234567")).await;
        assert_eq!(sent.unwrap().message.as_deref(), Some("code sent"));
        let body = transport.last_request().unwrap().body;
        assert!(matches!(body, RequestBody::Json(ref b) if b["mobile"] == json!("09121234567")));

        let code = OtpCode::new("4821");
        let confirmed = core.change_vendor_mobile_confirm(7, &code).await.unwrap();
        assert_eq!(confirmed.message.as_deref(), Some("mobile changed"));

        let blank = OtpCode::new("");
        let result = core.change_vendor_mobile_confirm(7, &blank).await;
        assert!(matches!(result, Err(ApiError::InvalidInput(_))));
        assert_eq!(transport.request_count(&confirm_url), 1);
    }

    #[tokio::test]
    async fn test_confirm_mobile_request_has_no_body() {
        let transport = MockTransport::new();
        let url = format!("{BASE}/v3/users/3/confirm-mobile-request");
        transport.push_json(&url, 200, json!({"message": "ok"}));

        service(&transport).confirm_current_user_mobile_request(3).await.unwrap();

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.method, HttpMethod::Post);
        assert!(matches!(sent.body, RequestBody::Empty));
    }

    /// Validates the bank-information endpoints.
    ///
    /// Assertions:
    /// - Listing sends the requested `Prefer` header.
    /// - Deletion targets the account under the user.
    /// - Updates PATCH the account outside the user path.
    #[tokio::test]
    async fn test_bank_information_endpoints() {
        let transport = MockTransport::new();
        let list_url = format!("{BASE}/v3/users/3/bank-information");
        transport.push_json(&list_url, 200, json!([{"id": 90, "bank_name": "Mellat"}]));
        transport.push_json(&format!("{list_url}/90"), 200, json!({"message": "deleted"}));
        transport.push_json(&format!("{BASE}/v3/bank-information/91"), 200, json!({"id": 91}));
        let core = service(&transport);

        let accounts = core.get_user_bank_information(3, Representation::Full).await.unwrap();
        assert_eq!(accounts[0].bank_name.as_deref(), Some("Mellat"));
        let sent = transport.last_request().unwrap();
        assert_eq!(sent.header_value("prefer"), Some("return=representation"));

        core.delete_bank_information(3, 90).await.unwrap();
        assert_eq!(transport.last_request().unwrap().method, HttpMethod::Delete);

        let update = BankAccountUpdate::default().with_sheba_number("IR820540102680020817909002");
        let updated = core.update_bank_information(91, &update).await.unwrap();
        assert_eq!(updated["id"], json!(91));
        assert_eq!(transport.last_request().unwrap().method, HttpMethod::Patch);
    }

    #[tokio::test]
    async fn test_create_bank_information_validates() {
        let transport = MockTransport::new();
        let account = NewBankAccount {
            bank_name: "Mellat".to_string(),
            account_number: String::new(),
            card_number: "6104337812345678".to_string(),
            sheba_number: "IR820540102680020817909002".to_string(),
        };

        let core = service(&transport);

        let result = core.create_user_bank_information(3, &account, Representation::Minimal).await;

        assert!(matches!(result, Err(ApiError::InvalidInput(_))));
        assert_eq!(transport.total_requests(), 0);
    }

    #[tokio::test]
    async fn test_catalog_lookups() {
        let transport = MockTransport::new();
        transport.push_json(
            &format!("{BASE}/v3/cities"),
            200,
            json!([{"id": 1, "name": "Tehran", "province_id": 8}]),
        );
        transport.push_json(&format!("{BASE}/v3/categories/4/attributes"), 200, json!({}));
        let core = service(&transport);

        let cities = core.get_cities().await.unwrap();
        assert_eq!(cities[0].province_id, Some(8));

        core.get_category_attributes(4, AttributeQuery::default()).await.unwrap();
        let sent = transport.last_request().unwrap();
        assert_eq!(sent.query, vec![("exclude_multi_selects".to_string(), "true".to_string())]);
    }

    /// Validates the two bulk update submissions.
    ///
    /// Assertions:
    /// - The v3 request answers with a typed job.
    /// - The v4 request posts the field operation.
    /// - Unsuccessful products are paged.
    #[tokio::test]
    async fn test_bulk_updates() {
        let transport = MockTransport::new();
        transport.push_json(
            &format!("{BASE}/v3/vendors/7/bulk-update-product-request"),
            200,
            json!({"id": 12, "status": "pending"}),
        );
        transport.push_json(
            &format!("{BASE}/v4/vendors/7/bulk-update-product-request"),
            200,
            json!([{"id": 13}]),
        );
        transport.push_json(
            &format!("{BASE}/v3/bulk-update-product-request/12/unsuccessful_products"),
            200,
            json!({"data": []}),
        );
        let core = service(&transport);

        let action = BulkActionRequest::new("publish", vec![7]);
        let job = core.create_bulk_update_product_request(7, &action).await.unwrap();
        assert_eq!(job.status.as_deref(), Some("pending"));

        let update = ProductBulkUpdate::new(
            BulkField::Stock,
            BulkOperation::Increase,
            json!(5),
            vec![100, 101],
        );
        let batches = core.create_vendor_bulk_action_request(7, &update).await.unwrap();
        assert_eq!(batches[0]["id"], json!(13));

        core.get_unsuccessful_bulk_update_products(12, 2, 20).await.unwrap();
        let sent = transport.last_request().unwrap();
        assert!(sent.query.contains(&("page".to_string(), "2".to_string())));
    }
}
