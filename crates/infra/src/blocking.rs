//! Blocking facade over [`BasalamClient`]
//!
//! Every service call runs on a small runtime owned by the facade, so
//! synchronous callers share the async client's token caching and
//! single-flight refresh. Do not call these methods from inside an async
//! runtime; use [`BasalamClient`] there.

use std::collections::BTreeSet;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use basalam_common::auth::AuthorizationCode;
use basalam_common::BlockingAuthContext;
use basalam_domain::config::{BasalamConfig, Credentials};
use basalam_domain::types::chat::{ChatHeaders, CreateChatRequest, MessageRequest, MessagesQuery};
use basalam_domain::types::core::{
    Acknowledgement, AttributeQuery, BankAccount, BankAccountUpdate, BulkActionRequest,
    BulkUpdateJob, Category, CategoryList, City, CreateVendorRequest, MobileChange,
    NewBankAccount, OtpCode, PrivateProductQuery, ProductBulkUpdate, Representation,
    ShippingMethod, ShippingMethodQuery, ShippingMethodUpdate, UpdateVendorRequest, User,
    UserVerification, VariationUpdate, Vendor, VendorProductQuery, VendorStatusUpdate,
};
use basalam_domain::types::order::{
    CreatePaymentRequest, PaymentCallbackRequest, UnpaidInvoicesQuery, VerifyPaymentRequest,
};
use basalam_domain::types::order_processing::{
    CustomerOrder, ItemFilter, ItemsPage, OrderFilter, OrderStatsQuery, OrdersPage, Parcel,
    ParcelFilter, ParcelItem, ParcelsPage,
};
use basalam_domain::types::search::ProductSearchRequest;
use basalam_domain::types::upload::{UploadFileRequest, UploadedFile};
use basalam_domain::types::wallet::{
    BalanceRequest, CanRollbackRefundRequest, HistoryPage, HistoryQuery, RefundOutcome,
    RefundRequest, RollbackRefundRequest, RollbackSpendRequest, Spend, SpendCreditRequest,
};
use basalam_domain::types::webhook::{
    CreateServiceRequest, CreateWebhookRequest, DeletedWebhook, LogsQuery, UpdateWebhookRequest,
    Webhook, WebhookEvent, WebhookLog, WebhookPage, WebhookServiceInfo,
};
use serde_json::Value;
use tokio::runtime::{Builder, Runtime};

use crate::api::{ApiError, ApiResult, BasalamClient};
use crate::services::{
    ChatService, CoreService, OrderProcessingService, OrderService, SearchService, UploadService,
    WalletService, WebhookService,
};

/// Blocking counterpart of [`BasalamClient`]
///
/// Safe to share between threads.
#[derive(Clone)]
pub struct BlockingBasalamClient {
    inner: BasalamClient,
    runtime: Arc<Runtime>,
}

impl fmt::Debug for BlockingBasalamClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockingBasalamClient").field("inner", &self.inner).finish_non_exhaustive()
    }
}

impl BlockingBasalamClient {
    /// Wrap an async client, starting a dedicated runtime.
    ///
    /// # Errors
    /// Returns [`ApiError::Config`] if the runtime cannot be started.
    pub fn new(inner: BasalamClient) -> ApiResult<Self> {
        Ok(Self::with_runtime(inner, start_runtime()?))
    }

    /// Wrap an async client using an existing runtime.
    #[must_use]
    pub const fn with_runtime(inner: BasalamClient, runtime: Arc<Runtime>) -> Self {
        Self { inner, runtime }
    }

    /// Blocking client for the client credentials grant.
    ///
    /// # Errors
    /// See [`BasalamClient::client_credentials`].
    pub fn client_credentials(credentials: &Credentials, config: BasalamConfig) -> ApiResult<Self> {
        Self::new(BasalamClient::client_credentials(credentials, config)?)
    }

    /// Blocking client for the authorization code grant, plus the blocking
    /// context that drives the consent flow. Both share one runtime and one
    /// token state.
    ///
    /// # Errors
    /// See [`BasalamClient::authorization_code`].
    pub fn authorization_code(
        credentials: &Credentials,
        config: BasalamConfig,
    ) -> ApiResult<(Self, BlockingAuthContext<AuthorizationCode>)> {
        let (client, context) = BasalamClient::authorization_code(credentials, config)?;
        let runtime = start_runtime()?;
        let context = BlockingAuthContext::with_runtime(context, Arc::clone(&runtime));
        Ok((Self::with_runtime(client, runtime), context))
    }

    /// The async client this facade drives
    #[must_use]
    pub const fn as_async(&self) -> &BasalamClient {
        &self.inner
    }

    /// Blocking [`BasalamClient::access_token`].
    ///
    /// # Errors
    /// See [`BasalamClient::access_token`].
    pub fn access_token(&self) -> ApiResult<String> {
        self.runtime.block_on(self.inner.access_token())
    }

    /// Blocking [`BasalamClient::refresh_auth_token`].
    ///
    /// # Errors
    /// See [`BasalamClient::refresh_auth_token`].
    pub fn refresh_auth_token(&self) -> ApiResult<String> {
        self.runtime.block_on(self.inner.refresh_auth_token())
    }

    /// Scopes granted to the current token
    #[must_use]
    pub fn granted_scopes(&self) -> BTreeSet<String> {
        self.inner.granted_scopes()
    }

    /// `true` if `scope` (or the wildcard) was granted.
    #[must_use]
    pub fn has_scope(&self, scope: &str) -> bool {
        self.inner.has_scope(scope)
    }

    /// Blocking view of [`BasalamClient::core`]
    #[must_use]
    pub fn core(&self) -> Blocking<'_, CoreService> {
        self.wrap(self.inner.core())
    }

    /// Blocking view of [`BasalamClient::chat`]
    #[must_use]
    pub fn chat(&self) -> Blocking<'_, ChatService> {
        self.wrap(self.inner.chat())
    }

    /// Blocking view of [`BasalamClient::wallet`]
    #[must_use]
    pub fn wallet(&self) -> Blocking<'_, WalletService> {
        self.wrap(self.inner.wallet())
    }

    /// Blocking view of [`BasalamClient::webhook`]
    #[must_use]
    pub fn webhook(&self) -> Blocking<'_, WebhookService> {
        self.wrap(self.inner.webhook())
    }

    /// Blocking view of [`BasalamClient::order`]
    #[must_use]
    pub fn order(&self) -> Blocking<'_, OrderService> {
        self.wrap(self.inner.order())
    }

    /// Blocking view of [`BasalamClient::order_processing`]
    #[must_use]
    pub fn order_processing(&self) -> Blocking<'_, OrderProcessingService> {
        self.wrap(self.inner.order_processing())
    }

    /// Blocking view of [`BasalamClient::upload`]
    #[must_use]
    pub fn upload(&self) -> Blocking<'_, UploadService> {
        self.wrap(self.inner.upload())
    }

    /// Blocking view of [`BasalamClient::search`]
    #[must_use]
    pub fn search(&self) -> Blocking<'_, SearchService> {
        self.wrap(self.inner.search())
    }

    fn wrap<'a, S>(&'a self, service: &'a S) -> Blocking<'a, S> {
        Blocking { service, runtime: &self.runtime }
    }
}

fn start_runtime() -> ApiResult<Arc<Runtime>> {
    let runtime = Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("basalam-client")
        .enable_all()
        .build()
        .map_err(|e| ApiError::Config(format!("failed to start client runtime: {e}")))?;
    Ok(Arc::new(runtime))
}

/// A service client whose calls block the current thread
///
/// Each method mirrors the async method of the same name on the wrapped
/// service; see there for behaviour and errors.
#[derive(Debug, Clone)]
pub struct Blocking<'a, S> {
    service: &'a S,
    runtime: &'a Runtime,
}

impl<S> Blocking<'_, S> {
    fn run<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

#[allow(clippy::missing_errors_doc)]
impl Blocking<'_, CoreService> {
    /// The user the current token belongs to.
    pub fn get_current_user(&self) -> ApiResult<User> {
        self.run(self.service.get_current_user())
    }

    /// Fetch a vendor in the requested representation.
    pub fn get_vendor(&self, vendor_id: i64, representation: Representation) -> ApiResult<Vendor> {
        self.run(self.service.get_vendor(vendor_id, representation))
    }

    /// Open a vendor for the user.
    pub fn create_vendor(&self, user_id: i64, vendor: &CreateVendorRequest) -> ApiResult<Vendor> {
        self.run(self.service.create_vendor(user_id, vendor))
    }

    /// Change a vendor's profile.
    pub fn update_vendor(&self, vendor_id: i64, update: &UpdateVendorRequest) -> ApiResult<Vendor> {
        self.run(self.service.update_vendor(vendor_id, update))
    }

    /// Shipping methods offered by default.
    pub fn get_default_shipping_methods(&self) -> ApiResult<Vec<ShippingMethod>> {
        self.run(self.service.get_default_shipping_methods())
    }

    /// A filtered page of shipping methods.
    pub fn get_shipping_methods(&self, query: &ShippingMethodQuery) -> ApiResult<Value> {
        self.run(self.service.get_shipping_methods(query))
    }

    /// Shipping methods the vendor works with.
    pub fn get_vendor_shipping_methods(&self, vendor_id: i64) -> ApiResult<Vec<ShippingMethod>> {
        self.run(self.service.get_vendor_shipping_methods(vendor_id))
    }

    /// Replace settings of the vendor's shipping methods.
    pub fn update_vendor_shipping_methods(
        &self,
        vendor_id: i64,
        update: &ShippingMethodUpdate,
    ) -> ApiResult<Vec<ShippingMethod>> {
        self.run(self.service.update_vendor_shipping_methods(vendor_id, update))
    }

    /// A filtered page of the vendor's products.
    pub fn get_vendor_products(
        &self,
        vendor_id: i64,
        query: &VendorProductQuery,
    ) -> ApiResult<Value> {
        self.run(self.service.get_vendor_products(vendor_id, query))
    }

    /// Change the vendor's status.
    pub fn update_vendor_status(
        &self,
        vendor_id: i64,
        update: &VendorStatusUpdate,
    ) -> ApiResult<Value> {
        self.run(self.service.update_vendor_status(vendor_id, update))
    }

    /// Start moving the vendor to a new mobile number.
    pub fn change_vendor_mobile_request(
        &self,
        vendor_id: i64,
        change: &MobileChange,
    ) -> ApiResult<Acknowledgement> {
        self.run(self.service.change_vendor_mobile_request(vendor_id, change))
    }

    /// Confirm the vendor's new mobile number.
    pub fn change_vendor_mobile_confirm(
        &self,
        vendor_id: i64,
        code: &OtpCode,
    ) -> ApiResult<Acknowledgement> {
        self.run(self.service.change_vendor_mobile_confirm(vendor_id, code))
    }

    /// Submit a bulk update of the vendor's products.
    pub fn create_bulk_update_product_request(
        &self,
        vendor_id: i64,
        action: &BulkActionRequest,
    ) -> ApiResult<BulkUpdateJob> {
        self.run(self.service.create_bulk_update_product_request(vendor_id, action))
    }

    /// A page of the vendor's bulk update requests.
    pub fn get_bulk_update_requests(
        &self,
        vendor_id: i64,
        page: u32,
        per_page: u32,
    ) -> ApiResult<Value> {
        self.run(self.service.get_bulk_update_requests(vendor_id, page, per_page))
    }

    /// Products a bulk update request failed to change.
    pub fn get_unsuccessful_bulk_update_products(
        &self,
        request_id: i64,
        page: u32,
        per_page: u32,
    ) -> ApiResult<Value> {
        self.run(self.service.get_unsuccessful_bulk_update_products(request_id, page, per_page))
    }

    /// Ask for a code confirming the user's mobile number.
    pub fn confirm_current_user_mobile_request(&self, user_id: i64) -> ApiResult<Acknowledgement> {
        self.run(self.service.confirm_current_user_mobile_request(user_id))
    }

    /// Confirm the user's mobile number.
    pub fn confirm_current_user_mobile(
        &self,
        user_id: i64,
        code: &OtpCode,
    ) -> ApiResult<Acknowledgement> {
        self.run(self.service.confirm_current_user_mobile(user_id, code))
    }

    /// Start moving the user to a new mobile number.
    pub fn change_user_mobile_request(
        &self,
        user_id: i64,
        change: &MobileChange,
    ) -> ApiResult<Acknowledgement> {
        self.run(self.service.change_user_mobile_request(user_id, change))
    }

    /// Confirm the user's new mobile number.
    pub fn change_user_mobile_confirm(
        &self,
        user_id: i64,
        code: &OtpCode,
    ) -> ApiResult<Acknowledgement> {
        self.run(self.service.change_user_mobile_confirm(user_id, code))
    }

    /// Submit identity details for review.
    pub fn user_verification_request(
        &self,
        user_id: i64,
        verification: &UserVerification,
    ) -> ApiResult<User> {
        self.run(self.service.user_verification_request(user_id, verification))
    }

    /// A filtered page of the user's own products.
    pub fn get_private_product_list(
        &self,
        user_id: i64,
        query: &PrivateProductQuery,
    ) -> ApiResult<Value> {
        self.run(self.service.get_private_product_list(user_id, query))
    }

    /// The user's bank accounts.
    pub fn get_user_bank_information(
        &self,
        user_id: i64,
        representation: Representation,
    ) -> ApiResult<Vec<BankAccount>> {
        self.run(self.service.get_user_bank_information(user_id, representation))
    }

    /// Register a bank account for the user.
    pub fn create_user_bank_information(
        &self,
        user_id: i64,
        account: &NewBankAccount,
        representation: Representation,
    ) -> ApiResult<BankAccount> {
        self.run(self.service.create_user_bank_information(user_id, account, representation))
    }

    /// Submit the OTP sent for a new bank account.
    pub fn verify_bank_information_otp(
        &self,
        user_id: i64,
        code: &OtpCode,
    ) -> ApiResult<Acknowledgement> {
        self.run(self.service.verify_bank_information_otp(user_id, code))
    }

    /// Verify the user's bank information.
    pub fn verify_bank_information(
        &self,
        user_id: i64,
        code: &OtpCode,
    ) -> ApiResult<Acknowledgement> {
        self.run(self.service.verify_bank_information(user_id, code))
    }

    /// Remove one of the user's bank accounts.
    pub fn delete_bank_information(
        &self,
        user_id: i64,
        bank_account_id: i64,
    ) -> ApiResult<Acknowledgement> {
        self.run(self.service.delete_bank_information(user_id, bank_account_id))
    }

    /// Change fields of a bank account.
    pub fn update_bank_information(
        &self,
        bank_account_id: i64,
        update: &BankAccountUpdate,
    ) -> ApiResult<Value> {
        self.run(self.service.update_bank_information(bank_account_id, update))
    }

    /// The category tree.
    pub fn get_categories(&self) -> ApiResult<CategoryList> {
        self.run(self.service.get_categories())
    }

    /// One category.
    pub fn get_category(&self, category_id: i64) -> ApiResult<Category> {
        self.run(self.service.get_category(category_id))
    }

    /// Attributes products of a category can carry.
    pub fn get_category_attributes(
        &self,
        category_id: i64,
        query: AttributeQuery,
    ) -> ApiResult<Value> {
        self.run(self.service.get_category_attributes(category_id, query))
    }

    /// Flat category list.
    pub fn get_category_list(&self) -> ApiResult<Value> {
        self.run(self.service.get_category_list())
    }

    /// Categories of the first two levels.
    pub fn get_category_lv12(&self) -> ApiResult<Value> {
        self.run(self.service.get_category_lv12())
    }

    /// Cities shipping can target.
    pub fn get_cities(&self) -> ApiResult<Vec<City>> {
        self.run(self.service.get_cities())
    }

    /// The site navigation tree.
    pub fn get_navigation(&self) -> ApiResult<Value> {
        self.run(self.service.get_navigation())
    }

    /// Change the variants of a product variation.
    pub fn update_product_variation(
        &self,
        product_id: i64,
        variation_id: i64,
        update: &VariationUpdate,
    ) -> ApiResult<Value> {
        self.run(self.service.update_product_variation(product_id, variation_id, update))
    }

    /// Apply one field operation to many of the vendor's products.
    pub fn create_vendor_bulk_action_request(
        &self,
        vendor_id: i64,
        update: &ProductBulkUpdate,
    ) -> ApiResult<Value> {
        self.run(self.service.create_vendor_bulk_action_request(vendor_id, update))
    }
}

#[allow(clippy::missing_errors_doc)]
impl Blocking<'_, ChatService> {
    /// Send a message to a chat.
    pub fn create_message(
        &self,
        message: &MessageRequest,
        headers: &ChatHeaders,
    ) -> ApiResult<Value> {
        self.run(self.service.create_message(message, headers))
    }

    /// Open a chat.
    pub fn create_chat(&self, chat: &CreateChatRequest, headers: &ChatHeaders) -> ApiResult<Value> {
        self.run(self.service.create_chat(chat, headers))
    }

    /// A page of messages of a chat.
    pub fn get_messages(&self, chat_id: i64, query: &MessagesQuery) -> ApiResult<Value> {
        self.run(self.service.get_messages(chat_id, query))
    }
}

#[allow(clippy::missing_errors_doc)]
impl Blocking<'_, WalletService> {
    /// The user's credit balance.
    pub fn get_balance(
        &self,
        user_id: i64,
        balance: &BalanceRequest,
        operator_id: Option<i64>,
    ) -> ApiResult<Value> {
        self.run(self.service.get_balance(user_id, balance, operator_id))
    }

    /// A page of the user's wallet history.
    pub fn get_history(
        &self,
        user_id: i64,
        page: HistoryQuery,
        operator_id: Option<i64>,
    ) -> ApiResult<HistoryPage> {
        self.run(self.service.get_history(user_id, page, operator_id))
    }

    /// Spend from the user's credit.
    pub fn spend_credit(
        &self,
        user_id: i64,
        spend: &SpendCreditRequest,
        operator_id: Option<i64>,
    ) -> ApiResult<Spend> {
        self.run(self.service.spend_credit(user_id, spend, operator_id))
    }

    /// One spend by id.
    pub fn get_spend(
        &self,
        user_id: i64,
        spend_id: i64,
        operator_id: Option<i64>,
    ) -> ApiResult<Spend> {
        self.run(self.service.get_spend(user_id, spend_id, operator_id))
    }

    /// Roll back a spend by id.
    pub fn rollback_spend(
        &self,
        user_id: i64,
        spend_id: i64,
        rollback: RollbackSpendRequest,
        operator_id: Option<i64>,
    ) -> ApiResult<Spend> {
        self.run(self.service.rollback_spend(user_id, spend_id, rollback, operator_id))
    }

    /// One spend by reason and reference.
    pub fn get_spend_by_ref(
        &self,
        user_id: i64,
        reason_id: i64,
        reference_id: i64,
        operator_id: Option<i64>,
    ) -> ApiResult<Spend> {
        self.run(self.service.get_spend_by_ref(user_id, reason_id, reference_id, operator_id))
    }

    /// Roll back a spend by reason and reference.
    pub fn rollback_spend_by_ref(
        &self,
        user_id: i64,
        reason_id: i64,
        reference_id: i64,
        rollback: RollbackSpendRequest,
        operator_id: Option<i64>,
    ) -> ApiResult<Spend> {
        self.run(self.service.rollback_spend_by_ref(
            user_id,
            reason_id,
            reference_id,
            rollback,
            operator_id,
        ))
    }

    /// Refund to the user's wallet.
    pub fn refund(
        &self,
        refund: &RefundRequest,
        operator_id: Option<i64>,
    ) -> ApiResult<RefundOutcome> {
        self.run(self.service.refund(refund, operator_id))
    }

    /// Whether a refund can still be rolled back.
    pub fn can_rollback_refund(
        &self,
        check: CanRollbackRefundRequest,
        operator_id: Option<i64>,
    ) -> ApiResult<bool> {
        self.run(self.service.can_rollback_refund(check, operator_id))
    }

    /// Roll back a refund.
    pub fn rollback_refund(
        &self,
        rollback: &RollbackRefundRequest,
        operator_id: Option<i64>,
    ) -> ApiResult<Spend> {
        self.run(self.service.rollback_refund(rollback, operator_id))
    }
}

#[allow(clippy::missing_errors_doc)]
impl Blocking<'_, WebhookService> {
    /// Registered webhook services.
    pub fn get_services(&self) -> ApiResult<WebhookPage<WebhookServiceInfo>> {
        self.run(self.service.get_services())
    }

    /// Register a webhook service.
    pub fn create_service(&self, service: &CreateServiceRequest) -> ApiResult<WebhookServiceInfo> {
        self.run(self.service.create_service(service))
    }

    /// Webhooks, optionally of one service.
    pub fn get_webhooks(&self, service_id: Option<i64>) -> ApiResult<WebhookPage<Webhook>> {
        self.run(self.service.get_webhooks(service_id))
    }

    /// Subscribe a webhook.
    pub fn create_webhook(&self, webhook: &CreateWebhookRequest) -> ApiResult<Webhook> {
        self.run(self.service.create_webhook(webhook))
    }

    /// Change a webhook.
    pub fn update_webhook(
        &self,
        webhook_id: i64,
        update: &UpdateWebhookRequest,
    ) -> ApiResult<Webhook> {
        self.run(self.service.update_webhook(webhook_id, update))
    }

    /// Remove a webhook.
    pub fn delete_webhook(&self, webhook_id: i64) -> ApiResult<DeletedWebhook> {
        self.run(self.service.delete_webhook(webhook_id))
    }

    /// Events a webhook can subscribe to.
    pub fn get_events(&self) -> ApiResult<WebhookPage<WebhookEvent>> {
        self.run(self.service.get_events())
    }

    /// A page of a webhook's delivery logs.
    pub fn get_webhook_logs(
        &self,
        webhook_id: i64,
        page: LogsQuery,
    ) -> ApiResult<WebhookPage<WebhookLog>> {
        self.run(self.service.get_webhook_logs(webhook_id, page))
    }
}

#[allow(clippy::missing_errors_doc)]
impl Blocking<'_, OrderService> {
    /// Availability of a product's variations.
    pub fn get_product_variation_status(&self, product_id: i64) -> ApiResult<Value> {
        self.run(self.service.get_product_variation_status(product_id))
    }

    /// Start paying an invoice.
    pub fn create_payment(
        &self,
        invoice_id: i64,
        payment: &CreatePaymentRequest,
    ) -> ApiResult<Value> {
        self.run(self.service.create_payment(invoice_id, payment))
    }

    /// A page of payable invoices.
    pub fn get_payable_invoices(&self, page: u32, per_page: u32) -> ApiResult<Value> {
        self.run(self.service.get_payable_invoices(page, per_page))
    }

    /// Unpaid invoices matching the query.
    pub fn get_unpaid_invoices(&self, query: &UnpaidInvoicesQuery) -> ApiResult<Value> {
        self.run(self.service.get_unpaid_invoices(query))
    }

    /// Report a gateway callback for a payment.
    pub fn payment_callback(
        &self,
        payment_id: i64,
        callback: &PaymentCallbackRequest,
    ) -> ApiResult<Value> {
        self.run(self.service.payment_callback(payment_id, callback))
    }

    /// Verify a payment with the gateway.
    pub fn verify_payment(
        &self,
        payment_id: i64,
        verify: &VerifyPaymentRequest,
    ) -> ApiResult<Value> {
        self.run(self.service.verify_payment(payment_id, verify))
    }

    /// Current state of a payment.
    pub fn get_payment_status(&self, payment_id: i64) -> ApiResult<Value> {
        self.run(self.service.get_payment_status(payment_id))
    }
}

#[allow(clippy::missing_errors_doc)]
impl Blocking<'_, OrderProcessingService> {
    /// A page of the customer's orders.
    pub fn get_customer_orders(&self, filter: &OrderFilter) -> ApiResult<OrdersPage> {
        self.run(self.service.get_customer_orders(filter))
    }

    /// One customer order.
    pub fn get_customer_order(&self, order_id: i64) -> ApiResult<CustomerOrder> {
        self.run(self.service.get_customer_order(order_id))
    }

    /// A page of the customer's items.
    pub fn get_customer_items(&self, filter: &ItemFilter) -> ApiResult<ItemsPage> {
        self.run(self.service.get_customer_items(filter))
    }

    /// One customer item.
    pub fn get_customer_item(&self, item_id: i64) -> ApiResult<ParcelItem> {
        self.run(self.service.get_customer_item(item_id))
    }

    /// A page of the vendor's parcels.
    pub fn get_vendor_parcels(&self, filter: &ParcelFilter) -> ApiResult<ParcelsPage> {
        self.run(self.service.get_vendor_parcels(filter))
    }

    /// One vendor parcel.
    pub fn get_vendor_parcel(&self, parcel_id: i64) -> ApiResult<Parcel> {
        self.run(self.service.get_vendor_parcel(parcel_id))
    }

    /// Order statistics for a resource.
    pub fn get_order_stats(&self, query: &OrderStatsQuery) -> ApiResult<Value> {
        self.run(self.service.get_order_stats(query))
    }
}

#[allow(clippy::missing_errors_doc)]
impl Blocking<'_, UploadService> {
    /// Upload a file.
    pub fn upload_file(&self, upload: UploadFileRequest) -> ApiResult<UploadedFile> {
        self.run(self.service.upload_file(upload))
    }
}

#[allow(clippy::missing_errors_doc)]
impl Blocking<'_, SearchService> {
    /// Search products.
    pub fn search_products(&self, search: &ProductSearchRequest) -> ApiResult<Value> {
        self.run(self.service.search_products(search))
    }
}

#[cfg(test)]
mod tests {
    use basalam_common::testing::MockTransport;
    use basalam_domain::config::Environment;
    use serde_json::json;

    use super::*;
    use crate::api::StaticToken;

    fn blocking_client(transport: &MockTransport) -> BlockingBasalamClient {
        let client = BasalamClient::builder()
            .config(BasalamConfig::new(Environment::Development))
            .transport(Arc::new(transport.clone()))
            .auth(Arc::new(StaticToken::new("pat").with_scopes(["vendor.parcel.read"])))
            .build()
            .unwrap();
        BlockingBasalamClient::new(client).unwrap()
    }

    #[test]
    fn test_blocking_service_call() {
        let transport = MockTransport::new();
        transport.push_json("https://core.basalam.dev/v3/users/me", 200, json!({"id": 3}));

        let client = blocking_client(&transport);

        assert_eq!(client.core().get_current_user().unwrap().id, 3);
        assert!(client.has_scope("vendor.parcel.read"));
    }

    #[test]
    fn test_blocking_bank_accounts() {
        let transport = MockTransport::new();
        transport.push_json(
            "https://core.basalam.dev/v3/users/3/bank-information",
            200,
            json!([{"id": 90, "card_number": "6104337812345678"}]),
        );
        let client = blocking_client(&transport);

        let accounts = client.core().get_user_bank_information(3, Representation::Minimal).unwrap();

        assert_eq!(accounts[0].id, 90);
        let sent = transport.last_request().unwrap();
        assert_eq!(sent.header_value("prefer"), Some("return=minimal"));
    }

    /// Validates sharing one blocking client between OS threads.
    ///
    /// Assertions:
    /// - Calls from several threads all succeed.
    /// - Every call reached the transport.
    #[test]
    fn test_blocking_client_across_threads() {
        let transport = MockTransport::new();
        transport.respond_always(
            "https://search.basalam.dev/v1/products/search",
            200,
            json!({"products": []}),
        );
        let client = blocking_client(&transport);

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    let request = ProductSearchRequest::query("honey");
                    client.search().search_products(&request).unwrap();
                });
            }
        });

        assert_eq!(transport.total_requests(), 4);
    }
}
