//! Wallet service client: balances, credit spends and refunds
//!
//! Every call takes an optional operator id, sent as `x-operator-id` when
//! an operator acts on a user's behalf.

use basalam_common::http::{HttpMethod, HttpRequest};
use basalam_domain::constants::OPERATOR_ID_HEADER;
use basalam_domain::types::wallet::{
    BalanceRequest, CanRollbackRefundRequest, HistoryPage, HistoryQuery, RefundOutcome,
    RefundRequest, RollbackRefundRequest, RollbackSpendRequest, Spend, SpendCreditRequest,
    StatusFlag,
};
use serde_json::Value;
use tracing::instrument;

use crate::api::service::{to_body, ServiceClient};
use crate::api::ApiResult;

/// Client for `wallet.basalam.com`
#[derive(Debug, Clone)]
pub struct WalletService {
    client: ServiceClient,
}

impl WalletService {
    /// Wrap a client bound to the wallet service; operator headers are added per call.
    pub const fn new(client: ServiceClient) -> Self {
        Self { client }
    }

    /// The underlying request core, for endpoints without a typed method
    #[must_use]
    pub const fn client(&self) -> &ServiceClient {
        &self.client
    }

    fn request(
        &self,
        method: HttpMethod,
        path: &str,
        operator_id: Option<i64>,
    ) -> ApiResult<HttpRequest> {
        let request = self.client.request(method, path)?;
        Ok(match operator_id {
            Some(id) => request.header(OPERATOR_ID_HEADER, id.to_string()),
            None => request,
        })
    }

    /// Balance of a user, split by the request's filters.
    ///
    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self, balance))]
    pub async fn get_balance(
        &self,
        user_id: i64,
        balance: &BalanceRequest,
        operator_id: Option<i64>,
    ) -> ApiResult<Value> {
        let path = format!("/v2/user/{user_id}/balance");
        let request = self.request(HttpMethod::Post, &path, operator_id)?.json(to_body(balance)?);
        self.client.send(request).await
    }

    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self))]
    pub async fn get_history(
        &self,
        user_id: i64,
        page: HistoryQuery,
        operator_id: Option<i64>,
    ) -> ApiResult<HistoryPage> {
        let path = format!("/v2/user/{user_id}/history");
        let request =
            self.request(HttpMethod::Get, &path, operator_id)?.query_pairs(page.to_query());
        self.client.execute(request).await
    }

    /// Spend credit from a user's wallet.
    ///
    /// # Errors
    /// [`ApiError::InvalidInput`](crate::api::ApiError::InvalidInput) for a
    /// non-positive amount; otherwise any error of the request.
    #[instrument(skip(self, spend), fields(reason_id = spend.reason_id, amount = spend.amount))]
    pub async fn spend_credit(
        &self,
        user_id: i64,
        spend: &SpendCreditRequest,
        operator_id: Option<i64>,
    ) -> ApiResult<Spend> {
        spend.validate()?;
        let path = format!("/v2/user/{user_id}/spend");
        let request = self.request(HttpMethod::Post, &path, operator_id)?.json(to_body(spend)?);
        self.client.execute(request).await
    }

    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self))]
    pub async fn get_spend(
        &self,
        user_id: i64,
        spend_id: i64,
        operator_id: Option<i64>,
    ) -> ApiResult<Spend> {
        let path = format!("/v2/user/{user_id}/spend/{spend_id}");
        let request = self.request(HttpMethod::Get, &path, operator_id)?;
        self.client.execute(request).await
    }

    /// Roll back a spend; the reason travels as a JSON body on `DELETE`.
    ///
    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self))]
    pub async fn rollback_spend(
        &self,
        user_id: i64,
        spend_id: i64,
        rollback: RollbackSpendRequest,
        operator_id: Option<i64>,
    ) -> ApiResult<Spend> {
        let path = format!("/v2/user/{user_id}/spend/{spend_id}");
        let request =
            self.request(HttpMethod::Delete, &path, operator_id)?.json(to_body(&rollback)?);
        self.client.execute(request).await
    }

    /// Look a spend up by the reason and reference it was made with.
    ///
    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self))]
    pub async fn get_spend_by_ref(
        &self,
        user_id: i64,
        reason_id: i64,
        reference_id: i64,
        operator_id: Option<i64>,
    ) -> ApiResult<Spend> {
        let path = format!("/v2/user/{user_id}/spend/by-ref/{reason_id}/{reference_id}");
        let request = self.request(HttpMethod::Get, &path, operator_id)?;
        self.client.execute(request).await
    }

    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self))]
    pub async fn rollback_spend_by_ref(
        &self,
        user_id: i64,
        reason_id: i64,
        reference_id: i64,
        rollback: RollbackSpendRequest,
        operator_id: Option<i64>,
    ) -> ApiResult<Spend> {
        let path = format!("/v2/user/{user_id}/spend/by-ref/{reason_id}/{reference_id}");
        let request =
            self.request(HttpMethod::Delete, &path, operator_id)?.json(to_body(&rollback)?);
        self.client.execute(request).await
    }

    /// Refund (part of) a spend.
    ///
    /// # Errors
    /// [`ApiError::InvalidInput`](crate::api::ApiError::InvalidInput) for a
    /// non-positive amount; otherwise any error of the request.
    #[instrument(skip(self, refund), fields(reference_id = refund.reference_id))]
    pub async fn refund(
        &self,
        refund: &RefundRequest,
        operator_id: Option<i64>,
    ) -> ApiResult<RefundOutcome> {
        refund.validate()?;
        let request =
            self.request(HttpMethod::Post, "/v2/refund", operator_id)?.json(to_body(refund)?);
        self.client.execute(request).await
    }

    /// Whether a refund may still be rolled back.
    ///
    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self))]
    pub async fn can_rollback_refund(
        &self,
        check: CanRollbackRefundRequest,
        operator_id: Option<i64>,
    ) -> ApiResult<bool> {
        let request = self
            .request(HttpMethod::Post, "/v2/can-rollback-refund", operator_id)?
            .json(to_body(&check)?);
        let flag: StatusFlag = self.client.execute(request).await?;
        Ok(flag.status)
    }

    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self, rollback), fields(reference_id = rollback.reference_id))]
    pub async fn rollback_refund(
        &self,
        rollback: &RollbackRefundRequest,
        operator_id: Option<i64>,
    ) -> ApiResult<Spend> {
        let request = self
            .request(HttpMethod::Delete, "/v2/rollback-refund", operator_id)?
            .json(to_body(rollback)?);
        self.client.execute(request).await
    }
}
