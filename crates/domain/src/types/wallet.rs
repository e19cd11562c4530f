//! Wallet service models: balances, credit spends and refunds

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_HISTORY_PER_PAGE;
use crate::errors::{DomainError, Result};

/// One entry of the `filters` list of a balance request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cash: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settleable: Option<bool>,
    pub vendor: bool,
    pub customer: bool,
}

impl Default for BalanceFilter {
    fn default() -> Self {
        Self { cash: None, settleable: None, vendor: true, customer: true }
    }
}

impl BalanceFilter {
    #[must_use]
    pub const fn cash_only(mut self) -> Self {
        self.cash = Some(true);
        self
    }

    #[must_use]
    pub const fn settleable_only(mut self) -> Self {
        self.settleable = Some(true);
        self
    }
}

/// Body of `POST /v2/user/{user_id}/balance`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceRequest {
    pub filters: Vec<BalanceFilter>,
}

impl BalanceRequest {
    /// Uses a single default filter when `filters` is empty.
    #[must_use]
    pub fn new(filters: Vec<BalanceFilter>) -> Self {
        if filters.is_empty() {
            Self { filters: vec![BalanceFilter::default()] }
        } else {
            Self { filters }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reason {
    pub id: i64,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub reference_type_id: i64,
    pub reference_id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditType {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub parent: Option<Box<CreditType>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credit {
    pub id: i64,
    pub user_id: i64,
    pub amount: i64,
    pub remained_amount: i64,
    #[serde(default)]
    pub reason: Option<Reason>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub credit_type: Option<CreditType>,
    #[serde(default)]
    pub references: Vec<Reference>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub expire_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendItem {
    pub id: i64,
    pub amount: i64,
    #[serde(default)]
    pub references: Vec<Reference>,
    #[serde(default)]
    pub credit: Option<Credit>,
}

/// A credit spend and its rollback state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spend {
    #[serde(default)]
    pub id: Option<i64>,
    pub amount: i64,
    pub user_id: i64,
    pub reference_id: i64,
    #[serde(default)]
    pub reason: Option<Reason>,
    #[serde(default)]
    pub rollback_reason: Option<Reason>,
    #[serde(default)]
    pub items: Vec<SpendItem>,
    #[serde(default)]
    pub references: Vec<Reference>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub deleted_at: Option<String>,
}

impl Spend {
    /// Whether the spend has been rolled back.
    #[must_use]
    pub const fn is_rolled_back(&self) -> bool {
        self.deleted_at.is_some() || self.rollback_reason.is_some()
    }
}

/// Body of `POST /v2/user/{user_id}/spend`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendCreditRequest {
    pub reason_id: i64,
    pub reference_id: i64,
    pub amount: i64,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settleable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<BTreeMap<String, i64>>,
}

impl SpendCreditRequest {
    #[must_use]
    pub fn new(
        reason_id: i64,
        reference_id: i64,
        amount: i64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            reason_id,
            reference_id,
            amount,
            description: description.into(),
            types: None,
            settleable: None,
            references: None,
        }
    }

    #[must_use]
    pub fn with_types(mut self, types: Vec<i64>) -> Self {
        self.types = Some(types);
        self
    }

    #[must_use]
    pub const fn settleable(mut self, settleable: bool) -> Self {
        self.settleable = Some(settleable);
        self
    }

    #[must_use]
    pub fn with_reference(mut self, name: impl Into<String>, id: i64) -> Self {
        self.references.get_or_insert_with(BTreeMap::new).insert(name.into(), id);
        self
    }

    /// # Errors
    /// Returns [`DomainError::InvalidInput`] for a non-positive amount.
    pub fn validate(&self) -> Result<()> {
        if self.amount <= 0 {
            return Err(DomainError::invalid("amount", "must be positive"));
        }
        Ok(())
    }
}

/// Body of `DELETE /v2/user/{user_id}/spend/{spend_id}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollbackSpendRequest {
    pub rollback_reason_id: i64,
}

/// Body of `POST /v2/refund`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundRequest {
    pub original_reason: i64,
    pub original_reference_id: i64,
    pub reason: i64,
    pub reference_id: i64,
    pub amount: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<Vec<BTreeMap<String, i64>>>,
}

impl RefundRequest {
    /// Refund `amount` of the spend identified by `original_reason` and
    /// `original_reference_id`.
    #[must_use]
    pub const fn new(
        original_reason: i64,
        original_reference_id: i64,
        reason: i64,
        reference_id: i64,
        amount: i64,
    ) -> Self {
        Self {
            original_reason,
            original_reference_id,
            reason,
            reference_id,
            amount,
            description: None,
            references: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// # Errors
    /// Returns [`DomainError::InvalidInput`] for a non-positive amount.
    pub fn validate(&self) -> Result<()> {
        if self.amount <= 0 {
            return Err(DomainError::invalid("amount", "must be positive"));
        }
        Ok(())
    }
}

/// Body of `POST /v2/can-rollback-refund`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanRollbackRefundRequest {
    pub refund_reason: i64,
    pub refund_reference_id: i64,
}

/// Body of `DELETE /v2/rollback-refund`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollbackRefundRequest {
    pub refund_reason: i64,
    pub rollback_refund_reason: i64,
    pub refund_reference_id: i64,
    pub reference_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<Vec<BTreeMap<String, i64>>>,
}

impl RollbackRefundRequest {
    #[must_use]
    pub const fn new(
        refund_reason: i64,
        rollback_refund_reason: i64,
        refund_reference_id: i64,
        reference_id: i64,
    ) -> Self {
        Self {
            refund_reason,
            rollback_refund_reason,
            refund_reference_id,
            reference_id,
            description: None,
            references: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A credit created by a refund
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditCreation {
    pub id: i64,
    pub client_id: i64,
    pub reference_id: i64,
    pub user_id: i64,
    pub amount: i64,
    pub credits: Vec<Credit>,
    #[serde(default)]
    pub reason: Option<Reason>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub references: Vec<Reference>,
}

/// What a refund produced: a new credit, or a spend when the refund consumed
/// credit instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RefundOutcome {
    Credit(CreditCreation),
    Spend(Spend),
}

/// `{"status": bool}` answer of the wallet check endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusFlag {
    pub status: bool,
}

/// Query of `GET /v2/user/{user_id}/history`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryQuery {
    pub page: u32,
    pub per_page: u32,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self { page: 1, per_page: DEFAULT_HISTORY_PER_PAGE }
    }
}

impl HistoryQuery {
    #[must_use]
    pub const fn page(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        vec![
            ("page".to_string(), self.page.to_string()),
            ("per_page".to_string(), self.per_page.to_string()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub time: String,
    pub amount: i64,
    pub subtotal: i64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub main_reference_id: Option<i64>,
    #[serde(default)]
    pub references: Vec<Reference>,
    #[serde(default)]
    pub reason: Option<Reason>,
    #[serde(default)]
    pub related_credit: Option<serde_json::Value>,
    #[serde(default)]
    pub related_spend: Option<serde_json::Value>,
}

/// One page of wallet history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPage {
    pub data: Vec<HistoryItem>,
    pub total: u64,
    pub per_page: u32,
    pub current_page: u32,
    pub last_page: u32,
    #[serde(rename = "from", default)]
    pub from_index: Option<u64>,
    #[serde(default)]
    pub to: Option<u64>,
}

impl HistoryPage {
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.current_page < self.last_page
    }
}
