//! Order service models: invoices and payments

use serde::{Deserialize, Serialize};

use super::chat::SortOrder;
use crate::errors::{DomainError, Result};

/// Body of `POST /v2/invoice/{invoice_id}/payment`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePaymentRequest {
    pub payment_method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CreatePaymentRequest {
    #[must_use]
    pub fn new(payment_method: impl Into<String>) -> Self {
        Self { payment_method: payment_method.into(), payment_id: None, description: None }
    }

    #[must_use]
    pub fn with_payment_id(mut self, payment_id: impl Into<String>) -> Self {
        self.payment_id = Some(payment_id.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// # Errors
    /// Returns [`DomainError::InvalidInput`] for a blank payment method.
    pub fn validate(&self) -> Result<()> {
        if self.payment_method.trim().is_empty() {
            return Err(DomainError::invalid("payment_method", "must not be empty"));
        }
        Ok(())
    }
}

/// Query parameters of `GET /v2/payment/{pay_id}/callback`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentCallbackRequest {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PaymentCallbackRequest {
    #[must_use]
    pub fn new(status: impl Into<String>) -> Self {
        Self { status: status.into(), transaction_id: None, description: None }
    }

    #[must_use]
    pub fn with_transaction_id(mut self, transaction_id: impl Into<String>) -> Self {
        self.transaction_id = Some(transaction_id.into());
        self
    }

    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![("status".to_string(), self.status.clone())];
        super::push_opt(&mut query, "transaction_id", self.transaction_id.as_deref());
        super::push_opt(&mut query, "description", self.description.as_deref());
        query
    }
}

/// Body of `POST /v2/payment/{pay_id}/verify`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyPaymentRequest {
    pub payment_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl VerifyPaymentRequest {
    #[must_use]
    pub fn new(payment_id: impl Into<String>) -> Self {
        Self { payment_id: payment_id.into(), transaction_id: None, description: None }
    }

    #[must_use]
    pub fn with_transaction_id(mut self, transaction_id: impl Into<String>) -> Self {
        self.transaction_id = Some(transaction_id.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl InvoiceStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }
}

/// Query of `GET /v2/invoice/unpaid`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnpaidInvoicesQuery {
    pub invoice_id: Option<i64>,
    pub status: Option<InvoiceStatus>,
    pub page: u32,
    pub per_page: u32,
    pub sort: SortOrder,
}

impl Default for UnpaidInvoicesQuery {
    fn default() -> Self {
        Self { invoice_id: None, status: None, page: 1, per_page: 20, sort: SortOrder::Desc }
    }
}

impl UnpaidInvoicesQuery {
    #[must_use]
    pub const fn with_status(mut self, status: InvoiceStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub const fn with_invoice(mut self, invoice_id: i64) -> Self {
        self.invoice_id = Some(invoice_id);
        self
    }

    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![
            ("page".to_string(), self.page.to_string()),
            ("per_page".to_string(), self.per_page.to_string()),
            ("sort".to_string(), self.sort.as_str().to_string()),
        ];
        super::push_opt(&mut query, "invoice_id", self.invoice_id.as_ref());
        super::push_opt(&mut query, "status", self.status.map(InvoiceStatus::as_str));
        query
    }
}
