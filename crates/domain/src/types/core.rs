//! Core service models: users, vendors, shipping, bank accounts and catalog

use serde::{Deserialize, Serialize};

use super::{push_ids, push_opt};
use crate::constants::DEFAULT_PER_PAGE;
use crate::errors::{DomainError, Result};

/// Authenticated user as returned by `/v3/users/me`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub avatar: Option<serde_json::Value>,
    #[serde(default)]
    pub vendor: Option<serde_json::Value>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Vendor (booth) resource
///
/// The private representation adds `settings`; request it with
/// [`Representation::Full`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub logo: Option<serde_json::Value>,
    #[serde(default)]
    pub cover: Option<serde_json::Value>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city_id: Option<i64>,
    #[serde(default)]
    pub settings: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Value of the `Prefer` header on vendor and bank-information lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Representation {
    #[default]
    Minimal,
    Full,
}

impl Representation {
    #[must_use]
    pub const fn prefer_header(self) -> &'static str {
        match self {
            Self::Minimal => "return=minimal",
            Self::Full => "return=representation",
        }
    }
}

/// Body of `POST /v3/users/{user_id}/vendors`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateVendorRequest {
    pub title: String,
    pub identifier: String,
    pub category_type: Option<i64>,
    pub city: Option<i64>,
    pub summary: Option<String>,
    pub notice: Option<String>,
}

impl CreateVendorRequest {
    #[must_use]
    pub fn new(title: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            identifier: identifier.into(),
            category_type: None,
            city: None,
            summary: None,
            notice: None,
        }
    }

    #[must_use]
    pub const fn with_category_type(mut self, category_type: i64) -> Self {
        self.category_type = Some(category_type);
        self
    }

    #[must_use]
    pub const fn with_city(mut self, city: i64) -> Self {
        self.city = Some(city);
        self
    }

    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// # Errors
    /// Returns [`DomainError::InvalidInput`] for a blank title or identifier.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(DomainError::invalid("title", "must not be empty"));
        }
        if self.identifier.trim().is_empty() {
            return Err(DomainError::invalid("identifier", "must not be empty"));
        }
        Ok(())
    }
}

/// Body of `PATCH /v3/vendors/{vendor_id}`; only set fields are sent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateVendorRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<i64>,
}

impl UpdateVendorRequest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    #[must_use]
    pub const fn with_city(mut self, city: i64) -> Self {
        self.city = Some(city);
        self
    }

    /// # Errors
    /// Returns [`DomainError::InvalidInput`] when nothing would change.
    pub fn validate(&self) -> Result<()> {
        if *self == Self::default() {
            return Err(DomainError::invalid("vendor update", "at least one field is required"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub children: Vec<Category>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryList {
    pub data: Vec<Category>,
}

/// Plain success answer (`{"message": ...}`) of the mobile and bank flows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Acknowledgement {
    pub message: Option<String>,
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DomainError::invalid(field, "must not be empty"));
    }
    Ok(())
}

// ============================================================================
// Shipping methods
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingMethod {
    pub id: i64,
    #[serde(default)]
    pub vendor_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<i64>,
    #[serde(default)]
    pub min_order_amount: Option<i64>,
    #[serde(default)]
    pub max_order_amount: Option<i64>,
    #[serde(default)]
    pub preparation_days: Option<i64>,
    #[serde(default)]
    pub is_default: Option<bool>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Filter of `GET /v3/shipping-methods`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingMethodQuery {
    pub ids: Vec<i64>,
    pub vendor_ids: Vec<i64>,
    pub include_deleted: Option<bool>,
    pub page: u32,
    pub per_page: u32,
}

impl Default for ShippingMethodQuery {
    fn default() -> Self {
        Self {
            ids: Vec::new(),
            vendor_ids: Vec::new(),
            include_deleted: None,
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl ShippingMethodQuery {
    #[must_use]
    pub fn with_vendor_ids(mut self, ids: Vec<i64>) -> Self {
        self.vendor_ids = ids;
        self
    }

    #[must_use]
    pub const fn include_deleted(mut self, include: bool) -> Self {
        self.include_deleted = Some(include);
        self
    }

    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![
            ("page".to_string(), self.page.to_string()),
            ("per_page".to_string(), self.per_page.to_string()),
        ];
        push_ids(&mut query, "ids", &self.ids);
        push_ids(&mut query, "vendor_ids", &self.vendor_ids);
        push_opt(&mut query, "include_deleted", self.include_deleted.as_ref());
        query
    }
}

/// Body of `PUT /v3/vendors/{vendor_id}/shipping-methods`; only set fields are sent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingMethodUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_order_amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_order_amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preparation_days: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
}

impl ShippingMethodUpdate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_price(mut self, price: i64) -> Self {
        self.price = Some(price);
        self
    }

    #[must_use]
    pub const fn with_preparation_days(mut self, days: i64) -> Self {
        self.preparation_days = Some(days);
        self
    }

    #[must_use]
    pub const fn as_default(mut self, is_default: bool) -> Self {
        self.is_default = Some(is_default);
        self
    }

    /// # Errors
    /// Returns [`DomainError::InvalidInput`] when nothing would change or
    /// the order amount bounds are inverted.
    pub fn validate(&self) -> Result<()> {
        if *self == Self::default() {
            return Err(DomainError::invalid(
                "shipping method update",
                "at least one field is required",
            ));
        }
        if let (Some(min), Some(max)) = (self.min_order_amount, self.max_order_amount) {
            if min > max {
                return Err(DomainError::invalid("min_order_amount", "exceeds max_order_amount"));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Vendor products and bulk updates
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Draft,
    Published,
    Archived,
    Rejected,
    Pending,
}

impl ProductStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
            Self::Rejected => "rejected",
            Self::Pending => "pending",
        }
    }
}

/// Inclusive `[gte, lte]` bound; either side may be open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Range {
    pub gte: Option<i64>,
    pub lte: Option<i64>,
}

impl Range {
    #[must_use]
    pub const fn between(gte: i64, lte: i64) -> Self {
        Self { gte: Some(gte), lte: Some(lte) }
    }

    fn push(&self, query: &mut Vec<(String, String)>, name: &str) {
        push_opt(query, &format!("{name}[gte]"), self.gte.as_ref());
        push_opt(query, &format!("{name}[lte]"), self.lte.as_ref());
    }
}

/// Filter of `GET /v3/vendors/{vendor_id}/products`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorProductQuery {
    pub title: Option<String>,
    pub categories: Vec<i64>,
    pub statuses: Vec<ProductStatus>,
    pub stock: Range,
    pub preparation_day: Range,
    pub price: Range,
    pub ids: Vec<i64>,
    pub skus: Vec<String>,
    pub illegal_free_shipping_for_iran: Option<i64>,
    pub illegal_free_shipping_for_same_city: Option<i64>,
    pub page: u32,
    pub per_page: u32,
    pub variants_flatting: bool,
    pub is_wholesale: Option<bool>,
    pub sort: Option<String>,
}

impl Default for VendorProductQuery {
    fn default() -> Self {
        Self {
            title: None,
            categories: Vec::new(),
            statuses: Vec::new(),
            stock: Range::default(),
            preparation_day: Range::default(),
            price: Range::default(),
            ids: Vec::new(),
            skus: Vec::new(),
            illegal_free_shipping_for_iran: None,
            illegal_free_shipping_for_same_city: None,
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            variants_flatting: true,
            is_wholesale: None,
            sort: None,
        }
    }
}

impl VendorProductQuery {
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_statuses(mut self, statuses: Vec<ProductStatus>) -> Self {
        self.statuses = statuses;
        self
    }

    #[must_use]
    pub const fn with_price(mut self, price: Range) -> Self {
        self.price = price;
        self
    }

    #[must_use]
    pub const fn with_stock(mut self, stock: Range) -> Self {
        self.stock = stock;
        self
    }

    #[must_use]
    pub const fn with_page(mut self, page: u32, per_page: u32) -> Self {
        self.page = page;
        self.per_page = per_page;
        self
    }

    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![
            ("page".to_string(), self.page.to_string()),
            ("per_page".to_string(), self.per_page.to_string()),
            ("variants_flatting".to_string(), self.variants_flatting.to_string()),
        ];
        push_opt(&mut query, "title", self.title.as_deref());
        push_ids(&mut query, "category", &self.categories);
        let statuses: Vec<&str> = self.statuses.iter().map(|s| s.as_str()).collect();
        push_ids(&mut query, "statuses", &statuses);
        self.stock.push(&mut query, "stock");
        self.preparation_day.push(&mut query, "preparation_day");
        self.price.push(&mut query, "price");
        push_ids(&mut query, "ids", &self.ids);
        push_ids(&mut query, "skus", &self.skus);
        push_opt(
            &mut query,
            "illegal_free_shipping_for_iran",
            self.illegal_free_shipping_for_iran.as_ref(),
        );
        push_opt(
            &mut query,
            "illegal_free_shipping_for_same_city",
            self.illegal_free_shipping_for_same_city.as_ref(),
        );
        push_opt(&mut query, "is_wholesale", self.is_wholesale.as_ref());
        push_opt(&mut query, "sort", self.sort.as_deref());
        query
    }
}

/// Filter of `GET /v3/users/{user_id}/products`; unset fields are omitted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrivateProductQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub status: Option<String>,
    pub category_id: Option<i64>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

impl PrivateProductQuery {
    #[must_use]
    pub fn search(text: impl Into<String>) -> Self {
        Self { search: Some(text.into()), ..Self::default() }
    }

    #[must_use]
    pub const fn with_page(mut self, page: u32, per_page: u32) -> Self {
        self.page = Some(page);
        self.per_page = Some(per_page);
        self
    }

    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        push_opt(&mut query, "page", self.page.as_ref());
        push_opt(&mut query, "per_page", self.per_page.as_ref());
        push_opt(&mut query, "status", self.status.as_deref());
        push_opt(&mut query, "category_id", self.category_id.as_ref());
        push_opt(&mut query, "search", self.search.as_deref());
        push_opt(&mut query, "sort", self.sort.as_deref());
        push_opt(&mut query, "order", self.order.as_deref());
        query
    }
}

/// Body of `PATCH /v3/vendors/{vendor_id}/status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorStatusUpdate {
    pub status: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl VendorStatusUpdate {
    #[must_use]
    pub const fn new(status: i64) -> Self {
        Self { status, description: None }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Body of `POST /v3/vendors/{vendor_id}/bulk-update-product-request`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkActionRequest {
    pub action: String,
    pub vendor_ids: Vec<i64>,
}

impl BulkActionRequest {
    #[must_use]
    pub fn new(action: impl Into<String>, vendor_ids: Vec<i64>) -> Self {
        Self { action: action.into(), vendor_ids }
    }

    /// # Errors
    /// Returns [`DomainError::InvalidInput`] for a blank action or no vendors.
    pub fn validate(&self) -> Result<()> {
        require("action", &self.action)?;
        if self.vendor_ids.is_empty() {
            return Err(DomainError::invalid("vendor_ids", "must not be empty"));
        }
        Ok(())
    }
}

/// Answer of a bulk update submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkUpdateJob {
    pub id: i64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkField {
    Price,
    Stock,
    Status,
    Category,
    ShippingMethod,
    ShippingCity,
    PreparationDays,
    PackageWeight,
    Weight,
    Keywords,
    Brief,
    Description,
    Photo,
    Photos,
    Video,
    Order,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkOperation {
    Set,
    Increase,
    Decrease,
    Multiply,
    Divide,
    Append,
    Prepend,
    Replace,
    Remove,
}

/// Body of `POST /v4/vendors/{vendor_id}/bulk-update-product-request`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductBulkUpdate {
    pub field: BulkField,
    pub action: BulkOperation,
    pub value: serde_json::Value,
    pub product_ids: Vec<i64>,
}

impl ProductBulkUpdate {
    #[must_use]
    pub fn new(
        field: BulkField,
        action: BulkOperation,
        value: serde_json::Value,
        product_ids: Vec<i64>,
    ) -> Self {
        Self { field, action, value, product_ids }
    }

    /// # Errors
    /// Returns [`DomainError::InvalidInput`] when no product is targeted.
    pub fn validate(&self) -> Result<()> {
        if self.product_ids.is_empty() {
            return Err(DomainError::invalid("product_ids", "must not be empty"));
        }
        Ok(())
    }
}

/// Body of `PATCH /v4/products/{product_id}/variations/{variation_id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariationUpdate {
    pub variants: Vec<serde_json::Value>,
}

impl VariationUpdate {
    #[must_use]
    pub const fn new(variants: Vec<serde_json::Value>) -> Self {
        Self { variants }
    }

    /// # Errors
    /// Returns [`DomainError::InvalidInput`] for an empty variant list.
    pub fn validate(&self) -> Result<()> {
        if self.variants.is_empty() {
            return Err(DomainError::invalid("variants", "must not be empty"));
        }
        Ok(())
    }
}

// ============================================================================
// Mobile numbers and verification
// ============================================================================

/// Body of the `change-mobile-request` endpoints of users and vendors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MobileChange {
    pub mobile: String,
}

impl MobileChange {
    #[must_use]
    pub fn new(mobile: impl Into<String>) -> Self {
        Self { mobile: mobile.into() }
    }

    /// # Errors
    /// Returns [`DomainError::InvalidInput`] for a blank number.
    pub fn validate(&self) -> Result<()> {
        require("mobile", &self.mobile)
    }
}

/// One-time code confirming a mobile change or a bank account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpCode {
    pub code: String,
}

impl OtpCode {
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }

    /// # Errors
    /// Returns [`DomainError::InvalidInput`] for a blank code.
    pub fn validate(&self) -> Result<()> {
        require("code", &self.code)
    }
}

/// Body of `PATCH /v3/users/{user_id}/verification-request`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserVerification {
    pub national_code: String,
    pub birth_date: String,
}

impl UserVerification {
    #[must_use]
    pub fn new(national_code: impl Into<String>, birth_date: impl Into<String>) -> Self {
        Self { national_code: national_code.into(), birth_date: birth_date.into() }
    }

    /// # Errors
    /// Returns [`DomainError::InvalidInput`] for a blank national code or birth date.
    pub fn validate(&self) -> Result<()> {
        require("national_code", &self.national_code)?;
        require("birth_date", &self.birth_date)
    }
}

// ============================================================================
// Bank information
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub bank_name: Option<String>,
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub card_number: Option<String>,
    #[serde(default)]
    pub sheba_number: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Body of `POST /v3/users/{user_id}/bank-information`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBankAccount {
    pub bank_name: String,
    pub account_number: String,
    pub card_number: String,
    pub sheba_number: String,
}

impl NewBankAccount {
    /// # Errors
    /// Returns [`DomainError::InvalidInput`] naming the first blank field.
    pub fn validate(&self) -> Result<()> {
        require("bank_name", &self.bank_name)?;
        require("account_number", &self.account_number)?;
        require("card_number", &self.card_number)?;
        require("sheba_number", &self.sheba_number)
    }
}

/// Body of `PATCH /v3/bank-information/{bank_account_id}`; only set fields are sent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccountUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheba_number: Option<String>,
}

impl BankAccountUpdate {
    #[must_use]
    pub fn with_card_number(mut self, card_number: impl Into<String>) -> Self {
        self.card_number = Some(card_number.into());
        self
    }

    #[must_use]
    pub fn with_sheba_number(mut self, sheba_number: impl Into<String>) -> Self {
        self.sheba_number = Some(sheba_number.into());
        self
    }

    /// # Errors
    /// Returns [`DomainError::InvalidInput`] when nothing would change.
    pub fn validate(&self) -> Result<()> {
        if *self == Self::default() {
            return Err(DomainError::invalid("bank update", "at least one field is required"));
        }
        Ok(())
    }
}

// ============================================================================
// Catalog lookups
// ============================================================================

/// Query of `GET /v3/categories/{category_id}/attributes`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeQuery {
    pub product_id: Option<i64>,
    pub vendor_id: Option<i64>,
    pub exclude_multi_selects: bool,
}

impl Default for AttributeQuery {
    fn default() -> Self {
        Self { product_id: None, vendor_id: None, exclude_multi_selects: true }
    }
}

impl AttributeQuery {
    #[must_use]
    pub const fn for_product(product_id: i64) -> Self {
        Self { product_id: Some(product_id), vendor_id: None, exclude_multi_selects: true }
    }

    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query =
            vec![("exclude_multi_selects".to_string(), self.exclude_multi_selects.to_string())];
        push_opt(&mut query, "product_id", self.product_id.as_ref());
        push_opt(&mut query, "vendor_id", self.vendor_id.as_ref());
        query
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub province_id: Option<i64>,
}
