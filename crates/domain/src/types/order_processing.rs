//! Order-processing service models: customer orders, items and vendor parcels
//!
//! The filters render to the bracketed query keys the service expects
//! (`paid_at[gte]`, `items.vendor_ids`, ...); list parameters are
//! comma-joined.

use serde::{Deserialize, Serialize};

use super::{push_ids, push_opt, PaginationMeta};
use crate::errors::DomainError;

/// Parcel workflow status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
#[repr(i32)]
pub enum ParcelStatus {
    NewOrder = 3739,
    PreparationInProgress = 3237,
    Posted = 3238,
    WrongTrackingCode = 5017,
    ProductIsNotDelivered = 3572,
    ProblemIsReported = 3740,
    CustomerCancelRequest = 4633,
    OverdueAgreementRequest = 5075,
    Satisfied = 3195,
    DefinitiveDissatisfaction = 3233,
    Cancel = 3067,
}

impl ParcelStatus {
    pub const ALL: [Self; 11] = [
        Self::NewOrder,
        Self::PreparationInProgress,
        Self::Posted,
        Self::WrongTrackingCode,
        Self::ProductIsNotDelivered,
        Self::ProblemIsReported,
        Self::CustomerCancelRequest,
        Self::OverdueAgreementRequest,
        Self::Satisfied,
        Self::DefinitiveDissatisfaction,
        Self::Cancel,
    ];

    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for ParcelStatus {
    type Error = DomainError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|status| status.code() == code)
            .ok_or_else(|| DomainError::invalid("parcel status", &code.to_string()))
    }
}

impl From<ParcelStatus> for i32 {
    fn from(status: ParcelStatus) -> Self {
        status.code()
    }
}

/// Filter of `GET /v3/customer-orders`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderFilter {
    pub ids: Vec<i64>,
    pub customer_ids: Vec<i64>,
    pub vendor_ids: Vec<i64>,
    pub product_ids: Vec<i64>,
    pub item_title_like: Option<String>,
    pub parcel_statuses: Vec<ParcelStatus>,
    pub customer_name_like: Option<String>,
    pub paid_at_gte: Option<String>,
    pub paid_at_lte: Option<String>,
    pub parcel_estimate_send_at_gte: Option<String>,
    pub parcel_estimate_send_at_lte: Option<String>,
    pub sort: String,
    pub per_page: u32,
    pub cursor: Option<String>,
}

impl Default for OrderFilter {
    fn default() -> Self {
        Self {
            ids: Vec::new(),
            customer_ids: Vec::new(),
            vendor_ids: Vec::new(),
            product_ids: Vec::new(),
            item_title_like: None,
            parcel_statuses: Vec::new(),
            customer_name_like: None,
            paid_at_gte: None,
            paid_at_lte: None,
            parcel_estimate_send_at_gte: None,
            parcel_estimate_send_at_lte: None,
            sort: "paid_at:desc".to_string(),
            per_page: crate::constants::DEFAULT_PER_PAGE,
            cursor: None,
        }
    }
}

impl OrderFilter {
    #[must_use]
    pub fn with_vendor_ids(mut self, ids: Vec<i64>) -> Self {
        self.vendor_ids = ids;
        self
    }

    #[must_use]
    pub fn with_parcel_statuses(mut self, statuses: Vec<ParcelStatus>) -> Self {
        self.parcel_statuses = statuses;
        self
    }

    /// Orders paid within `[from, to]`; either bound may be omitted.
    #[must_use]
    pub fn paid_between(mut self, from: Option<String>, to: Option<String>) -> Self {
        self.paid_at_gte = from;
        self.paid_at_lte = to;
        self
    }

    #[must_use]
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    #[must_use]
    pub const fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        push_ids(&mut query, "ids", &self.ids);
        push_ids(&mut query, "customer_ids", &self.customer_ids);
        push_ids(&mut query, "vendor_ids", &self.vendor_ids);
        push_ids(&mut query, "product_ids", &self.product_ids);
        push_opt(&mut query, "item_title_like", self.item_title_like.as_deref());
        let statuses: Vec<i32> = self.parcel_statuses.iter().map(|s| s.code()).collect();
        push_ids(&mut query, "parcel_statuses", &statuses);
        push_opt(&mut query, "customer_name_like", self.customer_name_like.as_deref());
        push_opt(&mut query, "paid_at[gte]", self.paid_at_gte.as_deref());
        push_opt(&mut query, "paid_at[lte]", self.paid_at_lte.as_deref());
        push_opt(
            &mut query,
            "parcel_estimate_send_at[gte]",
            self.parcel_estimate_send_at_gte.as_deref(),
        );
        push_opt(
            &mut query,
            "parcel_estimate_send_at[lte]",
            self.parcel_estimate_send_at_lte.as_deref(),
        );
        query.push(("sort".to_string(), self.sort.clone()));
        query.push(("per_page".to_string(), self.per_page.to_string()));
        push_opt(&mut query, "cursor", self.cursor.as_deref());
        query
    }
}

/// Filter of `GET /customer-items`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFilter {
    pub ids: Vec<i64>,
    pub order_ids: Vec<i64>,
    pub customer_ids: Vec<i64>,
    pub product_ids: Vec<i64>,
    pub vendor_ids: Vec<i64>,
    pub created_at_gte: Option<String>,
    pub created_at_lte: Option<String>,
    pub sort: String,
    pub per_page: u32,
    pub cursor: Option<String>,
}

impl Default for ItemFilter {
    fn default() -> Self {
        Self {
            ids: Vec::new(),
            order_ids: Vec::new(),
            customer_ids: Vec::new(),
            product_ids: Vec::new(),
            vendor_ids: Vec::new(),
            created_at_gte: None,
            created_at_lte: None,
            sort: "created_at:desc".to_string(),
            per_page: crate::constants::DEFAULT_PER_PAGE,
            cursor: None,
        }
    }
}

impl ItemFilter {
    #[must_use]
    pub fn with_order_ids(mut self, ids: Vec<i64>) -> Self {
        self.order_ids = ids;
        self
    }

    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        push_ids(&mut query, "ids", &self.ids);
        push_ids(&mut query, "order_ids", &self.order_ids);
        push_ids(&mut query, "customer_ids", &self.customer_ids);
        push_ids(&mut query, "product_ids", &self.product_ids);
        push_ids(&mut query, "vendor_ids", &self.vendor_ids);
        push_opt(&mut query, "created_at[gte]", self.created_at_gte.as_deref());
        push_opt(&mut query, "created_at[lte]", self.created_at_lte.as_deref());
        query.push(("sort".to_string(), self.sort.clone()));
        query.push(("per_page".to_string(), self.per_page.to_string()));
        push_opt(&mut query, "cursor", self.cursor.as_deref());
        query
    }
}

/// Filter of `GET /vendor-parcels`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParcelFilter {
    pub ids: Vec<i64>,
    pub customer_ids: Vec<i64>,
    pub vendor_ids: Vec<i64>,
    pub product_ids: Vec<i64>,
    pub order_ids: Vec<i64>,
    pub statuses: Vec<ParcelStatus>,
    pub estimate_send_at_gte: Option<String>,
    pub estimate_send_at_lte: Option<String>,
    pub created_at_gte: Option<String>,
    pub created_at_lte: Option<String>,
    pub sort: String,
    pub per_page: u32,
    pub cursor: Option<String>,
}

impl Default for ParcelFilter {
    fn default() -> Self {
        Self {
            ids: Vec::new(),
            customer_ids: Vec::new(),
            vendor_ids: Vec::new(),
            product_ids: Vec::new(),
            order_ids: Vec::new(),
            statuses: Vec::new(),
            estimate_send_at_gte: None,
            estimate_send_at_lte: None,
            created_at_gte: None,
            created_at_lte: None,
            sort: "estimate_send_at:desc".to_string(),
            per_page: crate::constants::DEFAULT_PER_PAGE,
            cursor: None,
        }
    }
}

impl ParcelFilter {
    #[must_use]
    pub fn with_statuses(mut self, statuses: Vec<ParcelStatus>) -> Self {
        self.statuses = statuses;
        self
    }

    #[must_use]
    pub fn with_vendor_ids(mut self, ids: Vec<i64>) -> Self {
        self.vendor_ids = ids;
        self
    }

    #[must_use]
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        push_ids(&mut query, "ids", &self.ids);
        push_ids(&mut query, "items.customer_ids", &self.customer_ids);
        push_ids(&mut query, "items.vendor_ids", &self.vendor_ids);
        push_ids(&mut query, "items.product_ids", &self.product_ids);
        push_ids(&mut query, "items.order_ids", &self.order_ids);
        let statuses: Vec<i32> = self.statuses.iter().map(|s| s.code()).collect();
        push_ids(&mut query, "statuses", &statuses);
        push_opt(&mut query, "estimate_send_at[gte]", self.estimate_send_at_gte.as_deref());
        push_opt(&mut query, "estimate_send_at[lte]", self.estimate_send_at_lte.as_deref());
        push_opt(&mut query, "created_at[gte]", self.created_at_gte.as_deref());
        push_opt(&mut query, "created_at[lte]", self.created_at_lte.as_deref());
        query.push(("sort".to_string(), self.sort.clone()));
        query.push(("per_page".to_string(), self.per_page.to_string()));
        push_opt(&mut query, "cursor", self.cursor.as_deref());
        query
    }
}

/// Counter requested from `GET /orders-calculate-stats`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceStats {
    CouponUsedInOrders,
    OrdersPerCustomer,
    PurchasesPerCustomer,
    SalesPerVendor,
    OrdersPerVendor,
    NotShippedOrdersPerVendor,
    ShippedOrdersPerVendor,
    PendingOrdersPerVendor,
    CompletedOrdersPerVendor,
    SalesPerProduct,
}

impl ResourceStats {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CouponUsedInOrders => "number-of-coupon-used-in-orders",
            Self::OrdersPerCustomer => "number-of-orders-per-customer",
            Self::PurchasesPerCustomer => "number-of-purchases-per-customer",
            Self::SalesPerVendor => "number-of-sales-per-vendor",
            Self::OrdersPerVendor => "number-of-orders-per-vendor",
            Self::NotShippedOrdersPerVendor => "number-of-not-shipped-orders-per-vendor",
            Self::ShippedOrdersPerVendor => "number-of-shipped-orders-per-vendor",
            Self::PendingOrdersPerVendor => "number-of-pending-orders-per-vendor",
            Self::CompletedOrdersPerVendor => "number-of-completed-orders-per-vendor",
            Self::SalesPerProduct => "number-of-sales-per-product",
        }
    }
}

/// Parameters of an order statistics lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderStatsQuery {
    pub resource_count: ResourceStats,
    pub vendor_id: Option<i64>,
    pub product_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub coupon_code: Option<String>,
    /// Sent as `Cache-Control` when set
    pub cache_control: Option<String>,
}

impl OrderStatsQuery {
    #[must_use]
    pub const fn new(resource_count: ResourceStats) -> Self {
        Self {
            resource_count,
            vendor_id: None,
            product_id: None,
            customer_id: None,
            coupon_code: None,
            cache_control: None,
        }
    }

    #[must_use]
    pub const fn for_vendor(mut self, vendor_id: i64) -> Self {
        self.vendor_id = Some(vendor_id);
        self
    }

    #[must_use]
    pub fn with_cache_control(mut self, value: impl Into<String>) -> Self {
        self.cache_control = Some(value.into());
        self
    }

    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query =
            vec![("resource_count".to_string(), self.resource_count.as_str().to_string())];
        push_opt(&mut query, "vendor_id", self.vendor_id.as_ref());
        push_opt(&mut query, "product_id", self.product_id.as_ref());
        push_opt(&mut query, "customer_id", self.customer_id.as_ref());
        push_opt(&mut query, "coupon_code", self.coupon_code.as_deref());
        query
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image: Option<serde_json::Value>,
    #[serde(default)]
    pub category: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParcelVendor {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub url_alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParcelItem {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub weight: i64,
    #[serde(default)]
    pub price: i64,
    #[serde(default)]
    pub max_refund_amount: Option<i64>,
    #[serde(default)]
    pub last_item_status: Option<serde_json::Value>,
    #[serde(default)]
    pub product: Option<ProductSummary>,
    #[serde(default)]
    pub variation: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parcel {
    pub id: i64,
    #[serde(default)]
    pub vendor: Option<ParcelVendor>,
    pub status: i32,
    #[serde(default)]
    pub status_text: Option<String>,
    #[serde(default)]
    pub estimate_send_at: Option<String>,
    #[serde(default)]
    pub items: Vec<ParcelItem>,
    #[serde(default)]
    pub invoice: Option<serde_json::Value>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Parcel {
    /// The typed status, when the code is a known one.
    #[must_use]
    pub fn parcel_status(&self) -> Option<ParcelStatus> {
        ParcelStatus::try_from(self.status).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerOrder {
    pub id: i64,
    #[serde(default)]
    pub hash_id: Option<String>,
    #[serde(default)]
    pub paid_at: Option<String>,
    #[serde(default)]
    pub parcels: Vec<Parcel>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_id: Option<i64>,
    #[serde(default)]
    pub total_price: Option<i64>,
    #[serde(default)]
    pub coupon: Option<serde_json::Value>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A page of results with its pagination block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: PaginationMeta,
}

pub type OrdersPage = Page<CustomerOrder>;
pub type ParcelsPage = Page<Parcel>;
pub type ItemsPage = Page<ParcelItem>;

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    /// Validates the order filter's wire rendering.
    ///
    /// Assertions:
    /// - Defaults emit only `sort` and `per_page`.
    /// - Lists are comma-joined and statuses rendered as codes.
    /// - Date bounds use bracketed keys.
    #[test]
    fn test_order_filter_query() {
        assert_eq!(
            OrderFilter::default().to_query(),
            vec![("sort".into(), "paid_at:desc".into()), ("per_page".into(), "10".into())]
        );

        let query = OrderFilter::default()
            .with_vendor_ids(vec![4, 5])
            .with_parcel_statuses(vec![ParcelStatus::NewOrder, ParcelStatus::Posted])
            .paid_between(Some("2024-01-01".into()), None)
            .with_cursor("c1")
            .to_query();

        assert!(query.contains(&("vendor_ids".into(), "4,5".into())));
        assert!(query.contains(&("parcel_statuses".into(), "3739,3238".into())));
        assert!(query.contains(&("paid_at[gte]".into(), "2024-01-01".into())));
        assert!(!query.iter().any(|(k, _)| k == "paid_at[lte]"));
        assert_eq!(query.last(), Some(&("cursor".into(), "c1".into())));
    }

    #[test]
    fn test_parcel_filter_uses_item_keys() {
        let query = ParcelFilter::default()
            .with_vendor_ids(vec![9])
            .with_statuses(vec![ParcelStatus::Cancel])
            .to_query();
        assert!(query.contains(&("items.vendor_ids".into(), "9".into())));
        assert!(query.contains(&("statuses".into(), "3067".into())));
        assert!(query.contains(&("sort".into(), "estimate_send_at:desc".into())));
    }

    #[test]
    fn test_item_filter_and_stats_query() {
        let query = ItemFilter::default().with_order_ids(vec![1]).to_query();
        assert_eq!(query[0], ("order_ids".into(), "1".into()));

        let stats = OrderStatsQuery::new(ResourceStats::SalesPerVendor).for_vendor(3).to_query();
        assert_eq!(
            stats,
            vec![
                ("resource_count".into(), "number-of-sales-per-vendor".into()),
                ("vendor_id".into(), "3".into())
            ]
        );
    }

    #[test]
    fn test_orders_page_decoding() {
        let page: OrdersPage = serde_json::from_value(json!({
            "data": [{
                "id": 1,
                "hash_id": "abc",
                "parcels": [{"id": 2, "status": 3238, "items": [{"id": 3, "price": 1000}]}]
            }],
            "meta": {"current_page": 1, "per_page": 10, "next_cursor": "n2"}
        }))
        .unwrap();

        let parcel = &page.data[0].parcels[0];
        assert_eq!(parcel.parcel_status(), Some(ParcelStatus::Posted));
        assert_eq!(parcel.items[0].price, 1000);
        assert_eq!(page.meta.next_cursor.as_deref(), Some("n2"));
    }

    #[test]
    fn test_parcel_status_serde_uses_codes() {
        assert_eq!(serde_json::to_value(ParcelStatus::Satisfied).unwrap(), json!(3195));
        let status: ParcelStatus = serde_json::from_value(json!(5017)).unwrap();
        assert_eq!(status, ParcelStatus::WrongTrackingCode);
        assert!(serde_json::from_value::<ParcelStatus>(json!(42)).is_err());
    }

    #[test]
    fn test_unknown_parcel_status_is_none() {
        let parcel: Parcel = serde_json::from_value(json!({"id": 1, "status": 1})).unwrap();
        assert!(parcel.parcel_status().is_none());
    }
}
