//! Search service models

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_SEARCH_ROWS;
use crate::errors::{DomainError, Result};

/// Product search filters; unset fields are omitted from the request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_shipping: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub same_city: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_score: Option<u8>,
}

impl SearchFilters {
    #[must_use]
    pub const fn free_shipping(mut self) -> Self {
        self.free_shipping = Some(1);
        self
    }

    #[must_use]
    pub fn in_category(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    #[must_use]
    pub fn from_vendor(mut self, identifier: impl Into<String>) -> Self {
        self.vendor_identifier = Some(identifier.into());
        self
    }

    #[must_use]
    pub const fn price_between(mut self, min: Option<i64>, max: Option<i64>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    #[must_use]
    pub const fn with_min_rating(mut self, rating: u8) -> Self {
        self.min_rating = Some(rating);
        self
    }
}

/// Body of `POST /v1/products/search`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSearchRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<SearchFilters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    pub rows: u32,
    pub start: u32,
}

impl Default for ProductSearchRequest {
    fn default() -> Self {
        Self { filters: None, q: None, rows: DEFAULT_SEARCH_ROWS, start: 0 }
    }
}

impl ProductSearchRequest {
    #[must_use]
    pub fn query(q: impl Into<String>) -> Self {
        Self { q: Some(q.into()), ..Self::default() }
    }

    #[must_use]
    pub fn with_filters(mut self, filters: SearchFilters) -> Self {
        self.filters = Some(filters);
        self
    }

    #[must_use]
    pub const fn page(mut self, start: u32, rows: u32) -> Self {
        self.start = start;
        self.rows = rows;
        self
    }

    /// # Errors
    /// Returns [`DomainError::InvalidInput`] for zero rows or an inverted
    /// price range.
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 {
            return Err(DomainError::invalid("rows", "must be positive"));
        }
        if let Some(SearchFilters { min_price: Some(min), max_price: Some(max), .. }) =
            &self.filters
        {
            if min > max {
                return Err(DomainError::invalid("filters", "minPrice exceeds maxPrice"));
            }
        }
        Ok(())
    }
}
