//! Request and response models for every Basalam service
//!
//! Requests are plain structs with `new` plus `with_*` builders and a
//! `validate` check run by the service clients before anything is sent.
//! Response models tolerate missing optional fields; endpoints whose payload
//! shape is not stable are returned as `serde_json::Value` by the clients.

pub mod chat;
pub mod core;
pub mod order;
pub mod order_processing;
pub mod search;
pub mod upload;
pub mod wallet;
pub mod webhook;

use serde::{Deserialize, Serialize};

/// Pagination metadata used by the order-processing service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationMeta {
    pub current_page: Option<u32>,
    pub last_page: Option<u32>,
    pub per_page: Option<u32>,
    pub total: Option<u64>,
    pub next_cursor: Option<String>,
}

/// Comma-joined list parameter as the Basalam APIs expect it
pub(crate) fn join_ids<T: ToString>(ids: &[T]) -> String {
    ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(",")
}

/// Push `name=value` when `value` is present.
pub(crate) fn push_opt<T: ToString + ?Sized>(
    query: &mut Vec<(String, String)>,
    name: &str,
    value: Option<&T>,
) {
    if let Some(value) = value {
        query.push((name.to_string(), value.to_string()));
    }
}

/// Push `name=a,b,c` when the list is non-empty.
pub(crate) fn push_ids<T: ToString>(query: &mut Vec<(String, String)>, name: &str, ids: &[T]) {
    if !ids.is_empty() {
        query.push((name.to_string(), join_ids(ids)));
    }
}
