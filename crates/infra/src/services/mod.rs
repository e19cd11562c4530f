//! Typed clients for the Basalam services
//!
//! Each client wraps a [`ServiceClient`](crate::api::ServiceClient) bound to
//! its service's base URL. Request models are validated before anything is
//! sent. Endpoints whose payload shape varies return `serde_json::Value`.

pub mod chat;
pub mod core;
pub mod order;
pub mod order_processing;
pub mod search;
pub mod upload;
pub mod wallet;
pub mod webhook;

pub use self::chat::ChatService;
pub use self::core::CoreService;
pub use self::order::OrderService;
pub use self::order_processing::OrderProcessingService;
pub use self::search::SearchService;
pub use self::upload::UploadService;
pub use self::wallet::WalletService;
pub use self::webhook::WebhookService;
