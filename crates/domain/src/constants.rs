//! SDK constants
//!
//! Centralized location for the default endpoints and limits shared by the
//! configuration and the service clients.

// Authentication endpoints
pub const PRODUCTION_TOKEN_URL: &str = "https://auth.basalam.com/oauth/token";
pub const PRODUCTION_AUTHORIZE_URL: &str = "https://basalam.com/accounts/sso";
pub const DEVELOPMENT_TOKEN_URL: &str = "https://auth.basalam.dev/oauth/token";
pub const DEVELOPMENT_AUTHORIZE_URL: &str = "https://basalam.dev/accounts/sso";

// Host suffixes per environment
pub const PRODUCTION_HOST: &str = "basalam.com";
pub const DEVELOPMENT_HOST: &str = "basalam.dev";

// Request defaults
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_REFRESH_MARGIN_SECONDS: u64 = 60;
pub const DEFAULT_USER_AGENT: &str = concat!("basalam-rust-sdk/", env!("CARGO_PKG_VERSION"));

// Pagination defaults
pub const DEFAULT_PER_PAGE: u32 = 10;
pub const DEFAULT_HISTORY_PER_PAGE: u32 = 50;
pub const DEFAULT_MESSAGES_LIMIT: u32 = 20;
pub const DEFAULT_SEARCH_ROWS: u32 = 12;

// Header names
pub const OPERATOR_ID_HEADER: &str = "x-operator-id";
pub const CLIENT_INFO_HEADER: &str = "X-Client-Info";
pub const ADMIN_TOKEN_HEADER: &str = "Admin-Token";
pub const CREATION_TAGS_HEADER: &str = "X-Creation-Tags";
pub const USER_SESSION_HEADER: &str = "X-User-Session";
pub const PREFER_HEADER: &str = "Prefer";
