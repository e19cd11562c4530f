//! # Basalam Infrastructure
//!
//! Service clients and I/O adapters on top of `basalam-common`.
//!
//! This crate contains:
//! - The reqwest-backed HTTP transport
//! - Configuration loading from the environment and TOML files
//! - One client per Basalam service, bundled in [`BasalamClient`]
//! - A blocking facade, [`BlockingBasalamClient`]
//!
//! ## Architecture
//! - Implements the transport port defined in `basalam-common`
//! - Depends on `basalam-common` for tokens and `basalam-domain` for models
//! - Contains all "impure" code (network, files, environment)

pub mod api;
pub mod blocking;
pub mod config;
pub mod http;
pub mod services;

// Re-export commonly used items
pub use api::{AccessTokenProvider, ApiError, ApiResult, BasalamClient, StaticToken};
pub use blocking::BlockingBasalamClient;
pub use config::{load, load_credentials_from_env, load_from_env, load_from_file};
pub use http::ReqwestTransport;
