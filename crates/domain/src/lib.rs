//! # Basalam Domain
//!
//! Configuration and wire models for the Basalam service APIs.
//!
//! This crate contains:
//! - `BasalamConfig`, `Environment` and `Service` host resolution
//! - Client `Credentials`
//! - Typed request builders and response models per service
//! - Domain error types and Result definitions
//!
//! ## Architecture
//! - No dependencies on other Basalam crates
//! - No I/O; requests are validated and serialized here, sent by `basalam-infra`

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

pub use config::*;
pub use errors::*;
