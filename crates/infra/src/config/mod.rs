//! Configuration loading
//!
//! Builds [`basalam_domain::BasalamConfig`] and
//! [`basalam_domain::Credentials`] from environment variables and files.

pub mod loader;

// Re-export commonly used items
pub use loader::{
    load, load_credentials_from_env, load_from_env, load_from_file, probe_config_paths,
};
