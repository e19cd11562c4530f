//! Configuration loader
//!
//! Loads SDK configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `BASALAM_ENVIRONMENT` is not set, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//! 5. With neither source present, uses the production defaults
//!
//! ## Environment Variables
//! - `BASALAM_ENVIRONMENT`: `production` or `development` (required for env loading)
//! - `BASALAM_TIMEOUT`: Request timeout in seconds
//! - `BASALAM_REFRESH_MARGIN`: Seconds before expiry at which tokens are refreshed
//! - `BASALAM_USER_AGENT`: `User-Agent` header value
//! - `BASALAM_TOKEN_URL`: Token endpoint override
//! - `BASALAM_AUTHORIZE_URL`: Consent page override
//! - `BASALAM_BASE_URL`: Base URL used for every service (e.g. a local mock)
//! - `BASALAM_<SERVICE>_URL`: Base URL of one service, e.g. `BASALAM_WALLET_URL`
//!
//! Credentials are loaded separately by [`load_credentials_from_env`] from
//! `BASALAM_CLIENT_ID`, `BASALAM_CLIENT_SECRET`, `BASALAM_REDIRECT_URI` and
//! `BASALAM_SCOPES`.
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./basalam.toml` or `./basalam.json` (current working directory)
//! 2. `./config.toml` or `./config.json` (current working directory)
//! 3. The same names in the parent directory
//! 4. Relative to executable location

use std::path::{Path, PathBuf};
use std::time::Duration;

use basalam_domain::{BasalamConfig, Credentials, DomainError, Environment, Result, Service};

const CONFIG_FILE_NAMES: [&str; 4] = ["basalam.toml", "basalam.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If
/// `BASALAM_ENVIRONMENT` is missing, falls back to a config file, and to
/// [`BasalamConfig::default`] when no file exists either.
///
/// # Errors
/// Returns `DomainError::Config` if:
/// - A variable or file is present but invalid
/// - The resulting configuration fails validation
pub fn load() -> Result<BasalamConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) if std::env::var("BASALAM_ENVIRONMENT").is_ok() => Err(e),
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            match probe_config_paths() {
                Some(path) => load_from_file(Some(path)),
                None => {
                    tracing::debug!("No config file found, using production defaults");
                    Ok(BasalamConfig::default())
                }
            }
        }
    }
}

/// Load configuration from environment variables
///
/// `BASALAM_ENVIRONMENT` must be present; every other variable is optional
/// and overrides the environment's default.
///
/// # Environment Variables
/// See module documentation for the complete list.
///
/// # Errors
/// Returns `DomainError::Config` if `BASALAM_ENVIRONMENT` is missing or any
/// variable has an invalid value.
pub fn load_from_env() -> Result<BasalamConfig> {
    let environment: Environment = env_var("BASALAM_ENVIRONMENT")?.parse()?;
    let mut config = BasalamConfig::new(environment);

    if let Some(timeout) = env_u64("BASALAM_TIMEOUT")? {
        config = config.with_timeout(Duration::from_secs(timeout));
    }
    if let Some(margin) = env_u64("BASALAM_REFRESH_MARGIN")? {
        config = config.with_refresh_margin(Duration::from_secs(margin));
    }
    if let Some(agent) = env_opt("BASALAM_USER_AGENT") {
        config = config.with_user_agent(agent);
    }
    if let Some(url) = env_opt("BASALAM_TOKEN_URL") {
        config = config.with_token_url(url);
    }
    if let Some(url) = env_opt("BASALAM_AUTHORIZE_URL") {
        config = config.with_authorize_url(url);
    }
    if let Some(url) = env_opt("BASALAM_BASE_URL") {
        config = config.with_base_url(&url);
    }
    for service in Service::ALL {
        let key = format!("BASALAM_{}_URL", service.as_str().to_ascii_uppercase());
        if let Some(url) = env_opt(&key) {
            config = config.with_service_url(service, url);
        }
    }

    config.validate()?;
    Ok(config)
}

/// Load OAuth client credentials from environment variables
///
/// `BASALAM_SCOPES` accepts space- or comma-separated scope names.
///
/// # Errors
/// Returns `DomainError::Config` if the client id or secret is missing.
pub fn load_credentials_from_env() -> Result<Credentials> {
    let mut credentials =
        Credentials::new(env_var("BASALAM_CLIENT_ID")?, env_var("BASALAM_CLIENT_SECRET")?);
    if let Some(uri) = env_opt("BASALAM_REDIRECT_URI") {
        credentials = credentials.with_redirect_uri(uri);
    }
    if let Some(scopes) = env_opt("BASALAM_SCOPES") {
        credentials = credentials.with_scopes(Credentials::parse_scopes(&scopes));
    }
    credentials.validate()?;
    Ok(credentials)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Arguments
/// * `path` - Optional path to config file. If `None`, uses
///   [`probe_config_paths`].
///
/// # Errors
/// Returns `DomainError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - The parsed configuration fails validation
pub fn load_from_file(path: Option<PathBuf>) -> Result<BasalamConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(DomainError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            DomainError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| DomainError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<BasalamConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| DomainError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| DomainError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(DomainError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches the current working directory, its parent, and the executable's
/// directory for `basalam.{toml,json}` and `config.{toml,json}`.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd.clone());
        roots.push(cwd.join(".."));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
///
/// # Errors
/// Returns `DomainError::Config` if the variable is not set or empty.
fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| {
        DomainError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Non-empty value of an optional environment variable
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn env_u64(key: &str) -> Result<Option<u64>> {
    env_opt(key)
        .map(|raw| {
            raw.parse::<u64>()
                .map_err(|e| DomainError::Config(format!("Invalid value for {key}: {e}")))
        })
        .transpose()
}
