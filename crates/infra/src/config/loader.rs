//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! Whatever the source, the result is validated before it is returned.
//!
//! ## Environment Variables
//! - `WECOM_CORP_ID`: Corp ID (required)
//! - `WECOM_APP_SECRET`: Application secret (required)
//! - `WECOM_AGENT_ID`: Application agent ID (required)
//! - `WECOM_CACHE_PATH`: Credential cache file
//! - `WECOM_BASE_URL`: Service base URL
//! - `WECOM_AUTH_ERROR_CODES`: Comma-separated `errcode` values that trigger a
//!   token renewal
//! - `WECOM_REQUEST_TIMEOUT_SECS`: HTTP request timeout in seconds
//! - `WECOM_LOG_FORMAT`: `pretty` or `json`
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./wecom.toml` or `./wecom.json` (current working directory)
//! 2. `./config.toml` or `./config.json` (current working directory)
//! 3. `../wecom.toml` or `../wecom.json` (parent directory)
//! 4. Relative to executable location

use std::path::{Path, PathBuf};

use wecom_domain::{ClientIdentity, LogFormat, NotifyConfig, NotifyError, Result};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `NotifyError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - The loaded configuration fails validation
pub fn load() -> Result<NotifyConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// `WECOM_CORP_ID`, `WECOM_APP_SECRET` and `WECOM_AGENT_ID` must be present;
/// everything else falls back to its default.
///
/// # Errors
/// Returns `NotifyError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<NotifyConfig> {
    let corp_id = env_var("WECOM_CORP_ID")?;
    let app_secret = env_var("WECOM_APP_SECRET")?;
    let agent_id = env_var("WECOM_AGENT_ID").and_then(|s| {
        s.trim()
            .parse::<i64>()
            .map_err(|e| NotifyError::Config(format!("Invalid agent id: {e}")))
    })?;

    let mut config = NotifyConfig::new(ClientIdentity::new(corp_id, app_secret, agent_id));

    if let Some(path) = env_opt("WECOM_CACHE_PATH") {
        config.cache_path = Some(PathBuf::from(path));
    }
    if let Some(base_url) = env_opt("WECOM_BASE_URL") {
        config.base_url = base_url;
    }
    if let Some(codes) = env_opt("WECOM_AUTH_ERROR_CODES") {
        config.auth_error_codes = parse_code_list(&codes)?;
    }
    if let Some(secs) = env_opt("WECOM_REQUEST_TIMEOUT_SECS") {
        config.request_timeout_secs = secs
            .trim()
            .parse::<u64>()
            .map_err(|e| NotifyError::Config(format!("Invalid request timeout: {e}")))?;
    }
    if let Some(format) = env_opt("WECOM_LOG_FORMAT") {
        config.log_format = format.parse::<LogFormat>()?;
    }

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `NotifyError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - The loaded configuration fails validation
pub fn load_from_file(path: Option<PathBuf>) -> Result<NotifyConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(NotifyError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            NotifyError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| NotifyError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<NotifyConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| NotifyError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| NotifyError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(NotifyError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches the current working directory, its parent, and the executable's
/// directory for `wecom.{toml,json}` and `config.{toml,json}`.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    const NAMES: [&str; 4] = ["wecom.toml", "wecom.json", "config.toml", "config.json"];

    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd.clone());
        dirs.push(cwd.join(".."));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
///
/// # Errors
/// Returns `NotifyError::Config` if the variable is not set or empty.
fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| {
        NotifyError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Optional environment variable; empty counts as unset.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Parse a comma-separated list of error codes, e.g. `40014,42001`.
fn parse_code_list(raw: &str) -> Result<Vec<i64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i64>()
                .map_err(|e| NotifyError::Config(format!("Invalid auth error code '{part}': {e}")))
        })
        .collect()
}
