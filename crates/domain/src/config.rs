//! Configuration management

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_AUTH_ERROR_CODES, DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS, MESSAGE_SEND_PATH,
    TOKEN_PATH,
};
use crate::errors::{NotifyError, Result};
use crate::types::ClientIdentity;

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    pub identity: ClientIdentity,
    /// Optional credential cache file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_path: Option<PathBuf>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// `errcode` values that mean "token invalid or expired" and trigger a
    /// renew-and-retry.
    #[serde(default = "default_auth_error_codes")]
    pub auth_error_codes: Vec<i64>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_auth_error_codes() -> Vec<i64> {
    DEFAULT_AUTH_ERROR_CODES.to_vec()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl NotifyConfig {
    /// Configuration with defaults for everything but the identity.
    #[must_use]
    pub fn new(identity: ClientIdentity) -> Self {
        Self {
            identity,
            cache_path: None,
            base_url: default_base_url(),
            auth_error_codes: default_auth_error_codes(),
            request_timeout_secs: default_request_timeout_secs(),
            log_format: LogFormat::default(),
        }
    }

    #[must_use]
    pub fn with_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_auth_error_codes(mut self, codes: impl IntoIterator<Item = i64>) -> Self {
        self.auth_error_codes = codes.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Endpoint URLs derived from `base_url`.
    #[must_use]
    pub fn endpoints(&self) -> Endpoints {
        Endpoints::new(&self.base_url)
    }

    /// Check required fields and value ranges.
    ///
    /// # Errors
    /// Returns `NotifyError::Config` describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.identity.corp_id.trim().is_empty() {
            return Err(NotifyError::Config("corp_id must not be empty".into()));
        }
        if self.identity.app_secret.trim().is_empty() {
            return Err(NotifyError::Config("app_secret must not be empty".into()));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(NotifyError::Config(format!(
                "base_url must be an http(s) URL: {}",
                self.base_url
            )));
        }
        if self.auth_error_codes.contains(&0) {
            return Err(NotifyError::Config("auth_error_codes must not contain 0".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(NotifyError::Config("request_timeout_secs must be positive".into()));
        }
        Ok(())
    }
}

/// Service endpoint URLs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base_url: String,
}

impl Endpoints {
    /// Endpoints rooted at `base_url` (a trailing `/` is ignored).
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self { base_url: base_url.trim_end_matches('/').to_string() }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Token issuance endpoint.
    #[must_use]
    pub fn token_url(&self) -> String {
        format!("{}{}", self.base_url, TOKEN_PATH)
    }

    /// Message send endpoint.
    #[must_use]
    pub fn message_send_url(&self) -> String {
        format!("{}{}", self.base_url, MESSAGE_SEND_PATH)
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = NotifyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(NotifyError::Config(format!("unknown log format: {other}"))),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
        }
    }
}
