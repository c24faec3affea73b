//! Transient wire structures exchanged with the service
//!
//! Every response carries `errcode`/`errmsg`; a zero `errcode` means success.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::constants::ERRCODE_OK;
use crate::errors::{NotifyError, Result};

/// Raw HTTP response as returned by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Create a response
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { status, body: body.into() }
    }

    /// `true` for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    /// Returns `NotifyError::Decode` if the body is not the expected shape.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| NotifyError::Decode(e.to_string()))
    }

    /// Body as (lossy) UTF-8, truncated for log and error messages.
    #[must_use]
    pub fn body_excerpt(&self) -> String {
        const LIMIT: usize = 256;
        let text = String::from_utf8_lossy(&self.body);
        match text.char_indices().nth(LIMIT) {
            Some((idx, _)) => format!("{}...", &text[..idx]),
            None => text.into_owned(),
        }
    }
}

/// Response of the token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RenewalResponse {
    pub errcode: i64,
    #[serde(default)]
    pub errmsg: String,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

impl RenewalResponse {
    /// Extract the issued token and its TTL in seconds.
    ///
    /// # Errors
    /// Returns `NotifyError::Server` for a non-zero `errcode` and
    /// `NotifyError::Decode` if a successful response lacks the token or TTL.
    pub fn into_grant(self) -> Result<(String, i64)> {
        if self.errcode != ERRCODE_OK {
            return Err(NotifyError::Server { code: self.errcode, message: self.errmsg });
        }

        let token = self
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| NotifyError::Decode("token response missing access_token".into()))?;
        let ttl = self
            .expires_in
            .ok_or_else(|| NotifyError::Decode("token response missing expires_in".into()))?;

        Ok((token, ttl))
    }
}

/// Response of the message send endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SendResponse {
    pub errcode: i64,
    #[serde(default)]
    pub errmsg: String,
    /// Recipients the service could not deliver to (`|`-separated).
    #[serde(default)]
    pub invaliduser: Option<String>,
    #[serde(default)]
    pub invalidparty: Option<String>,
    #[serde(default)]
    pub invalidtag: Option<String>,
}

impl SendResponse {
    /// `true` when `errcode` is zero.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errcode == ERRCODE_OK
    }

    /// Non-empty `invalid*` fields, as `(field, value)` pairs.
    #[must_use]
    pub fn rejected_recipients(&self) -> Vec<(&'static str, &str)> {
        [
            ("invaliduser", self.invaliduser.as_deref()),
            ("invalidparty", self.invalidparty.as_deref()),
            ("invalidtag", self.invalidtag.as_deref()),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.filter(|v| !v.is_empty()).map(|v| (field, v)))
        .collect()
    }
}
