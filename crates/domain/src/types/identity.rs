//! Static identity of the calling application

use std::fmt;

use serde::{Deserialize, Serialize};

/// Corp-level identity used to request access tokens.
///
/// Immutable for the lifetime of a client. The app secret is never written
/// back out by serialization and is redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientIdentity {
    /// Corp ID (`corpid`).
    pub corp_id: String,
    /// Application secret (`corpsecret`).
    #[serde(skip_serializing)]
    pub app_secret: String,
    /// Registered application that sends messages (`agentid`).
    pub agent_id: i64,
}

impl ClientIdentity {
    /// Create a new identity
    #[must_use]
    pub fn new(corp_id: impl Into<String>, app_secret: impl Into<String>, agent_id: i64) -> Self {
        Self { corp_id: corp_id.into(), app_secret: app_secret.into(), agent_id }
    }
}

impl fmt::Debug for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientIdentity")
            .field("corp_id", &self.corp_id)
            .field("app_secret", &"<redacted>")
            .field("agent_id", &self.agent_id)
            .finish()
    }
}
