//! Message sending with renew-and-retry on rejected tokens
//!
//! A send makes at most two POSTs. If the service rejects the token with one
//! of the configured auth-error codes, the credential is renewed and the same
//! payload is posted exactly once more. A second rejection is a hard error.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use wecom_domain::constants::{DEFAULT_AUTH_ERROR_CODES, JSON_CONTENT_TYPE};
use wecom_domain::{Endpoints, Message, NotifyError, Result, SendResponse};

use crate::credential::CredentialManager;
use crate::transport_ports::Transport;

/// `errcode` values meaning "token invalid or expired"
///
/// These codes are specific to one service, so they are configuration rather
/// than constants. The default is `{40014, 42001}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthErrorCodes(BTreeSet<i64>);

impl AuthErrorCodes {
    #[must_use]
    pub fn new(codes: impl IntoIterator<Item = i64>) -> Self {
        Self(codes.into_iter().collect())
    }

    #[must_use]
    pub fn contains(&self, code: i64) -> bool {
        self.0.contains(&code)
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.0.iter().copied()
    }
}

impl Default for AuthErrorCodes {
    fn default() -> Self {
        Self::new(DEFAULT_AUTH_ERROR_CODES)
    }
}

/// Outcome of one POST that did not fail outright.
enum Attempt {
    Delivered,
    TokenRejected { code: i64, message: String },
}

/// Sends messages using the token held by a [`CredentialManager`]
pub struct MessageSender {
    transport: Arc<dyn Transport>,
    endpoints: Endpoints,
    auth_error_codes: AuthErrorCodes,
}

impl MessageSender {
    #[must_use]
    pub fn new(
        transport: Arc<dyn Transport>,
        endpoints: Endpoints,
        auth_error_codes: AuthErrorCodes,
    ) -> Self {
        Self { transport, endpoints, auth_error_codes }
    }

    #[must_use]
    pub fn auth_error_codes(&self) -> &AuthErrorCodes {
        &self.auth_error_codes
    }

    /// Broadcast a text card from `agent_id`.
    ///
    /// # Errors
    /// See [`MessageSender::send`].
    pub async fn send_text_card(
        &self,
        manager: &CredentialManager,
        agent_id: i64,
        title: &str,
        description: &str,
        url: &str,
    ) -> Result<()> {
        let message = Message::text_card(agent_id, title, description, url);
        self.send(manager, &message).await
    }

    /// Send `message`, renewing the token and retrying once if it is rejected.
    ///
    /// An expired token is renewed before the first POST. That renewal is
    /// best-effort: if it fails the POST still goes out and the service's own
    /// answer decides the outcome.
    ///
    /// # Errors
    /// - `NotifyError::Encode` if the message cannot be serialized
    /// - `NotifyError::Transport` / `NotifyError::Decode` from either POST
    /// - the renewal error if renewing after a rejected token fails
    /// - `NotifyError::Server` for any other non-zero `errcode`, or for a
    ///   rejected token on the retry
    #[instrument(skip_all, fields(msgtype = message.msg_type(), agent_id = message.agent_id))]
    pub async fn send(&self, manager: &CredentialManager, message: &Message) -> Result<()> {
        if manager.is_expired().await {
            if let Err(e) = manager.renew().await {
                warn!(error = %e, "Pre-send token renewal failed, sending with current token");
            }
        }

        let body = message.to_wire_format()?;

        let (code, errmsg) = match self.attempt(manager, &body).await? {
            Attempt::Delivered => return Ok(()),
            Attempt::TokenRejected { code, message } => (code, message),
        };

        info!(code, errmsg = %errmsg, "Access token rejected, renewing and retrying once");
        manager.renew().await?;

        match self.attempt(manager, &body).await? {
            Attempt::Delivered => Ok(()),
            Attempt::TokenRejected { code, message } => {
                warn!(code, errmsg = %message, "Access token rejected again after renewal");
                Err(NotifyError::Server { code, message })
            }
        }
    }

    async fn attempt(&self, manager: &CredentialManager, body: &[u8]) -> Result<Attempt> {
        let token = manager.current_token().await;
        let url = self.endpoints.message_send_url();

        debug!(url = %url, bytes = body.len(), "Posting message");
        let response = self
            .transport
            .post(&url, &[("access_token", token.as_str())], body.to_vec(), JSON_CONTENT_TYPE)
            .await?;

        if !response.is_success() {
            return Err(NotifyError::Transport(format!(
                "send endpoint returned HTTP {}: {}",
                response.status,
                response.body_excerpt()
            )));
        }

        let decoded: SendResponse = response.decode()?;

        if decoded.is_ok() {
            for (field, recipients) in decoded.rejected_recipients() {
                warn!(field, recipients, "Service did not deliver to some recipients");
            }
            info!("Message delivered");
            return Ok(Attempt::Delivered);
        }

        if self.auth_error_codes.contains(decoded.errcode) {
            return Ok(Attempt::TokenRejected { code: decoded.errcode, message: decoded.errmsg });
        }

        Err(NotifyError::Server { code: decoded.errcode, message: decoded.errmsg })
    }
}
