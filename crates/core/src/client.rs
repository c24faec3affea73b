//! High-level notification client
//!
//! Wires a [`CredentialManager`] and a [`MessageSender`] together for one
//! configured application.

use std::sync::Arc;

use tracing::info;
use wecom_domain::{Message, NotifyConfig, Result};

use crate::clock::{Clock, SystemClock};
use crate::credential::{CredentialManager, CredentialStore};
use crate::messaging::{AuthErrorCodes, MessageSender};
use crate::transport_ports::Transport;

/// Client for sending notifications as one application
pub struct NotifyClient {
    manager: Arc<CredentialManager>,
    sender: MessageSender,
    agent_id: i64,
}

impl NotifyClient {
    /// Validate `config`, then acquire a credential (from `store` or the
    /// token endpoint).
    ///
    /// # Errors
    /// - `NotifyError::Config` if the configuration is invalid
    /// - `NotifyError::Persistence` if the store cannot be read
    /// - `NotifyError::Auth` if the initial token fetch fails
    pub async fn connect(
        config: &NotifyConfig,
        transport: Arc<dyn Transport>,
        store: Option<Arc<dyn CredentialStore>>,
    ) -> Result<Self> {
        Self::connect_with_clock(config, transport, store, Arc::new(SystemClock)).await
    }

    /// [`NotifyClient::connect`] with an explicit clock.
    ///
    /// # Errors
    /// See [`NotifyClient::connect`].
    pub async fn connect_with_clock(
        config: &NotifyConfig,
        transport: Arc<dyn Transport>,
        store: Option<Arc<dyn CredentialStore>>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;

        let endpoints = config.endpoints();
        let mut builder = CredentialManager::builder(config.identity.clone(), transport.clone())
            .endpoints(endpoints.clone())
            .clock(clock);
        if let Some(store) = store {
            builder = builder.store(store);
        }
        let manager = builder.build().await?;

        let sender = MessageSender::new(
            transport,
            endpoints,
            AuthErrorCodes::new(config.auth_error_codes.iter().copied()),
        );

        info!(
            corp_id = %config.identity.corp_id,
            agent_id = config.identity.agent_id,
            "Notification client ready"
        );

        Ok(Self { manager: Arc::new(manager), sender, agent_id: config.identity.agent_id })
    }

    /// Broadcast a text card to every member.
    ///
    /// # Errors
    /// See [`MessageSender::send`].
    pub async fn send_text_card(&self, title: &str, description: &str, url: &str) -> Result<()> {
        self.sender.send_text_card(&self.manager, self.agent_id, title, description, url).await
    }

    /// Send a prepared message.
    ///
    /// # Errors
    /// See [`MessageSender::send`].
    pub async fn send(&self, message: &Message) -> Result<()> {
        self.sender.send(&self.manager, message).await
    }

    /// Shared handle to the credential manager
    #[must_use]
    pub fn manager(&self) -> &Arc<CredentialManager> {
        &self.manager
    }

    /// Application the client sends as
    #[must_use]
    pub fn agent_id(&self) -> i64 {
        self.agent_id
    }
}
