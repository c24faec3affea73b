//! Credential manager with lazy renewal
//!
//! Manages the access-token lifecycle:
//! - Adoption of a cached credential at construction
//! - Initial fetch when no usable cached credential exists
//! - Expiry checks against an injectable clock
//! - Renewal with write-through to the credential store
//!
//! There is no background refresh task. Callers check validity before use
//! (see `MessageSender`), which keeps the credential single-writer.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};
use wecom_domain::{ClientIdentity, Credential, Endpoints, NotifyError, RenewalResponse, Result};

use super::ports::CredentialStore;
use crate::clock::{Clock, SystemClock};
use crate::transport_ports::Transport;

/// Owner of the current access credential
///
/// `renew` is the only writer. It holds a dedicated lock for the whole
/// fetch/swap/persist sequence, so concurrent renewals and their store writes
/// are serialized. Readers see either the old or the new credential, never a
/// mix of the two.
pub struct CredentialManager {
    identity: ClientIdentity,
    endpoints: Endpoints,
    transport: Arc<dyn Transport>,
    store: Option<Arc<dyn CredentialStore>>,
    clock: Arc<dyn Clock>,
    current: RwLock<Credential>,
    renew_lock: Mutex<()>,
}

impl CredentialManager {
    /// Start building a credential manager.
    #[must_use]
    pub fn builder(
        identity: ClientIdentity,
        transport: Arc<dyn Transport>,
    ) -> CredentialManagerBuilder {
        CredentialManagerBuilder {
            identity,
            transport,
            endpoints: Endpoints::default(),
            store: None,
            clock: Arc::new(SystemClock),
        }
    }

    /// `true` once the current time is strictly after the credential's expiry.
    pub async fn is_expired(&self) -> bool {
        self.current.read().await.is_expired_at(self.clock.now())
    }

    /// Fetch a fresh credential and replace the current one.
    ///
    /// The new credential is written to the store if one is configured. A
    /// failed write is logged and does not fail the renewal; the next renewal
    /// overwrites the store anyway.
    ///
    /// # Errors
    /// - `NotifyError::Transport` if the token endpoint cannot be reached
    /// - `NotifyError::Decode` if the response is malformed
    /// - `NotifyError::Server` if the service reports a non-zero `errcode`
    pub async fn renew(&self) -> Result<()> {
        let _guard = self.renew_lock.lock().await;

        let credential = fetch_credential(
            self.transport.as_ref(),
            &self.endpoints,
            &self.identity,
            self.clock.as_ref(),
        )
        .await?;

        let expires_at = credential.expires_at();
        *self.current.write().await = credential.clone();
        persist(self.store.as_deref(), &credential).await;

        info!(%expires_at, "Access token renewed");
        Ok(())
    }

    /// Renew only if the current credential has expired.
    ///
    /// # Errors
    /// Returns the renewal error, see [`CredentialManager::renew`].
    pub async fn ensure_valid(&self) -> Result<()> {
        if self.is_expired().await {
            debug!("Access token expired, renewing");
            self.renew().await?;
        }
        Ok(())
    }

    /// Current token, regardless of expiry.
    ///
    /// Callers that need a usable token should call
    /// [`CredentialManager::ensure_valid`] first.
    pub async fn current_token(&self) -> String {
        self.current.read().await.token().to_string()
    }

    /// Snapshot of the current credential
    pub async fn credential(&self) -> Credential {
        self.current.read().await.clone()
    }

    /// Seconds until the current credential expires (negative once expired)
    pub async fn seconds_until_expiry(&self) -> i64 {
        self.current.read().await.seconds_until_expiry_at(self.clock.now())
    }

    #[must_use]
    pub fn identity(&self) -> &ClientIdentity {
        &self.identity
    }

    #[must_use]
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }
}

/// Builder for [`CredentialManager`].
pub struct CredentialManagerBuilder {
    identity: ClientIdentity,
    transport: Arc<dyn Transport>,
    endpoints: Endpoints,
    store: Option<Arc<dyn CredentialStore>>,
    clock: Arc<dyn Clock>,
}

impl CredentialManagerBuilder {
    #[must_use]
    pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Persist credentials through `store` and try it before fetching.
    #[must_use]
    pub fn store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Produce a ready manager.
    ///
    /// A non-expired credential from the store is adopted as is. Otherwise a
    /// credential is fetched from the token endpoint.
    ///
    /// # Errors
    /// - `NotifyError::Persistence` if the store holds data that cannot be read
    /// - `NotifyError::Auth` wrapping the cause if the initial fetch fails
    pub async fn build(self) -> Result<CredentialManager> {
        let cached = match &self.store {
            Some(store) => store.load().await?,
            None => None,
        };

        let credential = match cached {
            Some(credential) if !credential.is_expired_at(self.clock.now()) => {
                info!(expires_at = %credential.expires_at(), "Using cached access token");
                credential
            }
            cached => {
                if cached.is_some() {
                    debug!("Cached access token expired, fetching a new one");
                } else {
                    debug!("No cached access token, fetching a new one");
                }

                let credential = fetch_credential(
                    self.transport.as_ref(),
                    &self.endpoints,
                    &self.identity,
                    self.clock.as_ref(),
                )
                .await
                .map_err(NotifyError::auth)?;
                persist(self.store.as_deref(), &credential).await;

                info!(expires_at = %credential.expires_at(), "Access token acquired");
                credential
            }
        };

        Ok(CredentialManager {
            identity: self.identity,
            endpoints: self.endpoints,
            transport: self.transport,
            store: self.store,
            clock: self.clock,
            current: RwLock::new(credential),
            renew_lock: Mutex::new(()),
        })
    }
}

/// Request a credential from the token endpoint.
async fn fetch_credential(
    transport: &dyn Transport,
    endpoints: &Endpoints,
    identity: &ClientIdentity,
    clock: &dyn Clock,
) -> Result<Credential> {
    let url = endpoints.token_url();
    let query =
        [("corpid", identity.corp_id.as_str()), ("corpsecret", identity.app_secret.as_str())];

    debug!(url = %url, corp_id = %identity.corp_id, "Requesting access token");
    let response = transport.get(&url, &query).await?;

    if !response.is_success() {
        return Err(NotifyError::Transport(format!(
            "token endpoint returned HTTP {}: {}",
            response.status,
            response.body_excerpt()
        )));
    }

    let (token, ttl_seconds) = response.decode::<RenewalResponse>()?.into_grant()?;
    debug!(ttl_seconds, "Token endpoint issued access token");

    Credential::issued(token, clock.now(), ttl_seconds)
}

/// Best-effort write-through; the in-memory credential stays authoritative.
async fn persist(store: Option<&dyn CredentialStore>, credential: &Credential) {
    if let Some(store) = store {
        if let Err(e) = store.save(credential).await {
            warn!(error = %e, "Failed to persist access token; keeping it in memory only");
        }
    }
}
