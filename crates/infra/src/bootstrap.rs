//! Wiring of the concrete adapters into a [`NotifyClient`]

use std::sync::Arc;

use wecom_core::{CredentialStore, NotifyClient};
use wecom_domain::{NotifyConfig, Result};

use crate::config;
use crate::http::HttpTransport;
use crate::store::FileCredentialStore;

/// Build a client backed by reqwest and, if `cache_path` is set, a cache file.
///
/// # Errors
/// Any error from [`NotifyClient::connect`], or `NotifyError::Transport` if
/// the HTTP client cannot be built.
pub async fn connect(config: &NotifyConfig) -> Result<NotifyClient> {
    let transport = Arc::new(HttpTransport::from_config(config)?);
    let store = config
        .cache_path
        .as_ref()
        .map(|path| Arc::new(FileCredentialStore::new(path)) as Arc<dyn CredentialStore>);

    NotifyClient::connect(config, transport, store).await
}

/// [`connect`] with configuration from [`config::load`].
///
/// # Errors
/// `NotifyError::Config` if no usable configuration is found, otherwise as
/// [`connect`].
pub async fn connect_from_env() -> Result<NotifyClient> {
    let config = config::load()?;
    connect(&config).await
}
