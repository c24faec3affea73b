//! Port interfaces for credential persistence

use async_trait::async_trait;
use wecom_domain::{Credential, Result};

/// Trait for durable storage of the current credential
///
/// Implementations hold a serialized copy only; the in-memory credential is
/// owned by the `CredentialManager`.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Load the stored credential.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet.
    ///
    /// # Errors
    /// Returns `NotifyError::Persistence` if stored data exists but cannot be
    /// read.
    async fn load(&self) -> Result<Option<Credential>>;

    /// Replace the stored credential.
    ///
    /// # Errors
    /// Returns `NotifyError::Persistence` if the write fails.
    async fn save(&self, credential: &Credential) -> Result<()>;
}
