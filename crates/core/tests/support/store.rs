use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use wecom_core::CredentialStore;
use wecom_domain::{Credential, NotifyError, Result as DomainResult};

/// In-memory `CredentialStore` with switchable failures.
#[derive(Default)]
pub struct MemoryCredentialStore {
    saved: Mutex<Option<Credential>>,
    fail_load: AtomicBool,
    fail_save: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `credential`.
    pub fn with_credential(credential: Credential) -> Self {
        let store = Self::default();
        *store.saved.lock().unwrap() = Some(credential);
        store
    }

    pub fn failing_load(self) -> Self {
        self.fail_load.store(true, Ordering::SeqCst);
        self
    }

    pub fn failing_save(self) -> Self {
        self.fail_save.store(true, Ordering::SeqCst);
        self
    }

    pub fn saved(&self) -> Option<Credential> {
        self.saved.lock().unwrap().clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn load(&self) -> DomainResult<Option<Credential>> {
        if self.fail_load.load(Ordering::SeqCst) {
            return Err(NotifyError::Persistence("permission denied".to_string()));
        }
        Ok(self.saved.lock().unwrap().clone())
    }

    async fn save(&self, credential: &Credential) -> DomainResult<()> {
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(NotifyError::Persistence("read-only filesystem".to_string()));
        }
        *self.saved.lock().unwrap() = Some(credential.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
