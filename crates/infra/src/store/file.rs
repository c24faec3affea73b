//! File-backed credential cache
//!
//! The cache is a single line `token,YYYY-MM-DD HH:MM:SS` with the expiry in
//! local time. Every save rewrites the whole file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use wecom_core::CredentialStore;
use wecom_domain::{Credential, Result};

use crate::errors::persistence_error;

/// Credential cache kept in one local file
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    /// A missing file is "no credential". Content that does not parse is
    /// logged and also treated as "no credential", so the caller fetches a
    /// fresh token and overwrites it.
    async fn load(&self) -> Result<Option<Credential>> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No credential cache file");
                return Ok(None);
            }
            Err(e) => return Err(persistence_error("read", &self.path, &e)),
        };

        let parsed = String::from_utf8(bytes)
            .map_err(|e| e.to_string())
            .and_then(|text| {
                let line = text.lines().next().unwrap_or_default();
                Credential::from_cache_line(line).map_err(|e| e.to_string())
            });

        match parsed {
            Ok(credential) => {
                debug!(
                    path = %self.path.display(),
                    expires_at = %credential.expires_at(),
                    "Loaded cached credential"
                );
                Ok(Some(credential))
            }
            Err(reason) => {
                warn!(path = %self.path.display(), %reason, "Ignoring malformed credential cache");
                Ok(None)
            }
        }
    }

    async fn save(&self, credential: &Credential) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| persistence_error("create directory for", &self.path, &e))?;
        }

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options
            .open(&self.path)
            .await
            .map_err(|e| persistence_error("open", &self.path, &e))?;

        let line = format!("{}\n", credential.to_cache_line());
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| persistence_error("write", &self.path, &e))?;
        file.flush().await.map_err(|e| persistence_error("flush", &self.path, &e))?;

        debug!(path = %self.path.display(), "Credential cache written");
        Ok(())
    }
}
