//! Conversions from external infrastructure errors into domain errors.

use std::io::{Error as IoError, ErrorKind};
use std::path::Path;

use reqwest::Error as HttpError;
use wecom_domain::NotifyError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub NotifyError);

impl From<InfraError> for NotifyError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<NotifyError> for InfraError {
    fn from(value: NotifyError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoNotifyError {
    fn into_notify(self) -> NotifyError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → NotifyError */
/* -------------------------------------------------------------------------- */

impl IntoNotifyError for HttpError {
    fn into_notify(self) -> NotifyError {
        // Display of a reqwest error includes the full URL, query included,
        // and the query carries secrets. Only the path is reported.
        let target = self.url().map(|url| url.path().to_string()).unwrap_or_default();
        let cause = self.without_url();

        if cause.is_timeout() {
            return NotifyError::Transport(format!("HTTP request to {target} timed out"));
        }

        if cause.is_connect() {
            return NotifyError::Transport(format!("HTTP connection to {target} failed"));
        }

        if cause.is_builder() {
            return NotifyError::Transport(format!("invalid HTTP request: {cause}"));
        }

        if let Some(status) = cause.status() {
            return NotifyError::Transport(format!(
                "HTTP {} {} from {target}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("unknown status")
            ));
        }

        NotifyError::Transport(format!("HTTP request to {target} failed: {cause}"))
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_notify())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → NotifyError */
/* -------------------------------------------------------------------------- */

/// Map a cache file I/O failure, naming the file and what was being done.
#[must_use]
pub fn persistence_error(action: &str, path: &Path, err: &IoError) -> NotifyError {
    let reason = match err.kind() {
        ErrorKind::PermissionDenied => "permission denied",
        ErrorKind::NotFound => "not found",
        ErrorKind::AlreadyExists => "already exists",
        _ => "I/O failure",
    };

    NotifyError::Persistence(format!("failed to {action} {}: {reason} ({err})", path.display()))
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
