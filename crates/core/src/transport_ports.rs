//! Port interface for the HTTP transport
//!
//! The transport performs exactly one request per call. Retry policy belongs
//! to the credential manager and the message sender, never to the transport.

use async_trait::async_trait;
use wecom_domain::{Result, TransportResponse};

/// Trait for issuing GET/POST requests against the service
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET request with the given query parameters.
    ///
    /// # Errors
    /// Returns `NotifyError::Transport` if the request could not be completed.
    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<TransportResponse>;

    /// Issue a POST request with the given query parameters and body.
    ///
    /// # Errors
    /// Returns `NotifyError::Transport` if the request could not be completed.
    async fn post(
        &self,
        url: &str,
        query: &[(&str, &str)],
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<TransportResponse>;
}
