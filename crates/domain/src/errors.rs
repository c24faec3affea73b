//! Error types used throughout the workspace

use thiserror::Error;

/// Main error type for wecom-notify
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The credential cache exists but could not be read or written.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// The service could not be reached, or answered with an unexpected HTTP status.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A response body did not match the expected JSON shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// An outbound payload could not be serialized.
    #[error("Encode error: {0}")]
    Encode(String),

    /// The service answered with a non-zero `errcode`.
    #[error("Server error {code}: {message}")]
    Server { code: i64, message: String },

    /// The initial credential fetch performed while constructing a client failed.
    #[error("Authentication failed: {source}")]
    Auth {
        #[source]
        source: Box<NotifyError>,
    },

    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl NotifyError {
    /// Wrap an error as the cause of a failed initial authentication.
    #[must_use]
    pub fn auth(source: NotifyError) -> Self {
        Self::Auth { source: Box::new(source) }
    }

    /// Stable label for structured logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Persistence(_) => "persistence",
            Self::Transport(_) => "transport",
            Self::Decode(_) => "decode",
            Self::Encode(_) => "encode",
            Self::Server { .. } => "server",
            Self::Auth { .. } => "auth",
            Self::Config(_) => "config",
        }
    }

    /// The application error code, if the service reported one.
    ///
    /// Looks through `Auth` so callers can inspect why construction failed.
    #[must_use]
    pub fn server_code(&self) -> Option<i64> {
        match self {
            Self::Server { code, .. } => Some(*code),
            Self::Auth { source } => source.server_code(),
            _ => None,
        }
    }
}

/// Result type alias for wecom-notify operations
pub type Result<T> = std::result::Result<T, NotifyError>;
