//! # wecom-core
//!
//! Credential lifecycle and send protocol - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (traits) for the transport, credential store and clock
//! - `CredentialManager`: cached token, expiry checks, renewal
//! - `MessageSender`: send with a single renew-and-retry on rejected tokens
//! - `NotifyClient`: both of the above wired for one application
//!
//! ## Architecture Principles
//! - Only depends on `wecom-domain`
//! - No HTTP or filesystem code
//! - All external dependencies via traits

pub mod client;
pub mod clock;
pub mod credential;
pub mod messaging;

// Infrastructure ports
pub mod transport_ports;

// Re-export specific items to avoid ambiguity
pub use client::NotifyClient;
pub use clock::{Clock, SystemClock};
pub use credential::{CredentialManager, CredentialManagerBuilder, CredentialStore};
pub use messaging::{AuthErrorCodes, MessageSender};
pub use transport_ports::Transport;
