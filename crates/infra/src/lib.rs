//! # wecom-infra
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - `HttpTransport`: reqwest implementation of `Transport`
//! - `FileCredentialStore`: single-line credential cache file
//! - Configuration loading from environment variables and files
//! - `tracing` subscriber setup
//!
//! ## Architecture
//! - Implements traits defined in `wecom-core`
//! - Contains all "impure" code (network and filesystem I/O)

pub mod bootstrap;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;
pub mod store;

// Re-export commonly used items
pub use bootstrap::{connect, connect_from_env};
pub use errors::InfraError;
pub use http::{HttpTransport, HttpTransportBuilder};
pub use observability::init_tracing;
pub use store::FileCredentialStore;
