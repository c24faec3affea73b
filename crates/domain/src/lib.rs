//! # wecom-domain
//!
//! Domain types and models for wecom-notify.
//!
//! This crate contains:
//! - The access credential and its cache-file codec
//! - Client identity and configuration structures
//! - Outbound message shapes and their wire encoding
//! - Wire response types and the shared error type
//!
//! ## Architecture
//! - No dependencies on other wecom-notify crates
//! - No I/O: pure data and conversions

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
