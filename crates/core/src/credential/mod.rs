//! Access credential lifecycle

pub mod manager;
pub mod ports;

pub use manager::{CredentialManager, CredentialManagerBuilder};
pub use ports::CredentialStore;
