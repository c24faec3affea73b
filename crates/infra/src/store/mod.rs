//! Credential store adapters

pub mod file;

pub use file::FileCredentialStore;
