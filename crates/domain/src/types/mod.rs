//! Domain types

pub mod credential;
pub mod identity;
pub mod message;
pub mod wire;

pub use credential::Credential;
pub use identity::ClientIdentity;
pub use message::{Message, MessageContent, Recipient, TextCard};
pub use wire::{RenewalResponse, SendResponse, TransportResponse};
