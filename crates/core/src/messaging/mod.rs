//! Outbound messaging

pub mod sender;

pub use sender::{AuthErrorCodes, MessageSender};
