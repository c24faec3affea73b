//! Outbound message shapes
//!
//! Messages are a closed set of variants. Adding a message kind means adding a
//! [`MessageContent`] variant; the wire envelope (`touser`, `msgtype`,
//! `agentid`) is shared.

use serde::{Serialize, Serializer};

use crate::constants::{BROADCAST_RECIPIENT, MSGTYPE_TEXTCARD};
use crate::errors::{NotifyError, Result};

/// Who receives a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Recipient {
    /// Every member visible to the application.
    #[default]
    All,
}

impl Recipient {
    /// Wire value of the `touser` field.
    #[must_use]
    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::All => BROADCAST_RECIPIENT,
        }
    }
}

impl Serialize for Recipient {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_wire())
    }
}

/// Card with a title, a description and a clickable link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextCard {
    pub title: String,
    pub description: String,
    pub url: String,
    /// Label of the link button; empty lets the client pick its default.
    #[serde(rename = "btntxt")]
    pub button_text: String,
}

/// Message body, keyed on the wire by its `msgtype`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MessageContent {
    #[serde(rename = "textcard")]
    TextCard(TextCard),
}

impl MessageContent {
    /// Wire value of the `msgtype` discriminator.
    #[must_use]
    pub fn msg_type(&self) -> &'static str {
        match self {
            Self::TextCard(_) => MSGTYPE_TEXTCARD,
        }
    }
}

/// A message ready to be sent by one application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub agent_id: i64,
    pub recipient: Recipient,
    pub content: MessageContent,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    touser: Recipient,
    msgtype: &'static str,
    agentid: i64,
    #[serde(flatten)]
    content: &'a MessageContent,
}

impl Message {
    /// Build a text card broadcast to every member.
    #[must_use]
    pub fn text_card(
        agent_id: i64,
        title: impl Into<String>,
        description: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            agent_id,
            recipient: Recipient::All,
            content: MessageContent::TextCard(TextCard {
                title: title.into(),
                description: description.into(),
                url: url.into(),
                button_text: String::new(),
            }),
        }
    }

    /// Wire value of the `msgtype` discriminator.
    #[must_use]
    pub fn msg_type(&self) -> &'static str {
        self.content.msg_type()
    }

    /// Serialize to the JSON body expected by the send endpoint.
    ///
    /// # Errors
    /// Returns `NotifyError::Encode` if serialization fails.
    pub fn to_wire_format(&self) -> Result<Vec<u8>> {
        let wire = WireMessage {
            touser: self.recipient,
            msgtype: self.msg_type(),
            agentid: self.agent_id,
            content: &self.content,
        };

        serde_json::to_vec(&wire).map_err(|e| NotifyError::Encode(e.to_string()))
    }
}
