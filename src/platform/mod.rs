pub mod telegram;

use async_trait::async_trait;
use thiserror::Error;

use crate::reply::OutboundReply;

/// A normalized event received from the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// A text message (or a reply keyboard tap, which arrives as the label text)
    Text {
        chat_id: String,
        raw_text: String,
        sender: String,
    },
    /// An inline keyboard button press
    Callback {
        chat_id: String,
        callback_key: String,
        sender: String,
    },
}

impl InboundEvent {
    pub fn chat_id(&self) -> &str {
        match self {
            InboundEvent::Text { chat_id, .. } | InboundEvent::Callback { chat_id, .. } => chat_id,
        }
    }

    pub fn sender(&self) -> &str {
        match self {
            InboundEvent::Text { sender, .. } | InboundEvent::Callback { sender, .. } => sender,
        }
    }
}

/// The platform could not deliver a reply.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct SendFailure {
    pub message: String,
}

impl SendFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Delivers replies to the platform.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, reply: &OutboundReply) -> Result<(), SendFailure>;
}

/// First and last name joined by a single space, verbatim.
/// A missing last name leaves a trailing space.
pub fn display_name(first_name: &str, last_name: Option<&str>) -> String {
    format!("{} {}", first_name, last_name.unwrap_or_default())
}
