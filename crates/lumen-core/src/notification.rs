//! Notification payload model - what the fan-out engine hands to the push gateway

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{AttachmentContent, BannerEvent, ForwardedContent, Message, MessageData};
use crate::value_objects::Snowflake;

/// Click action routing all chat notifications to the inbox
pub const INBOX_CLICK_ACTION: &str = "OPEN_INBOX";
/// Time-to-live for rich chat notifications
pub const MESSAGE_TTL_SECS: u32 = 24 * 60 * 60;
/// Notification channel for chat messages
pub const MESSAGE_CHANNEL: &str = "messages";

/// Broadcast topic an account's devices subscribe to
pub fn broadcast_topic(account_id: Snowflake) -> String {
    format!("accounts.{account_id}")
}

/// Payload dispatched per recipient: visible notification or data-only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PushPayload {
    /// Visible notification plus the message data
    Rich {
        notification: PushNotification,
        data: MessagePush,
        options: DispatchOptions,
    },
    /// Data-only payload for pending participants and the sender's other devices
    Silent {
        data: MessagePush,
        options: DispatchOptions,
    },
}

impl PushPayload {
    /// Rich payload: high priority, 24h TTL, inbox click action
    pub fn rich(title: String, body: String, image_url: Option<String>, data: MessagePush) -> Self {
        Self::Rich {
            notification: PushNotification {
                title,
                body,
                image_url,
                click_action: INBOX_CLICK_ACTION.to_string(),
            },
            data,
            options: DispatchOptions {
                priority: PushPriority::High,
                ttl_secs: MESSAGE_TTL_SECS,
                channel: MESSAGE_CHANNEL.to_string(),
            },
        }
    }

    /// Silent payload: same data, nothing visible
    pub fn silent(data: MessagePush) -> Self {
        Self::Silent {
            data,
            options: DispatchOptions {
                priority: PushPriority::Normal,
                ttl_secs: MESSAGE_TTL_SECS,
                channel: MESSAGE_CHANNEL.to_string(),
            },
        }
    }

    pub fn data(&self) -> &MessagePush {
        match self {
            Self::Rich { data, .. } | Self::Silent { data, .. } => data,
        }
    }

    #[inline]
    pub fn is_rich(&self) -> bool {
        matches!(self, Self::Rich { .. })
    }
}

/// Visible notification fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushNotification {
    pub title: String,
    pub body: String,
    pub image_url: Option<String>,
    pub click_action: String,
}

/// Delivery metadata carried opaquely to the transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchOptions {
    pub priority: PushPriority,
    pub ttl_secs: u32,
    pub channel: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PushPriority {
    High,
    Normal,
}

/// Flattened message data carried in every payload
///
/// `attachment` is the only field subject to per-recipient privacy
/// redaction; id, author, timestamp, and caption always survive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessagePush {
    pub message_id: Snowflake,
    pub chat_id: Snowflake,
    pub author_id: Snowflake,
    pub sent_at: DateTime<Utc>,
    pub text: Option<String>,
    pub caption: Option<String>,
    pub reply_to: Option<Snowflake>,
    pub attachment: Option<AttachmentContent>,
    pub banner: Option<BannerEvent>,
}

impl MessagePush {
    /// Build the data payload from a message, exhaustively per variant
    pub fn from_message(message: &Message) -> Self {
        let mut push = Self {
            message_id: message.id,
            chat_id: message.chat_id,
            author_id: message.sender_id,
            sent_at: message.sent_at,
            text: None,
            caption: None,
            reply_to: None,
            attachment: None,
            banner: None,
        };

        match &message.data {
            MessageData::Text(text) => {
                push.text = Some(text.text.clone());
            }
            MessageData::Reply(reply) => {
                push.text = Some(reply.text.text.clone());
                push.reply_to = Some(reply.replied.message_id);
                if let ForwardedContent::Attachment(att) = &reply.forwarded {
                    push.caption = att.caption.as_ref().map(|c| c.text.clone());
                    push.attachment = Some(att.clone());
                }
            }
            MessageData::Attachment(att) => {
                push.caption = att.caption.as_ref().map(|c| c.text.clone());
                push.attachment = Some(att.clone());
            }
            MessageData::Banner(banner) => {
                push.banner = Some(banner.event.clone());
            }
        }

        push
    }

    /// Null out the attachment for a recipient who may not view its content
    pub fn redact_attachment(&mut self) {
        self.attachment = None;
    }
}
