//! Message entity and its closed variant model
//!
//! `MessageData` is a closed sum: adding an attachment kind fails to
//! compile until every interpretation site (preview, owner resolution,
//! payload building) handles it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::traits::ContentRef;
use crate::value_objects::{Snowflake, TokenizedText};

/// Message entity
///
/// Immutable once inserted except for `seen_by`/`reactions` appends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Snowflake,
    pub chat_id: Snowflake,
    pub sender_id: Snowflake,
    pub sent_at: DateTime<Utc>,
    pub seen_by: Vec<Snowflake>,
    pub reactions: Vec<Reaction>,
    pub data: MessageData,
}

/// A reaction on a message (data shape only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub account_id: Snowflake,
    pub emoji: String,
}

/// The closed message variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageData {
    Text(TextContent),
    Reply(ReplyContent),
    Attachment(AttachmentContent),
    Banner(BannerContent),
}

/// Plain text with extracted tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContent {
    pub text: String,
    pub tokens: TokenizedText,
}

/// Reply variant: new text plus a snapshot of the source at reply time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyContent {
    pub replied: RepliedInfo,
    pub forwarded: ForwardedContent,
    pub text: TextContent,
}

/// Which message is being replied to, and whom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepliedInfo {
    pub message_id: Snowflake,
    /// The source message's sender
    pub replied_to: Snowflake,
}

/// Snapshot of the replied-to content, never a live reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ForwardedContent {
    Text(TextContent),
    Attachment(AttachmentContent),
}

/// Attachment variant: one of eight kinds plus an optional tokenized caption
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentContent {
    #[serde(flatten)]
    pub kind: AttachmentKind,
    pub caption: Option<TextContent>,
}

/// The eight attachment kinds, selected by the `kind` discriminant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttachmentKind {
    Photo { post_id: Snowflake },
    Moment { post_id: Snowflake },
    Clip { post_id: Snowflake },
    Audio { audio_id: Snowflake },
    AccountShare { account_id: Snowflake },
    Memory { memory_id: Snowflake },
    Highlight { highlight_id: Snowflake, memory_id: Snowflake },
    File { files: Vec<FileInfo> },
}

/// Inline file descriptor for the `File` kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub name: String,
    pub url: String,
    pub mime_type: String,
    pub size: i64,
}

/// Banner variant: group lifecycle event, never authored by an ordinary send
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannerContent {
    #[serde(flatten)]
    pub event: BannerEvent,
}

/// Group lifecycle events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BannerEvent {
    GroupCreate,
    GroupMemberAdd { added: Vec<Snowflake> },
    GroupLeave { left: Snowflake },
    GroupDisplayPictureChange,
    GroupNameChange { name: String },
}

impl AttachmentKind {
    /// Reference to the privacy-gated content this kind points at, if any
    ///
    /// Inline files carry their own bytes and are not gated.
    pub fn content_ref(&self) -> Option<ContentRef> {
        match self {
            Self::Photo { post_id } | Self::Moment { post_id } | Self::Clip { post_id } => {
                Some(ContentRef::Post(*post_id))
            }
            Self::Audio { audio_id } => Some(ContentRef::Audio(*audio_id)),
            Self::AccountShare { account_id } => Some(ContentRef::Account(*account_id)),
            Self::Memory { memory_id } => Some(ContentRef::Memory(*memory_id)),
            Self::Highlight { highlight_id, .. } => Some(ContentRef::Highlight(*highlight_id)),
            Self::File { .. } => None,
        }
    }

    /// Short label used in notification previews
    pub fn label(&self) -> &'static str {
        match self {
            Self::Photo { .. } => "photo",
            Self::Moment { .. } => "moment",
            Self::Clip { .. } => "clip",
            Self::Audio { .. } => "audio",
            Self::AccountShare { .. } => "profile",
            Self::Memory { .. } => "memory",
            Self::Highlight { .. } => "highlight",
            Self::File { .. } => "file",
        }
    }
}

impl BannerEvent {
    /// Human-readable body for notification previews
    pub fn describe(&self) -> String {
        match self {
            Self::GroupCreate => "Group created".to_string(),
            Self::GroupMemberAdd { added } => match added.len() {
                1 => "A member was added".to_string(),
                n => format!("{n} members were added"),
            },
            Self::GroupLeave { .. } => "A member left".to_string(),
            Self::GroupDisplayPictureChange => "Group picture changed".to_string(),
            Self::GroupNameChange { name } => format!("Group renamed to {name}"),
        }
    }
}

impl Message {
    /// Create a new Message
    pub fn new(
        id: Snowflake,
        chat_id: Snowflake,
        sender_id: Snowflake,
        sent_at: DateTime<Utc>,
        data: MessageData,
    ) -> Self {
        Self {
            id,
            chat_id,
            sender_id,
            sent_at,
            seen_by: Vec::new(),
            reactions: Vec::new(),
            data,
        }
    }

    #[inline]
    pub fn is_banner(&self) -> bool {
        matches!(self.data, MessageData::Banner(_))
    }

    /// Privacy-gated content this message references at fan-out time
    ///
    /// Covers attachment messages and replies that forward an attachment
    /// snapshot; text and banners reference nothing.
    pub fn gated_content(&self) -> Option<ContentRef> {
        match &self.data {
            MessageData::Attachment(att) => att.kind.content_ref(),
            MessageData::Reply(reply) => match &reply.forwarded {
                ForwardedContent::Attachment(att) => att.kind.content_ref(),
                ForwardedContent::Text(_) => None,
            },
            MessageData::Text(_) | MessageData::Banner(_) => None,
        }
    }

    /// Truncated preview for notification bodies
    pub fn preview(&self, max_len: usize) -> String {
        let raw = match &self.data {
            MessageData::Text(text) => text.text.clone(),
            MessageData::Reply(reply) => reply.text.text.clone(),
            MessageData::Attachment(att) => match &att.caption {
                Some(caption) if !caption.text.is_empty() => caption.text.clone(),
                _ => format!("Sent a {}", att.kind.label()),
            },
            MessageData::Banner(banner) => banner.event.describe(),
        };
        truncate_on_boundary(&raw, max_len)
    }

    /// Record that an account has seen this message (idempotent append)
    pub fn mark_seen(&mut self, account_id: Snowflake) {
        if !self.seen_by.contains(&account_id) {
            self.seen_by.push(account_id);
        }
    }

    /// Append a reaction (one per account and emoji)
    pub fn add_reaction(&mut self, account_id: Snowflake, emoji: String) {
        let exists = self
            .reactions
            .iter()
            .any(|r| r.account_id == account_id && r.emoji == emoji);
        if !exists {
            self.reactions.push(Reaction { account_id, emoji });
        }
    }
}

fn truncate_on_boundary(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) && end > 0 {
        end -= 1;
    }
    s[..end].to_string()
}
