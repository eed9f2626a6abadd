//! Message composition - turns caller input into the closed variant model
//!
//! Variant construction lives here so the send pipeline only ever handles
//! a finished [`MessageData`]; invalid shapes never reach the store.

use chrono::Utc;

use lumen_core::entities::{
    AttachmentContent, AttachmentKind, BannerContent, BannerEvent, ForwardedContent, Message,
    MessageData, ReplyContent, RepliedInfo, TextContent,
};
use lumen_core::{DomainError, Snowflake};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Message composer
pub struct MessageComposer<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MessageComposer<'a> {
    /// Create a new MessageComposer
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    fn tokenized(&self, text: &str) -> TextContent {
        TextContent {
            text: text.to_string(),
            tokens: self.ctx.tokenizer().tokenize(text),
        }
    }

    /// Compose a plain text variant
    pub fn text(&self, text: &str) -> ServiceResult<MessageData> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyMessage.into());
        }
        Ok(MessageData::Text(self.tokenized(trimmed)))
    }

    /// Compose a reply, snapshotting the source message's content
    ///
    /// Banners cannot be replied to. Replying to a reply forwards its own
    /// text, never the chain behind it.
    pub fn reply(&self, source: &Message, text: &str) -> ServiceResult<MessageData> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyMessage.into());
        }
        let forwarded = forwarded_snapshot(source).ok_or(DomainError::InvalidReply)?;

        Ok(MessageData::Reply(ReplyContent {
            replied: RepliedInfo {
                message_id: source.id,
                replied_to: source.sender_id,
            },
            forwarded,
            text: self.tokenized(trimmed),
        }))
    }

    /// Compose an attachment variant with an optional caption
    pub fn attachment(
        &self,
        kind: AttachmentKind,
        caption: Option<&str>,
    ) -> ServiceResult<MessageData> {
        if let AttachmentKind::File { files } = &kind {
            if files.is_empty() {
                return Err(DomainError::EmptyMessage.into());
            }
        }
        let caption = caption
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(|c| self.tokenized(c));

        Ok(MessageData::Attachment(AttachmentContent { kind, caption }))
    }

    /// Compose a group lifecycle banner
    pub fn banner(event: BannerEvent) -> MessageData {
        MessageData::Banner(BannerContent { event })
    }

    /// Stamp a finished variant into a message for the given chat
    pub fn build(&self, chat_id: Snowflake, sender_id: Snowflake, data: MessageData) -> Message {
        Message::new(self.ctx.generate_id(), chat_id, sender_id, Utc::now(), data)
    }
}

/// Snapshot of a source message's content for embedding in a reply
///
/// Returns None for banners.
fn forwarded_snapshot(source: &Message) -> Option<ForwardedContent> {
    match &source.data {
        MessageData::Text(text) => Some(ForwardedContent::Text(text.clone())),
        MessageData::Attachment(att) => Some(ForwardedContent::Attachment(att.clone())),
        MessageData::Reply(reply) => Some(ForwardedContent::Text(reply.text.clone())),
        MessageData::Banner(_) => None,
    }
}
