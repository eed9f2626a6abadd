//! Message service - the send pipeline and message interactions

use tracing::{info, instrument};
use validator::Validate;

use lumen_core::entities::{Chat, Reaction};
use lumen_core::traits::MessageQuery;
use lumen_core::{DomainError, Snowflake};

use crate::dto::{MessageHistoryRequest, MessageResponse, ReactionRequest, SendMessageRequest};

use super::chat::ChatService;
use super::composer::MessageComposer;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::fanout::FanoutEngine;
use super::permission::PermissionService;

/// Default page size for message history
const DEFAULT_HISTORY_LIMIT: i64 = 50;

/// Where a message is being sent
#[derive(Debug, Clone, Copy)]
pub enum SendTarget {
    /// An existing chat the sender participates in
    Chat(Snowflake),
    /// Another account; the 1:1 chat is created lazily if absent
    Account(Snowflake),
}

/// Message service
pub struct MessageService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MessageService<'a> {
    /// Create a new MessageService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Send a message
    ///
    /// Pipeline: permission pre-checks, lazy 1:1 resolution, variant
    /// composition, one atomic write (insert + chat bump + any 1:1
    /// restore), then fan-out. Nothing is written when any check fails,
    /// and a failed fan-out never undoes the write.
    #[instrument(skip(self, request))]
    pub async fn send(
        &self,
        sender_id: Snowflake,
        target: SendTarget,
        request: SendMessageRequest,
    ) -> ServiceResult<MessageResponse> {
        request.validate()?;

        let chats = ChatService::new(self.ctx);
        let permission = PermissionService::new(self.ctx);
        let sender = chats.require_account(sender_id).await?;

        let (mut chat, is_new) = self.resolve_chat(sender_id, target, &permission).await?;
        if !is_new {
            let participant = chat
                .participant(sender_id)
                .ok_or(DomainError::NotAMember)?;
            if !participant.is_member {
                return Err(DomainError::NotAMember.into());
            }
            if chat.is_one_to_one() {
                if let Some(other) = chat.counterpart(sender_id) {
                    permission
                        .require_not_blocked(sender_id, other.account_id)
                        .await?;
                }
            }
        }

        let composer = MessageComposer::new(self.ctx);
        let data = if let Some(attachment) = request.attachment {
            let kind = attachment.into_kind();
            if let Some(content) = kind.content_ref() {
                permission.require_can_send(sender_id, content).await?;
            }
            composer.attachment(kind, request.text.as_deref())?
        } else if let Some(reply_to) = request.reply_to {
            let source = self
                .ctx
                .message_repo()
                .find_by_id(reply_to)
                .await?
                .filter(|m| m.chat_id == chat.id)
                .ok_or(DomainError::MessageNotFound(reply_to))?;
            composer.reply(&source, request.text.as_deref().unwrap_or_default())?
        } else {
            composer.text(request.text.as_deref().unwrap_or_default())?
        };

        let mut message = composer.build(chat.id, sender_id, data);
        message.mark_seen(sender_id);

        chat.touch_last_message(message.sent_at);
        chat.restore_hidden(message.sent_at);

        if is_new {
            self.ctx.chat_repo().create(&chat, Some(&message)).await?;
        } else {
            self.ctx.message_repo().append(&chat, &message).await?;
        }

        info!(
            chat_id = %chat.id,
            message_id = %message.id,
            sender_id = %sender_id,
            new_chat = is_new,
            "message sent"
        );

        FanoutEngine::new(self.ctx).dispatch(&chat, &message, &sender).await;
        Ok(MessageResponse::from(message))
    }

    /// Page through a chat's history, newest first
    #[instrument(skip(self))]
    pub async fn get_messages(
        &self,
        actor_id: Snowflake,
        chat_id: Snowflake,
        request: MessageHistoryRequest,
    ) -> ServiceResult<Vec<MessageResponse>> {
        let chat = ChatService::new(self.ctx).require_chat(chat_id).await?;
        if !chat.is_participant(actor_id) {
            return Err(DomainError::NotAMember.into());
        }

        let messages = self
            .ctx
            .message_repo()
            .find_by_chat(
                chat_id,
                MessageQuery {
                    before: request.before,
                    limit: request.limit.unwrap_or(DEFAULT_HISTORY_LIMIT),
                },
            )
            .await?;

        Ok(messages.into_iter().map(MessageResponse::from).collect())
    }

    /// Record that the actor has seen a message (idempotent)
    #[instrument(skip(self))]
    pub async fn mark_seen(
        &self,
        actor_id: Snowflake,
        message_id: Snowflake,
    ) -> ServiceResult<()> {
        self.require_message_access(actor_id, message_id).await?;
        self.ctx
            .message_repo()
            .mark_seen(message_id, actor_id)
            .await?;
        Ok(())
    }

    /// React to a message (idempotent per account and emoji)
    #[instrument(skip(self, request))]
    pub async fn add_reaction(
        &self,
        actor_id: Snowflake,
        message_id: Snowflake,
        request: ReactionRequest,
    ) -> ServiceResult<()> {
        request.validate()?;
        self.require_message_access(actor_id, message_id).await?;

        let reaction = Reaction {
            account_id: actor_id,
            emoji: request.emoji,
        };
        self.ctx
            .message_repo()
            .add_reaction(message_id, &reaction)
            .await?;
        Ok(())
    }

    // === Internal helpers ===

    async fn resolve_chat(
        &self,
        sender_id: Snowflake,
        target: SendTarget,
        permission: &PermissionService<'_>,
    ) -> ServiceResult<(Chat, bool)> {
        let chats = ChatService::new(self.ctx);
        match target {
            SendTarget::Chat(chat_id) => Ok((chats.require_chat(chat_id).await?, false)),
            SendTarget::Account(recipient_id) => {
                if recipient_id == sender_id {
                    return Err(ServiceError::validation("cannot message yourself"));
                }
                chats.require_account(recipient_id).await?;
                permission.require_not_blocked(sender_id, recipient_id).await?;

                match self
                    .ctx
                    .chat_repo()
                    .find_one_to_one(sender_id, recipient_id)
                    .await?
                {
                    Some(existing) => Ok((existing, false)),
                    None => Ok((
                        Chat::one_to_one(
                            self.ctx.generate_id(),
                            sender_id,
                            recipient_id,
                            chrono::Utc::now(),
                        ),
                        true,
                    )),
                }
            }
        }
    }

    async fn require_message_access(
        &self,
        actor_id: Snowflake,
        message_id: Snowflake,
    ) -> ServiceResult<()> {
        let message = self
            .ctx
            .message_repo()
            .find_by_id(message_id)
            .await?
            .ok_or(DomainError::MessageNotFound(message_id))?;

        let chat = ChatService::new(self.ctx).require_chat(message.chat_id).await?;
        if !chat.is_participant(actor_id) {
            return Err(DomainError::NotAMember.into());
        }
        Ok(())
    }
}
