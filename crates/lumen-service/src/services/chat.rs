//! Chat service - group lifecycle and per-participant preferences

use chrono::Utc;
use tracing::{info, instrument};
use validator::Validate;

use lumen_core::entities::{
    Account, BannerEvent, Chat, Message, Participant, MAX_GROUP_SIZE, MIN_GROUP_SIZE,
};
use lumen_core::{DomainError, Snowflake};

use crate::dto::{
    AddParticipantsRequest, ChangeDisplayPictureRequest, ChatResponse, CreateGroupRequest,
    RenameGroupRequest,
};

use super::composer::MessageComposer;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::fanout::FanoutEngine;
use super::permission::PermissionService;

/// Chat service
pub struct ChatService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ChatService<'a> {
    /// Create a new ChatService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a group chat with the creator as admin
    ///
    /// Targets following the creator join as members; the rest land as
    /// pending invites. The opening banner commits atomically with the
    /// chat and fans out afterwards.
    #[instrument(skip(self, request))]
    pub async fn create_group(
        &self,
        creator_id: Snowflake,
        request: CreateGroupRequest,
    ) -> ServiceResult<ChatResponse> {
        request.validate()?;

        let mut targets = request.member_ids.clone();
        targets.sort_unstable();
        targets.dedup();
        targets.retain(|id| *id != creator_id);

        let total = targets.len() + 1;
        if !(MIN_GROUP_SIZE..=MAX_GROUP_SIZE).contains(&total) {
            return Err(DomainError::InvalidParticipantCount {
                min: MIN_GROUP_SIZE,
                max: MAX_GROUP_SIZE,
                got: total,
            }
            .into());
        }

        let creator = self.require_account(creator_id).await?;

        let now = Utc::now();
        let mut chat = Chat::group(
            self.ctx.generate_id(),
            creator_id,
            request.name,
            request.display_picture,
            now,
        );
        for target_id in targets {
            let participant = self.admitted_participant(creator_id, target_id, now).await?;
            chat.add_participant(participant)?;
        }

        let banner = self.stamp_banner(&chat, creator_id, BannerEvent::GroupCreate);
        chat.touch_last_message(banner.sent_at);
        self.ctx.chat_repo().create(&chat, Some(&banner)).await?;

        info!(chat_id = %chat.id, creator_id = %creator_id, members = chat.participant_count(), "group created");

        FanoutEngine::new(self.ctx).dispatch(&chat, &banner, &creator).await;
        Ok(ChatResponse::from(&chat))
    }

    /// Add accounts to an existing group chat
    #[instrument(skip(self, request))]
    pub async fn add_participants(
        &self,
        actor_id: Snowflake,
        chat_id: Snowflake,
        request: AddParticipantsRequest,
    ) -> ServiceResult<ChatResponse> {
        request.validate()?;

        let mut chat = self.require_group(chat_id).await?;
        self.require_active_member(&chat, actor_id)?;
        let actor = self.require_account(actor_id).await?;

        let now = Utc::now();
        let mut added = Vec::new();
        for target_id in request.member_ids {
            if chat.is_participant(target_id) {
                return Err(DomainError::AlreadyParticipant(target_id).into());
            }
            let participant = self.admitted_participant(actor_id, target_id, now).await?;
            chat.add_participant(participant)?;
            added.push(target_id);
        }

        let banner = self.stamp_banner(&chat, actor_id, BannerEvent::GroupMemberAdd { added });
        chat.touch_last_message(banner.sent_at);
        self.ctx.chat_repo().save_membership(&chat, &banner).await?;

        info!(chat_id = %chat.id, actor_id = %actor_id, members = chat.participant_count(), "participants added");

        FanoutEngine::new(self.ctx).dispatch(&chat, &banner, &actor).await;
        Ok(ChatResponse::from(&chat))
    }

    /// Leave a group chat
    ///
    /// The departure banner fans out to the remaining participants.
    #[instrument(skip(self))]
    pub async fn leave_group(&self, actor_id: Snowflake, chat_id: Snowflake) -> ServiceResult<()> {
        let mut chat = self.require_group(chat_id).await?;
        self.require_active_member(&chat, actor_id)?;
        let actor = self.require_account(actor_id).await?;

        chat.remove_participant(actor_id)?;

        let banner = self.stamp_banner(&chat, actor_id, BannerEvent::GroupLeave { left: actor_id });
        chat.touch_last_message(banner.sent_at);
        self.ctx.chat_repo().save_membership(&chat, &banner).await?;

        info!(chat_id = %chat.id, actor_id = %actor_id, "left group");

        FanoutEngine::new(self.ctx).dispatch(&chat, &banner, &actor).await;
        Ok(())
    }

    /// Rename a group chat (admin only)
    #[instrument(skip(self, request))]
    pub async fn rename_group(
        &self,
        actor_id: Snowflake,
        chat_id: Snowflake,
        request: RenameGroupRequest,
    ) -> ServiceResult<ChatResponse> {
        request.validate()?;

        let mut chat = self.require_group(chat_id).await?;
        self.require_admin(&chat, actor_id)?;
        let actor = self.require_account(actor_id).await?;

        chat.name = Some(request.name.clone());
        chat.updated_at = Utc::now();

        let banner = self.stamp_banner(
            &chat,
            actor_id,
            BannerEvent::GroupNameChange { name: request.name },
        );
        chat.touch_last_message(banner.sent_at);
        self.ctx.chat_repo().save_profile(&chat, &banner).await?;

        FanoutEngine::new(self.ctx).dispatch(&chat, &banner, &actor).await;
        Ok(ChatResponse::from(&chat))
    }

    /// Change a group chat's display picture (admin only)
    #[instrument(skip(self, request))]
    pub async fn change_display_picture(
        &self,
        actor_id: Snowflake,
        chat_id: Snowflake,
        request: ChangeDisplayPictureRequest,
    ) -> ServiceResult<ChatResponse> {
        let mut chat = self.require_group(chat_id).await?;
        self.require_admin(&chat, actor_id)?;
        let actor = self.require_account(actor_id).await?;

        chat.display_picture = request.display_picture;
        chat.updated_at = Utc::now();

        let banner = self.stamp_banner(&chat, actor_id, BannerEvent::GroupDisplayPictureChange);
        chat.touch_last_message(banner.sent_at);
        self.ctx.chat_repo().save_profile(&chat, &banner).await?;

        FanoutEngine::new(self.ctx).dispatch(&chat, &banner, &actor).await;
        Ok(ChatResponse::from(&chat))
    }

    /// Mute or unmute a chat for the acting participant
    #[instrument(skip(self))]
    pub async fn set_muted(
        &self,
        actor_id: Snowflake,
        chat_id: Snowflake,
        muted: bool,
    ) -> ServiceResult<()> {
        self.update_own_flags(actor_id, chat_id, |p| p.is_muted = muted)
            .await
    }

    /// Pin or unpin a chat for the acting participant
    #[instrument(skip(self))]
    pub async fn set_pinned(
        &self,
        actor_id: Snowflake,
        chat_id: Snowflake,
        pinned: bool,
    ) -> ServiceResult<()> {
        self.update_own_flags(actor_id, chat_id, |p| p.is_pinned = pinned)
            .await
    }

    /// Hide a 1:1 chat from the actor's list (soft-delete)
    ///
    /// Messages stay stored; the next message from either side restores
    /// visibility.
    #[instrument(skip(self))]
    pub async fn hide_one_to_one(
        &self,
        actor_id: Snowflake,
        chat_id: Snowflake,
    ) -> ServiceResult<()> {
        let chat = self.require_chat(chat_id).await?;
        if !chat.is_one_to_one() {
            return Err(ServiceError::validation("only 1:1 chats can be hidden"));
        }
        self.update_own_flags(actor_id, chat_id, |p| p.is_deleted = true)
            .await
    }

    /// List the actor's visible chats
    #[instrument(skip(self))]
    pub async fn list_chats(&self, account_id: Snowflake) -> ServiceResult<Vec<ChatResponse>> {
        let chats = self.ctx.chat_repo().find_by_account(account_id).await?;
        Ok(chats.iter().map(ChatResponse::from).collect())
    }

    /// Fetch one chat the actor participates in
    #[instrument(skip(self))]
    pub async fn get_chat(
        &self,
        actor_id: Snowflake,
        chat_id: Snowflake,
    ) -> ServiceResult<ChatResponse> {
        let chat = self.require_chat(chat_id).await?;
        if !chat.is_participant(actor_id) {
            return Err(DomainError::NotAMember.into());
        }
        Ok(ChatResponse::from(&chat))
    }

    // === Internal helpers ===

    pub(super) async fn require_chat(&self, chat_id: Snowflake) -> ServiceResult<Chat> {
        self.ctx
            .chat_repo()
            .find_by_id(chat_id)
            .await?
            .ok_or_else(|| DomainError::ChatNotFound(chat_id).into())
    }

    async fn require_group(&self, chat_id: Snowflake) -> ServiceResult<Chat> {
        let chat = self.require_chat(chat_id).await?;
        if !chat.is_group() {
            return Err(ServiceError::validation("not a group chat"));
        }
        Ok(chat)
    }

    pub(super) async fn require_account(&self, account_id: Snowflake) -> ServiceResult<Account> {
        self.ctx
            .account_repo()
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| DomainError::AccountNotFound(account_id).into())
    }

    fn require_active_member(&self, chat: &Chat, account_id: Snowflake) -> ServiceResult<()> {
        if !chat.is_active_member(account_id) {
            return Err(DomainError::NotAMember.into());
        }
        Ok(())
    }

    fn require_admin(&self, chat: &Chat, account_id: Snowflake) -> ServiceResult<()> {
        self.require_active_member(chat, account_id)?;
        if !chat.is_admin(account_id) {
            return Err(DomainError::NotAdmin.into());
        }
        Ok(())
    }

    /// Admit a target into a group: member when they follow the inviter,
    /// pending invite otherwise
    async fn admitted_participant(
        &self,
        inviter_id: Snowflake,
        target_id: Snowflake,
        now: chrono::DateTime<Utc>,
    ) -> ServiceResult<Participant> {
        self.require_account(target_id).await?;

        let permission = PermissionService::new(self.ctx);
        permission.require_not_blocked(inviter_id, target_id).await?;

        let follows = self
            .ctx
            .social_graph()
            .is_follower(inviter_id, target_id)
            .await?;
        Ok(if follows {
            Participant::active(target_id, now)
        } else {
            Participant::invited(target_id, inviter_id, now)
        })
    }

    fn stamp_banner(&self, chat: &Chat, author_id: Snowflake, event: BannerEvent) -> Message {
        MessageComposer::new(self.ctx).build(chat.id, author_id, MessageComposer::banner(event))
    }

    async fn update_own_flags<F>(
        &self,
        actor_id: Snowflake,
        chat_id: Snowflake,
        apply: F,
    ) -> ServiceResult<()>
    where
        F: FnOnce(&mut Participant),
    {
        let mut chat = self.require_chat(chat_id).await?;
        let participant = chat
            .participant_mut(actor_id)
            .ok_or(DomainError::NotAMember)?;
        apply(participant);
        let updated = participant.clone();
        self.ctx
            .chat_repo()
            .update_participant(chat_id, &updated)
            .await?;
        Ok(())
    }
}
