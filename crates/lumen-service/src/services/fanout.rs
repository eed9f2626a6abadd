//! Notification fan-out - per-recipient payloads with bounded concurrency
//!
//! Runs strictly after the message commit. Delivery failures are logged
//! per recipient and never surface to the sender.

use futures::stream::{self, StreamExt};
use tracing::{info, instrument, warn};

use lumen_core::entities::{Account, Chat, Message, Participant};
use lumen_core::notification::{broadcast_topic, MessagePush, PushPayload};
use lumen_core::traits::ContentOwner;
use lumen_core::Snowflake;

use super::context::ServiceContext;
use super::permission::PermissionService;

/// Longest preview carried in a notification body
const PREVIEW_MAX_LEN: usize = 140;

/// Attachment visibility state resolved once per dispatch
enum Gate {
    /// Message references no gated content
    Open,
    /// Gated; None means the content vanished and everyone gets redacted
    Gated(Option<ContentOwner>),
}

/// Notification fan-out engine
pub struct FanoutEngine<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> FanoutEngine<'a> {
    /// Create a new FanoutEngine
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Dispatch one committed message to every participant's devices
    ///
    /// Rich payloads go to active, unmuted members other than the sender;
    /// everyone else (sender's own devices, pending invites, soft-deleted
    /// and muted sides) gets a silent data payload.
    #[instrument(skip(self, chat, message, sender), fields(chat_id = %chat.id, message_id = %message.id))]
    pub async fn dispatch(&self, chat: &Chat, message: &Message, sender: &Account) {
        let gate = self.resolve_gate(message).await;

        let title = if chat.is_group() {
            chat.name.clone().unwrap_or_else(|| "Group".to_string())
        } else {
            sender.visible_name().to_string()
        };
        let body = message.preview(PREVIEW_MAX_LEN);
        let base = MessagePush::from_message(message);
        let permission = PermissionService::new(self.ctx);

        let failures: Vec<(Snowflake, String)> = stream::iter(chat.participants.iter().map(
            |participant| {
                let mut data = base.clone();
                let title = title.clone();
                let body = body.clone();
                let gate = &gate;
                let permission = &permission;
                async move {
                    if self.must_redact(permission, participant.account_id, gate).await {
                        data.redact_attachment();
                    }

                    let payload = if is_rich_recipient(participant, sender.id) {
                        PushPayload::rich(title, body, sender.avatar.clone(), data)
                    } else {
                        PushPayload::silent(data)
                    };

                    let topic = broadcast_topic(participant.account_id);
                    self.ctx
                        .push_gateway()
                        .send(&payload, &topic)
                        .await
                        .map_err(|e| (participant.account_id, e.to_string()))
                }
            },
        ))
        .buffer_unordered(self.ctx.fanout_concurrency())
        .filter_map(|result| async move { result.err() })
        .collect()
        .await;

        for (account_id, error) in &failures {
            warn!(%account_id, error, "push dispatch failed");
        }
        info!(
            recipients = chat.participants.len(),
            failed = failures.len(),
            "fan-out complete"
        );
    }

    async fn resolve_gate(&self, message: &Message) -> Gate {
        let Some(target) = message.gated_content() else {
            return Gate::Open;
        };
        match self.ctx.content_gateway().owner_of(target).await {
            Ok(owner) => Gate::Gated(owner),
            Err(e) => {
                warn!(%target, error = %e, "owner lookup failed, redacting for all recipients");
                Gate::Gated(None)
            }
        }
    }

    async fn must_redact(
        &self,
        permission: &PermissionService<'_>,
        viewer_id: Snowflake,
        gate: &Gate,
    ) -> bool {
        match gate {
            Gate::Open => false,
            Gate::Gated(None) => true,
            Gate::Gated(Some(owner)) => {
                match permission.can_receive(viewer_id, owner).await {
                    Ok(visible) => !visible,
                    Err(e) => {
                        warn!(%viewer_id, error = %e, "receive check failed, redacting");
                        true
                    }
                }
            }
        }
    }
}

#[inline]
fn is_rich_recipient(participant: &Participant, sender_id: Snowflake) -> bool {
    participant.account_id != sender_id && participant.is_active() && !participant.is_muted
}
