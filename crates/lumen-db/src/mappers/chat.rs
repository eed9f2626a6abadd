//! Chat aggregate <-> model mapper

use lumen_core::entities::{Chat, ChatKind, Participant};
use lumen_core::value_objects::Snowflake;

use crate::models::{ChatModel, ParticipantModel};

/// String form of a chat kind for the `chats.kind` column
pub fn chat_kind_to_str(kind: ChatKind) -> &'static str {
    match kind {
        ChatKind::OneToOne => "one_to_one",
        ChatKind::Group => "group",
    }
}

/// Assemble the chat aggregate from its row plus its participant rows
pub fn chat_from_rows(model: ChatModel, participants: Vec<ParticipantModel>) -> Chat {
    let kind = if model.is_group() {
        ChatKind::Group
    } else {
        ChatKind::OneToOne
    };

    Chat {
        id: Snowflake::new(model.id),
        kind,
        participants: participants.into_iter().map(Participant::from).collect(),
        last_message_sent_at: model.last_message_sent_at,
        name: model.name,
        display_picture: model.display_picture,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

impl From<ParticipantModel> for Participant {
    fn from(model: ParticipantModel) -> Self {
        Participant {
            account_id: Snowflake::new(model.account_id),
            is_member: model.is_member,
            is_admin: model.is_admin,
            is_muted: model.is_muted,
            is_pinned: model.is_pinned,
            is_deleted: model.is_deleted,
            joined_at: model.joined_at,
            invited_by: model.invited_by.map(Snowflake::new),
        }
    }
}
