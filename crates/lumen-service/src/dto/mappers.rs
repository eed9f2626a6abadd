//! Entity to response mappers

use lumen_core::entities::{Chat, ChatKind, Message, Participant};

use super::responses::{ChatResponse, MessageResponse, ParticipantResponse};

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self {
            id: message.id,
            chat_id: message.chat_id,
            sender_id: message.sender_id,
            sent_at: message.sent_at,
            seen_by: message.seen_by,
            reactions: message.reactions,
            data: message.data,
        }
    }
}

impl From<&Participant> for ParticipantResponse {
    fn from(participant: &Participant) -> Self {
        Self {
            account_id: participant.account_id,
            is_member: participant.is_member,
            is_admin: participant.is_admin,
            is_muted: participant.is_muted,
            is_pinned: participant.is_pinned,
            joined_at: participant.joined_at,
        }
    }
}

impl From<&Chat> for ChatResponse {
    fn from(chat: &Chat) -> Self {
        let kind = match chat.kind {
            ChatKind::OneToOne => "one_to_one",
            ChatKind::Group => "group",
        };
        Self {
            id: chat.id,
            kind: kind.to_string(),
            name: chat.name.clone(),
            display_picture: chat.display_picture.clone(),
            last_message_sent_at: chat.last_message_sent_at,
            participants: chat.participants.iter().map(ParticipantResponse::from).collect(),
            created_at: chat.created_at,
        }
    }
}
