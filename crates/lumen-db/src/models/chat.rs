//! Chat and participant database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the chats table
#[derive(Debug, Clone, FromRow)]
pub struct ChatModel {
    pub id: i64,
    /// "one_to_one" or "group"
    pub kind: String,
    pub name: Option<String>,
    pub display_picture: Option<String>,
    pub last_message_sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChatModel {
    #[inline]
    pub fn is_group(&self) -> bool {
        self.kind == "group"
    }
}

/// Database model for the chat_participants table
#[derive(Debug, Clone, FromRow)]
pub struct ParticipantModel {
    pub chat_id: i64,
    pub account_id: i64,
    pub is_member: bool,
    pub is_admin: bool,
    pub is_muted: bool,
    pub is_pinned: bool,
    pub is_deleted: bool,
    pub joined_at: DateTime<Utc>,
    pub invited_by: Option<i64>,
}
