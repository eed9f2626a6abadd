//! Response DTOs for the messaging surface

use chrono::{DateTime, Utc};
use serde::Serialize;

use lumen_core::entities::{MessageData, Reaction};
use lumen_core::Snowflake;

/// Message response
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub id: Snowflake,
    pub chat_id: Snowflake,
    pub sender_id: Snowflake,
    pub sent_at: DateTime<Utc>,
    pub seen_by: Vec<Snowflake>,
    pub reactions: Vec<Reaction>,
    #[serde(flatten)]
    pub data: MessageData,
}

/// Chat response with its participant list
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub id: Snowflake,
    /// "one_to_one" or "group"
    pub kind: String,
    pub name: Option<String>,
    pub display_picture: Option<String>,
    pub last_message_sent_at: Option<DateTime<Utc>>,
    pub participants: Vec<ParticipantResponse>,
    pub created_at: DateTime<Utc>,
}

/// Participant within a chat response
#[derive(Debug, Clone, Serialize)]
pub struct ParticipantResponse {
    pub account_id: Snowflake,
    pub is_member: bool,
    pub is_admin: bool,
    pub is_muted: bool,
    pub is_pinned: bool,
    pub joined_at: DateTime<Utc>,
}
