//! Message database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the messages table
///
/// `data` holds the serialized message variant; `reactions` a JSON array
/// of `{account_id, emoji}` pairs.
#[derive(Debug, Clone, FromRow)]
pub struct MessageModel {
    pub id: i64,
    pub chat_id: i64,
    pub sender_id: i64,
    pub sent_at: DateTime<Utc>,
    pub seen_by: Vec<i64>,
    pub reactions: serde_json::Value,
    pub data: serde_json::Value,
}
