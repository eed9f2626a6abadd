//! Message entity <-> model mapper

use lumen_core::entities::{Message, MessageData, Reaction};
use lumen_core::error::DomainError;
use lumen_core::value_objects::Snowflake;

use crate::models::MessageModel;

/// Convert a message row into the entity, parsing the JSON columns
///
/// A row that fails to parse is corrupt; surfacing it as an internal error
/// keeps the closed variant model authoritative.
pub fn message_from_model(model: MessageModel) -> Result<Message, DomainError> {
    let MessageModel {
        id,
        chat_id,
        sender_id,
        sent_at,
        seen_by,
        reactions,
        data,
    } = model;

    let data: MessageData = serde_json::from_value(data)
        .map_err(|e| DomainError::Internal(format!("corrupt message {id} data: {e}")))?;
    let reactions: Vec<Reaction> = serde_json::from_value(reactions)
        .map_err(|e| DomainError::Internal(format!("corrupt message {id} reactions: {e}")))?;

    Ok(Message {
        id: Snowflake::new(id),
        chat_id: Snowflake::new(chat_id),
        sender_id: Snowflake::new(sender_id),
        sent_at,
        seen_by: seen_by.into_iter().map(Snowflake::new).collect(),
        reactions,
        data,
    })
}
