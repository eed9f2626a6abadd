//! Entity to model mappers
//!
//! Conversions between domain entities (lumen-core) and database models.
//! - `From<Model> for Entity` where the conversion is infallible
//! - Fallible mappers return `Result` where JSON columns must parse

mod account;
mod chat;
mod message;

pub use chat::{chat_from_rows, chat_kind_to_str};
pub use message::message_from_model;
