//! Database models - SQLx-compatible structs for PostgreSQL tables

mod account;
mod chat;
mod message;

pub use account::AccountModel;
pub use chat::{ChatModel, ParticipantModel};
pub use message::MessageModel;
