//! # lumen-core
//!
//! Domain layer for the chat messaging core: entities, value objects,
//! the closed message variant model, repository/port traits, and the
//! notification payload model. This crate has zero dependencies on
//! infrastructure (database, HTTP, push transport).

pub mod entities;
pub mod error;
pub mod notification;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Account, AttachmentContent, AttachmentKind, BannerContent, BannerEvent, Chat, ChatKind,
    FileInfo, ForwardedContent, Message, MessageData, Participant, Reaction, RepliedInfo,
    ReplyContent, TextContent, MAX_GROUP_SIZE, MIN_GROUP_SIZE,
};
pub use error::DomainError;
pub use notification::{
    broadcast_topic, DispatchOptions, MessagePush, PushNotification, PushPayload, PushPriority,
};
pub use traits::{
    AccountRepository, ChatRepository, ContentGateway, ContentOwner, ContentRef, MessageQuery,
    MessageRepository, PushGateway, RepoResult, SocialGraph, TextTokenizer,
};
pub use value_objects::{Snowflake, SnowflakeGenerator, SnowflakeParseError, TokenizedText};
