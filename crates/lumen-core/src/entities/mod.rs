//! Domain entities

mod account;
mod chat;
mod message;
mod participant;

pub use account::Account;
pub use chat::{Chat, ChatKind, MAX_GROUP_SIZE, MIN_GROUP_SIZE};
pub use message::{
    AttachmentContent, AttachmentKind, BannerContent, BannerEvent, FileInfo, ForwardedContent,
    Message, MessageData, Reaction, RepliedInfo, ReplyContent, TextContent,
};
pub use participant::Participant;
