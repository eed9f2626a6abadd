//! Service layer - use cases over the chat domain

mod chat;
mod composer;
mod context;
mod error;
mod extract;
mod fanout;
mod message;
mod permission;

pub use chat::ChatService;
pub use composer::MessageComposer;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use extract::RegexTokenizer;
pub use fanout::FanoutEngine;
pub use message::{MessageService, SendTarget};
pub use permission::PermissionService;
