//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in
//! lumen-core. Single-statement reads and writes run on the pool;
//! multi-statement writes go through the transaction executor.

mod account;
mod chat;
mod error;
mod message;

pub use account::PgAccountRepository;
pub use chat::PgChatRepository;
pub use message::PgMessageRepository;
