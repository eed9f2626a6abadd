//! Repository traits (ports) - define the interface for the message store
//!
//! The domain layer defines what it needs; the infrastructure layer
//! provides the implementation. Multi-step writes are expressed as single
//! trait methods so an implementation can make them one atomic unit of
//! work (see the transaction executor in the db crate).

use async_trait::async_trait;

use crate::entities::{Account, Chat, Message, Participant, Reaction};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Account Repository
// ============================================================================

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find account by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Account>>;

    /// Create a new account
    async fn create(&self, account: &Account) -> RepoResult<()>;
}

// ============================================================================
// Chat Repository
// ============================================================================

#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Find chat by ID with its full participant list
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Chat>>;

    /// Find the 1:1 chat between two accounts, if any
    async fn find_one_to_one(&self, a: Snowflake, b: Snowflake) -> RepoResult<Option<Chat>>;

    /// List chats an account participates in
    async fn find_by_account(&self, account_id: Snowflake) -> RepoResult<Vec<Chat>>;

    /// Persist a new chat aggregate, its participants, and an optional
    /// opening message (group banner or the first 1:1 message) as one
    /// atomic unit
    async fn create(&self, chat: &Chat, opening: Option<&Message>) -> RepoResult<()>;

    /// Persist an aggregate after a membership mutation, together with the
    /// banner message describing it, as one atomic unit
    ///
    /// The given aggregate is authoritative post-mutation state; callers
    /// must not re-read.
    async fn save_membership(&self, chat: &Chat, banner: &Message) -> RepoResult<()>;

    /// Persist group profile changes (name / display picture) with their
    /// banner as one atomic unit
    async fn save_profile(&self, chat: &Chat, banner: &Message) -> RepoResult<()>;

    /// Update a single participant's flags (mute / pin / soft-delete)
    async fn update_participant(
        &self,
        chat_id: Snowflake,
        participant: &Participant,
    ) -> RepoResult<()>;
}

// ============================================================================
// Message Repository
// ============================================================================

/// Pagination options for message queries
#[derive(Debug, Clone, Default)]
pub struct MessageQuery {
    pub before: Option<Snowflake>,
    pub limit: i64,
}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Find message by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Message>>;

    /// List messages in a chat, newest first
    async fn find_by_chat(&self, chat_id: Snowflake, query: MessageQuery)
        -> RepoResult<Vec<Message>>;

    /// Insert a message and persist the given aggregate state (bumped
    /// `last_message_sent_at`, any 1:1 soft-delete reset) as one atomic
    /// unit - all of it commits or none of it does
    async fn append(&self, chat: &Chat, message: &Message) -> RepoResult<()>;

    /// Append an account to a message's seen-by set
    async fn mark_seen(&self, message_id: Snowflake, account_id: Snowflake) -> RepoResult<()>;

    /// Append a reaction to a message
    async fn add_reaction(&self, message_id: Snowflake, reaction: &Reaction) -> RepoResult<()>;
}
