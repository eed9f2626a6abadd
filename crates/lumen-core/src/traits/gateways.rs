//! External collaborator ports - social graph, content lookups, push, text extraction

use async_trait::async_trait;
use std::fmt;

use crate::error::DomainError;
use crate::notification::PushPayload;
use crate::value_objects::{Snowflake, TokenizedText};

use super::repositories::RepoResult;

// ============================================================================
// Social graph
// ============================================================================

#[async_trait]
pub trait SocialGraph: Send + Sync {
    /// Symmetric block check: true if either account blocked the other
    async fn is_blocked(&self, a: Snowflake, b: Snowflake) -> RepoResult<bool>;

    /// True if `follower` follows `of`
    async fn is_follower(&self, of: Snowflake, follower: Snowflake) -> RepoResult<bool>;
}

// ============================================================================
// Content lookups
// ============================================================================

/// Reference to a privacy-gated content entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentRef {
    Post(Snowflake),
    Audio(Snowflake),
    Memory(Snowflake),
    Highlight(Snowflake),
    Account(Snowflake),
}

impl fmt::Display for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Post(id) => write!(f, "post {id}"),
            Self::Audio(id) => write!(f, "audio {id}"),
            Self::Memory(id) => write!(f, "memory {id}"),
            Self::Highlight(id) => write!(f, "highlight {id}"),
            Self::Account(id) => write!(f, "account {id}"),
        }
    }
}

/// Ownership and gating state of a content entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentOwner {
    pub account_id: Snowflake,
    pub is_private: bool,
    pub sharing_enabled: bool,
}

#[async_trait]
pub trait ContentGateway: Send + Sync {
    /// Resolve the owner of a content entity, or None if it no longer exists
    ///
    /// Used at send time (privilege pre-check) and again per recipient at
    /// fan-out time.
    async fn owner_of(&self, target: ContentRef) -> RepoResult<Option<ContentOwner>>;
}

// ============================================================================
// Push gateway
// ============================================================================

#[async_trait]
pub trait PushGateway: Send + Sync {
    /// Dispatch a payload to a broadcast topic
    ///
    /// Fire-and-forget from the caller's point of view: errors are logged
    /// by the fan-out engine and never escalate.
    async fn send(&self, payload: &PushPayload, topic: &str) -> Result<(), DomainError>;
}

// ============================================================================
// Text extraction
// ============================================================================

pub trait TextTokenizer: Send + Sync {
    /// Extract keywords, mentions, hashtags, and emojis from free text
    fn tokenize(&self, text: &str) -> TokenizedText;
}
