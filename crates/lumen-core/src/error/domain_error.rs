//! Domain errors - the NotFound / Forbidden / BadRequest / Conflict taxonomy

use thiserror::Error;

use crate::traits::ContentRef;
use crate::value_objects::{Snowflake, SnowflakeParseError};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found
    // =========================================================================
    #[error("Chat not found: {0}")]
    ChatNotFound(Snowflake),

    #[error("Message not found: {0}")]
    MessageNotFound(Snowflake),

    #[error("Account not found: {0}")]
    AccountNotFound(Snowflake),

    #[error("Content not found: {0}")]
    ContentNotFound(ContentRef),

    // =========================================================================
    // Forbidden
    // =========================================================================
    #[error("Blocked relationship between accounts")]
    Blocked,

    #[error("Content owner is private and not followed")]
    PrivateContent,

    #[error("Content owner has disabled sharing")]
    SharingDisabled,

    #[error("Not a member of this chat")]
    NotAMember,

    #[error("Not a group admin")]
    NotAdmin,

    #[error("Group is full: max {max} participants")]
    GroupFull { max: usize },

    // =========================================================================
    // Bad Request
    // =========================================================================
    #[error("Cannot reply to a banner message")]
    InvalidReply,

    #[error("Participant count must be between {min} and {max}, got {got}")]
    InvalidParticipantCount { min: usize, max: usize, got: usize },

    #[error("Already a participant: {0}")]
    AlreadyParticipant(Snowflake),

    #[error("Malformed id: {0}")]
    MalformedId(String),

    #[error("Message has no content")]
    EmptyMessage,

    #[error("Validation error: {0}")]
    Validation(String),

    // =========================================================================
    // Conflict (transient, retried by the transaction executor)
    // =========================================================================
    #[error("Transient write conflict: {0}")]
    WriteConflict(String),

    // =========================================================================
    // Infrastructure (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Push dispatch failed: {0}")]
    DispatchFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::ChatNotFound(_) => "UNKNOWN_CHAT",
            Self::MessageNotFound(_) => "UNKNOWN_MESSAGE",
            Self::AccountNotFound(_) => "UNKNOWN_ACCOUNT",
            Self::ContentNotFound(_) => "UNKNOWN_CONTENT",

            Self::Blocked => "BLOCKED",
            Self::PrivateContent => "PRIVATE_CONTENT",
            Self::SharingDisabled => "SHARING_DISABLED",
            Self::NotAMember => "NOT_A_MEMBER",
            Self::NotAdmin => "NOT_ADMIN",
            Self::GroupFull { .. } => "GROUP_FULL",

            Self::InvalidReply => "INVALID_REPLY",
            Self::InvalidParticipantCount { .. } => "INVALID_PARTICIPANT_COUNT",
            Self::AlreadyParticipant(_) => "ALREADY_PARTICIPANT",
            Self::MalformedId(_) => "MALFORMED_ID",
            Self::EmptyMessage => "EMPTY_MESSAGE",
            Self::Validation(_) => "VALIDATION_ERROR",

            Self::WriteConflict(_) => "WRITE_CONFLICT",

            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::DispatchFailed(_) => "DISPATCH_FAILED",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ChatNotFound(_)
                | Self::MessageNotFound(_)
                | Self::AccountNotFound(_)
                | Self::ContentNotFound(_)
        )
    }

    /// Check if this is a forbidden (privilege) error
    pub fn is_forbidden(&self) -> bool {
        matches!(
            self,
            Self::Blocked
                | Self::PrivateContent
                | Self::SharingDisabled
                | Self::NotAMember
                | Self::NotAdmin
                | Self::GroupFull { .. }
        )
    }

    /// Check if this is a caller error (bad request)
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            Self::InvalidReply
                | Self::InvalidParticipantCount { .. }
                | Self::AlreadyParticipant(_)
                | Self::MalformedId(_)
                | Self::EmptyMessage
                | Self::Validation(_)
        )
    }

    /// Check if this error is a transient store conflict worth retrying
    ///
    /// Domain errors are deterministic; retrying them cannot succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::WriteConflict(_))
    }
}

impl From<SnowflakeParseError> for DomainError {
    fn from(_: SnowflakeParseError) -> Self {
        Self::MalformedId("expected a 64-bit decimal id".to_string())
    }
}
