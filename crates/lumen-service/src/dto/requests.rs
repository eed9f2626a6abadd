//! Request DTOs for the messaging surface
//!
//! All request DTOs implement `Deserialize`; those carrying free text
//! also implement `Validate`.

use serde::Deserialize;
use validator::Validate;

use lumen_core::entities::{AttachmentKind, FileInfo};
use lumen_core::Snowflake;

// ============================================================================
// Chat Requests
// ============================================================================

/// Create group chat request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGroupRequest {
    #[validate(length(min = 1, max = 100, message = "Group name must be 1-100 characters"))]
    pub name: String,

    /// Display picture URL
    pub display_picture: Option<String>,

    /// Accounts to add beside the creator
    pub member_ids: Vec<Snowflake>,
}

/// Add participants to a group chat
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddParticipantsRequest {
    #[validate(length(min = 1, message = "At least one account is required"))]
    pub member_ids: Vec<Snowflake>,
}

/// Rename a group chat
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RenameGroupRequest {
    #[validate(length(min = 1, max = 100, message = "Group name must be 1-100 characters"))]
    pub name: String,
}

/// Change a group chat's display picture (None removes it)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ChangeDisplayPictureRequest {
    pub display_picture: Option<String>,
}

// ============================================================================
// Message Requests
// ============================================================================

/// Send message request
///
/// Shape selects the variant: `attachment` present composes an attachment
/// (with `text` as its caption), `reply_to` composes a reply, otherwise
/// plain text.
#[derive(Debug, Clone, Deserialize, Validate, Default)]
pub struct SendMessageRequest {
    #[validate(length(max = 2000, message = "Text must be at most 2000 characters"))]
    pub text: Option<String>,

    /// Message being replied to
    pub reply_to: Option<Snowflake>,

    pub attachment: Option<AttachmentInput>,
}

/// Attachment payload, discriminated by `kind`
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttachmentInput {
    Photo { post_id: Snowflake },
    Moment { post_id: Snowflake },
    Clip { post_id: Snowflake },
    Audio { audio_id: Snowflake },
    AccountShare { account_id: Snowflake },
    Memory { memory_id: Snowflake },
    Highlight { highlight_id: Snowflake, memory_id: Snowflake },
    File { files: Vec<FileInput> },
}

impl AttachmentInput {
    /// Convert into the domain attachment kind
    pub fn into_kind(self) -> AttachmentKind {
        match self {
            Self::Photo { post_id } => AttachmentKind::Photo { post_id },
            Self::Moment { post_id } => AttachmentKind::Moment { post_id },
            Self::Clip { post_id } => AttachmentKind::Clip { post_id },
            Self::Audio { audio_id } => AttachmentKind::Audio { audio_id },
            Self::AccountShare { account_id } => AttachmentKind::AccountShare { account_id },
            Self::Memory { memory_id } => AttachmentKind::Memory { memory_id },
            Self::Highlight {
                highlight_id,
                memory_id,
            } => AttachmentKind::Highlight {
                highlight_id,
                memory_id,
            },
            Self::File { files } => AttachmentKind::File {
                files: files.into_iter().map(FileInput::into_info).collect(),
            },
        }
    }
}

/// Inline file descriptor
#[derive(Debug, Clone, Deserialize)]
pub struct FileInput {
    pub name: String,
    pub url: String,
    pub mime_type: String,
    pub size: i64,
}

impl FileInput {
    fn into_info(self) -> FileInfo {
        FileInfo {
            name: self.name,
            url: self.url,
            mime_type: self.mime_type,
            size: self.size,
        }
    }
}

/// Message history pagination request
#[derive(Debug, Clone, Deserialize, Default)]
pub struct MessageHistoryRequest {
    /// Return messages strictly older than this id
    pub before: Option<Snowflake>,
    /// Page size, clamped to 1-100
    pub limit: Option<i64>,
}

/// Add a reaction to a message
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReactionRequest {
    #[validate(length(min = 1, max = 16, message = "Emoji must be 1-16 characters"))]
    pub emoji: String,
}
