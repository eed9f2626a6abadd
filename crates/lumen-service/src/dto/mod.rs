//! Data transfer objects
//!
//! Request DTOs validate caller input before it reaches the services;
//! response DTOs shape entities for the outer surface.

mod mappers;
mod requests;
mod responses;

pub use requests::{
    AddParticipantsRequest, AttachmentInput, ChangeDisplayPictureRequest, CreateGroupRequest,
    FileInput, MessageHistoryRequest, ReactionRequest, RenameGroupRequest, SendMessageRequest,
};
pub use responses::{ChatResponse, MessageResponse, ParticipantResponse};
