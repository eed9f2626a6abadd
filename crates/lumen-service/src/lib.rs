//! # lumen-service
//!
//! Application layer containing business logic, services, and DTOs.
//!
//! Services borrow a [`services::ServiceContext`] and coordinate the
//! domain entities, repositories, and gateways defined in `lumen-core`.

pub mod dto;
pub mod services;

pub use services::{
    ChatService, FanoutEngine, MessageComposer, MessageService, PermissionService,
    RegexTokenizer, SendTarget, ServiceContext, ServiceContextBuilder, ServiceError,
    ServiceResult,
};
