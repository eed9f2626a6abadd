//! Ports - repository traits and external collaborator interfaces

mod gateways;
mod repositories;

pub use gateways::{ContentGateway, ContentOwner, ContentRef, PushGateway, SocialGraph, TextTokenizer};
pub use repositories::{
    AccountRepository, ChatRepository, MessageQuery, MessageRepository, RepoResult,
};
