//! Test world - wires the in-memory fixtures into a service context

use std::sync::Arc;

use lumen_core::entities::Account;
use lumen_core::traits::MessageRepository;
use lumen_core::{Snowflake, SnowflakeGenerator};
use lumen_service::{RegexTokenizer, ServiceContext, ServiceContextBuilder};

use crate::fixtures::{
    ConflictingMessageRepository, InMemoryAccountRepository, InMemoryChatRepository,
    InMemoryMessageRepository, InMemoryStore, RecordingPushGateway, StaticContentGateway,
    StaticSocialGraph,
};

/// Fully wired service context over in-memory fixtures
pub struct TestWorld {
    pub ctx: ServiceContext,
    pub store: Arc<InMemoryStore>,
    pub accounts: Arc<InMemoryAccountRepository>,
    pub social: Arc<StaticSocialGraph>,
    pub content: Arc<StaticContentGateway>,
    pub push: Arc<RecordingPushGateway>,
}

impl TestWorld {
    pub fn new() -> Self {
        let store = InMemoryStore::new();
        let message_repo = Arc::new(InMemoryMessageRepository::new(store.clone()));
        Self::wire(store, message_repo)
    }

    /// World whose message appends hit `conflicts` transient conflicts
    /// before landing
    pub fn with_append_conflicts(conflicts: u32) -> (Self, Arc<ConflictingMessageRepository>) {
        let store = InMemoryStore::new();
        let message_repo = Arc::new(ConflictingMessageRepository::new(store.clone(), conflicts));
        (Self::wire(store, message_repo.clone()), message_repo)
    }

    fn wire(store: Arc<InMemoryStore>, message_repo: Arc<dyn MessageRepository>) -> Self {
        let accounts = InMemoryAccountRepository::new();
        let social = StaticSocialGraph::new();
        let content = StaticContentGateway::new();
        let push = RecordingPushGateway::new();

        let ctx = ServiceContextBuilder::new()
            .account_repo(accounts.clone())
            .chat_repo(Arc::new(InMemoryChatRepository::new(store.clone())))
            .message_repo(message_repo)
            .social_graph(social.clone())
            .content_gateway(content.clone())
            .push_gateway(push.clone())
            .tokenizer(Arc::new(RegexTokenizer::new()))
            .snowflake_generator(Arc::new(SnowflakeGenerator::new(0)))
            .fanout_concurrency(4)
            .build()
            .expect("context wiring");

        Self {
            ctx,
            store,
            accounts,
            social,
            content,
            push,
        }
    }

    /// Seed an account and return it
    pub fn account(&self, id: i64, username: &str) -> Account {
        let account = Account::new(Snowflake::new(id), username.to_string());
        self.accounts.insert(account.clone());
        account
    }

    /// Seed a private account
    pub fn private_account(&self, id: i64, username: &str) -> Account {
        let mut account = Account::new(Snowflake::new(id), username.to_string());
        account.set_private(true);
        self.accounts.insert(account.clone());
        account
    }

    /// Record mutual follows so group targets join as active members
    pub fn mutual_follow(&self, a: Snowflake, b: Snowflake) {
        self.social.follow(a, b);
        self.social.follow(b, a);
    }
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}
