//! Service context - dependency container for services
//!
//! Holds the repositories, gateways, and shared helpers every service
//! borrows.

use std::sync::Arc;

use lumen_core::traits::{
    AccountRepository, ChatRepository, ContentGateway, MessageRepository, PushGateway,
    SocialGraph, TextTokenizer,
};
use lumen_core::SnowflakeGenerator;

/// Service context containing all dependencies
///
/// The main dependency container passed to all services. It provides:
/// - Repository ports backed by the database layer
/// - The social graph and content gateways
/// - The push gateway used by the fan-out engine
/// - Text tokenization and Snowflake ID generation
#[derive(Clone)]
pub struct ServiceContext {
    account_repo: Arc<dyn AccountRepository>,
    chat_repo: Arc<dyn ChatRepository>,
    message_repo: Arc<dyn MessageRepository>,

    social_graph: Arc<dyn SocialGraph>,
    content_gateway: Arc<dyn ContentGateway>,
    push_gateway: Arc<dyn PushGateway>,
    tokenizer: Arc<dyn TextTokenizer>,

    snowflake_generator: Arc<SnowflakeGenerator>,
    fanout_concurrency: usize,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        account_repo: Arc<dyn AccountRepository>,
        chat_repo: Arc<dyn ChatRepository>,
        message_repo: Arc<dyn MessageRepository>,
        social_graph: Arc<dyn SocialGraph>,
        content_gateway: Arc<dyn ContentGateway>,
        push_gateway: Arc<dyn PushGateway>,
        tokenizer: Arc<dyn TextTokenizer>,
        snowflake_generator: Arc<SnowflakeGenerator>,
        fanout_concurrency: usize,
    ) -> Self {
        Self {
            account_repo,
            chat_repo,
            message_repo,
            social_graph,
            content_gateway,
            push_gateway,
            tokenizer,
            snowflake_generator,
            fanout_concurrency,
        }
    }

    // === Repositories ===

    /// Get the account repository
    pub fn account_repo(&self) -> &dyn AccountRepository {
        self.account_repo.as_ref()
    }

    /// Get the chat repository
    pub fn chat_repo(&self) -> &dyn ChatRepository {
        self.chat_repo.as_ref()
    }

    /// Get the message repository
    pub fn message_repo(&self) -> &dyn MessageRepository {
        self.message_repo.as_ref()
    }

    // === Gateways ===

    /// Get the social graph (blocks and follows)
    pub fn social_graph(&self) -> &dyn SocialGraph {
        self.social_graph.as_ref()
    }

    /// Get the content gateway (attachment ownership lookups)
    pub fn content_gateway(&self) -> &dyn ContentGateway {
        self.content_gateway.as_ref()
    }

    /// Get the push gateway
    pub fn push_gateway(&self) -> &dyn PushGateway {
        self.push_gateway.as_ref()
    }

    /// Get the text tokenizer
    pub fn tokenizer(&self) -> &dyn TextTokenizer {
        self.tokenizer.as_ref()
    }

    // === Helpers ===

    /// Get the snowflake ID generator
    pub fn snowflake_generator(&self) -> &SnowflakeGenerator {
        self.snowflake_generator.as_ref()
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> lumen_core::Snowflake {
        self.snowflake_generator.generate()
    }

    /// Concurrency bound for notification fan-out
    pub fn fanout_concurrency(&self) -> usize {
        self.fanout_concurrency
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("gateways", &"...")
            .field("fanout_concurrency", &self.fanout_concurrency)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    account_repo: Option<Arc<dyn AccountRepository>>,
    chat_repo: Option<Arc<dyn ChatRepository>>,
    message_repo: Option<Arc<dyn MessageRepository>>,
    social_graph: Option<Arc<dyn SocialGraph>>,
    content_gateway: Option<Arc<dyn ContentGateway>>,
    push_gateway: Option<Arc<dyn PushGateway>>,
    tokenizer: Option<Arc<dyn TextTokenizer>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    fanout_concurrency: usize,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            account_repo: None,
            chat_repo: None,
            message_repo: None,
            social_graph: None,
            content_gateway: None,
            push_gateway: None,
            tokenizer: None,
            snowflake_generator: None,
            fanout_concurrency: 16,
        }
    }

    pub fn account_repo(mut self, repo: Arc<dyn AccountRepository>) -> Self {
        self.account_repo = Some(repo);
        self
    }

    pub fn chat_repo(mut self, repo: Arc<dyn ChatRepository>) -> Self {
        self.chat_repo = Some(repo);
        self
    }

    pub fn message_repo(mut self, repo: Arc<dyn MessageRepository>) -> Self {
        self.message_repo = Some(repo);
        self
    }

    pub fn social_graph(mut self, graph: Arc<dyn SocialGraph>) -> Self {
        self.social_graph = Some(graph);
        self
    }

    pub fn content_gateway(mut self, gateway: Arc<dyn ContentGateway>) -> Self {
        self.content_gateway = Some(gateway);
        self
    }

    pub fn push_gateway(mut self, gateway: Arc<dyn PushGateway>) -> Self {
        self.push_gateway = Some(gateway);
        self
    }

    pub fn tokenizer(mut self, tokenizer: Arc<dyn TextTokenizer>) -> Self {
        self.tokenizer = Some(tokenizer);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn fanout_concurrency(mut self, concurrency: usize) -> Self {
        self.fanout_concurrency = concurrency.max(1);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> super::error::ServiceResult<ServiceContext> {
        use super::error::ServiceError;
        Ok(ServiceContext::new(
            self.account_repo
                .ok_or_else(|| ServiceError::validation("account_repo is required"))?,
            self.chat_repo
                .ok_or_else(|| ServiceError::validation("chat_repo is required"))?,
            self.message_repo
                .ok_or_else(|| ServiceError::validation("message_repo is required"))?,
            self.social_graph
                .ok_or_else(|| ServiceError::validation("social_graph is required"))?,
            self.content_gateway
                .ok_or_else(|| ServiceError::validation("content_gateway is required"))?,
            self.push_gateway
                .ok_or_else(|| ServiceError::validation("push_gateway is required"))?,
            self.tokenizer
                .ok_or_else(|| ServiceError::validation("tokenizer is required"))?,
            self.snowflake_generator
                .ok_or_else(|| ServiceError::validation("snowflake_generator is required"))?,
            self.fanout_concurrency,
        ))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
