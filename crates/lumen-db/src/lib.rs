//! # lumen-db
//!
//! Database layer implementing repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for the repository traits
//! defined in `lumen-core`. It handles:
//!
//! - Connection pool management
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - Repository implementations
//! - A retrying transaction executor for multi-statement writes
//!
//! ## Usage
//!
//! ```rust,ignore
//! use lumen_db::pool::{create_pool, PoolConfig};
//! use lumen_db::repositories::PgMessageRepository;
//! use lumen_core::traits::MessageRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PoolConfig::from_env();
//!     let pool = create_pool(&config).await?;
//!     let message_repo = PgMessageRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;
pub mod tx;

// Re-export commonly used types
pub use pool::{create_pool, create_pool_from_env, PgPool, PoolConfig};
pub use repositories::{PgAccountRepository, PgChatRepository, PgMessageRepository};
pub use tx::{run_with_retry, PgTransaction, RetryConfig, TxExecutor, TxFuture};
