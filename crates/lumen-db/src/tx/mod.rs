//! Transaction execution with conflict retry
//!
//! Multi-statement writes (message insert + chat bump, membership change +
//! banner) run through [`TxExecutor`], which wraps them in a transaction
//! and retries serialization conflicts with exponential backoff.

mod executor;
mod retry;

pub use executor::{map_tx_error, PgTransaction, TxExecutor, TxFuture};
pub use retry::{run_with_retry, RetryConfig};
