//! Transaction executor
//!
//! Owns the begin / commit / rollback lifecycle so repositories only
//! describe the statements that must land together.

use sqlx::postgres::PgPool;
use sqlx::{Error as SqlxError, Postgres};
use std::future::Future;
use std::pin::Pin;

use lumen_core::DomainError;

use super::retry::{run_with_retry, RetryConfig};

/// An open PostgreSQL transaction
pub type PgTransaction = sqlx::Transaction<'static, Postgres>;

/// Boxed future returned by transactional closures
pub type TxFuture<'t, T> =
    Pin<Box<dyn Future<Output = Result<T, DomainError>> + Send + 't>>;

/// Runs closures inside a transaction, retrying serialization conflicts
#[derive(Clone)]
pub struct TxExecutor {
    pool: PgPool,
    retry: RetryConfig,
}

impl TxExecutor {
    /// Create an executor with the default retry policy
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            retry: RetryConfig::default(),
        }
    }

    /// Create an executor with a custom retry policy
    pub fn with_retry(pool: PgPool, retry: RetryConfig) -> Self {
        Self { pool, retry }
    }

    /// Run the closure inside a transaction
    ///
    /// Commits on Ok, rolls back on Err. A rolled-back attempt that failed
    /// with a transient conflict is re-run from the top with a fresh
    /// transaction; the closure must be safe to invoke again.
    pub async fn run<T, F>(&self, op: F) -> Result<T, DomainError>
    where
        T: Send,
        F: for<'t> Fn(&'t mut PgTransaction) -> TxFuture<'t, T>,
    {
        run_with_retry(&self.retry, || async {
            let mut tx = self.pool.begin().await.map_err(map_tx_error)?;
            match op(&mut tx).await {
                Ok(value) => {
                    tx.commit().await.map_err(map_tx_error)?;
                    Ok(value)
                }
                Err(e) => {
                    // Rollback failure is secondary to the original error
                    let _ = tx.rollback().await;
                    Err(e)
                }
            }
        })
        .await
    }
}

/// SQLSTATE codes PostgreSQL raises for retryable conflicts
const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";

/// Convert a SQLx error into the domain taxonomy, detecting transient
/// conflicts by SQLSTATE
pub fn map_tx_error(e: SqlxError) -> DomainError {
    if let Some(db_err) = e.as_database_error() {
        if let Some(code) = db_err.code() {
            if code == SERIALIZATION_FAILURE || code == DEADLOCK_DETECTED {
                return DomainError::WriteConflict(code.into_owned());
            }
        }
    }
    DomainError::DatabaseError(e.to_string())
}
