//! PostgreSQL implementation of AccountRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use lumen_core::entities::Account;
use lumen_core::traits::{AccountRepository, RepoResult};
use lumen_core::value_objects::Snowflake;

use crate::models::AccountModel;

use super::error::map_db_error;

/// PostgreSQL implementation of AccountRepository
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    /// Create a new PgAccountRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Account>> {
        let result = sqlx::query_as::<_, AccountModel>(
            r#"
            SELECT id, username, display_name, avatar, is_private, created_at, updated_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Account::from))
    }

    #[instrument(skip(self, account))]
    async fn create(&self, account: &Account) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO accounts (id, username, display_name, avatar, is_private, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(account.id.into_inner())
        .bind(&account.username)
        .bind(account.display_name.as_deref())
        .bind(account.avatar.as_deref())
        .bind(account.is_private)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}
