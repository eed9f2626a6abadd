//! PostgreSQL implementation of MessageRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use lumen_core::entities::{Chat, ChatKind, Message, Reaction};
use lumen_core::traits::{MessageQuery, MessageRepository, RepoResult};
use lumen_core::value_objects::Snowflake;

use crate::mappers::message_from_model;
use crate::models::MessageModel;
use crate::tx::{map_tx_error, PgTransaction, TxExecutor};

use super::chat::update_chat_row_tx;
use super::error::{map_db_error, map_json_error, message_not_found};

/// PostgreSQL implementation of MessageRepository
#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
    tx: TxExecutor,
}

impl PgMessageRepository {
    /// Create a new PgMessageRepository
    pub fn new(pool: PgPool) -> Self {
        let tx = TxExecutor::new(pool.clone());
        Self { pool, tx }
    }

    async fn exists(&self, id: Snowflake) -> RepoResult<bool> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM messages WHERE id = $1)")
                .bind(id.into_inner())
                .fetch_one(&self.pool)
                .await
                .map_err(map_db_error)?;
        Ok(exists.0)
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Message>> {
        let result = sqlx::query_as::<_, MessageModel>(
            r#"
            SELECT id, chat_id, sender_id, sent_at, seen_by, reactions, data
            FROM messages
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(message_from_model).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_chat(
        &self,
        chat_id: Snowflake,
        query: MessageQuery,
    ) -> RepoResult<Vec<Message>> {
        let limit = query.limit.clamp(1, 100);

        let results = match query.before {
            Some(before) => {
                sqlx::query_as::<_, MessageModel>(
                    r#"
                    SELECT id, chat_id, sender_id, sent_at, seen_by, reactions, data
                    FROM messages
                    WHERE chat_id = $1 AND id < $2
                    ORDER BY id DESC
                    LIMIT $3
                    "#,
                )
                .bind(chat_id.into_inner())
                .bind(before.into_inner())
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, MessageModel>(
                    r#"
                    SELECT id, chat_id, sender_id, sent_at, seen_by, reactions, data
                    FROM messages
                    WHERE chat_id = $1
                    ORDER BY id DESC
                    LIMIT $2
                    "#,
                )
                .bind(chat_id.into_inner())
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(map_db_error)?;

        results.into_iter().map(message_from_model).collect()
    }

    #[instrument(skip(self, chat, message))]
    async fn append(&self, chat: &Chat, message: &Message) -> RepoResult<()> {
        let chat = chat.clone();
        let message = message.clone();
        self.tx
            .run(move |tx| {
                let chat = chat.clone();
                let message = message.clone();
                Box::pin(async move {
                    insert_message_tx(tx, &message).await?;
                    update_chat_row_tx(tx, &chat).await?;

                    // 1:1 soft-delete reset lands with the insert
                    if chat.kind == ChatKind::OneToOne {
                        for participant in &chat.participants {
                            sqlx::query(
                                r#"
                                UPDATE chat_participants
                                SET is_deleted = $3, joined_at = $4
                                WHERE chat_id = $1 AND account_id = $2
                                "#,
                            )
                            .bind(chat.id.into_inner())
                            .bind(participant.account_id.into_inner())
                            .bind(participant.is_deleted)
                            .bind(participant.joined_at)
                            .execute(&mut **tx)
                            .await
                            .map_err(map_tx_error)?;
                        }
                    }
                    Ok(())
                })
            })
            .await
    }

    #[instrument(skip(self))]
    async fn mark_seen(&self, message_id: Snowflake, account_id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET seen_by = array_append(seen_by, $2)
            WHERE id = $1 AND NOT ($2 = ANY(seen_by))
            "#,
        )
        .bind(message_id.into_inner())
        .bind(account_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        // Zero rows is either idempotent no-op or a missing message
        if result.rows_affected() == 0 && !self.exists(message_id).await? {
            return Err(message_not_found(message_id));
        }

        Ok(())
    }

    #[instrument(skip(self, reaction))]
    async fn add_reaction(&self, message_id: Snowflake, reaction: &Reaction) -> RepoResult<()> {
        let entry = serde_json::to_value(vec![reaction]).map_err(map_json_error)?;

        let result = sqlx::query(
            r#"
            UPDATE messages
            SET reactions = reactions || $2::jsonb
            WHERE id = $1 AND NOT (reactions @> $2::jsonb)
            "#,
        )
        .bind(message_id.into_inner())
        .bind(&entry)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 && !self.exists(message_id).await? {
            return Err(message_not_found(message_id));
        }

        Ok(())
    }
}

/// Insert a message row inside an open transaction
pub(super) async fn insert_message_tx(
    tx: &mut PgTransaction,
    message: &Message,
) -> RepoResult<()> {
    let data = serde_json::to_value(&message.data).map_err(map_json_error)?;
    let reactions = serde_json::to_value(&message.reactions).map_err(map_json_error)?;
    let seen_by: Vec<i64> = message.seen_by.iter().copied().map(Snowflake::into_inner).collect();

    sqlx::query(
        r#"
        INSERT INTO messages (id, chat_id, sender_id, sent_at, seen_by, reactions, data)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(message.id.into_inner())
    .bind(message.chat_id.into_inner())
    .bind(message.sender_id.into_inner())
    .bind(message.sent_at)
    .bind(&seen_by)
    .bind(&reactions)
    .bind(&data)
    .execute(&mut **tx)
    .await
    .map_err(map_tx_error)?;

    Ok(())
}
