//! PostgreSQL implementation of ChatRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use std::collections::HashMap;

use lumen_core::entities::{Chat, Message, Participant};
use lumen_core::error::DomainError;
use lumen_core::traits::{ChatRepository, RepoResult};
use lumen_core::value_objects::Snowflake;

use crate::mappers::{chat_from_rows, chat_kind_to_str};
use crate::models::{ChatModel, ParticipantModel};
use crate::tx::{map_tx_error, PgTransaction, TxExecutor};

use super::error::map_db_error;
use super::message::insert_message_tx;

/// PostgreSQL implementation of ChatRepository
#[derive(Clone)]
pub struct PgChatRepository {
    pool: PgPool,
    tx: TxExecutor,
}

impl PgChatRepository {
    /// Create a new PgChatRepository
    pub fn new(pool: PgPool) -> Self {
        let tx = TxExecutor::new(pool.clone());
        Self { pool, tx }
    }

    async fn load_participants(&self, chat_ids: &[i64]) -> RepoResult<Vec<ParticipantModel>> {
        sqlx::query_as::<_, ParticipantModel>(
            r#"
            SELECT chat_id, account_id, is_member, is_admin, is_muted, is_pinned,
                   is_deleted, joined_at, invited_by
            FROM chat_participants
            WHERE chat_id = ANY($1)
            ORDER BY joined_at
            "#,
        )
        .bind(chat_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }
}

#[async_trait]
impl ChatRepository for PgChatRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Chat>> {
        let model = sqlx::query_as::<_, ChatModel>(
            r#"
            SELECT id, kind, name, display_picture, last_message_sent_at, created_at, updated_at
            FROM chats
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        let Some(model) = model else {
            return Ok(None);
        };
        let participants = self.load_participants(&[model.id]).await?;
        Ok(Some(chat_from_rows(model, participants)))
    }

    #[instrument(skip(self))]
    async fn find_one_to_one(&self, a: Snowflake, b: Snowflake) -> RepoResult<Option<Chat>> {
        let model = sqlx::query_as::<_, ChatModel>(
            r#"
            SELECT c.id, c.kind, c.name, c.display_picture, c.last_message_sent_at,
                   c.created_at, c.updated_at
            FROM chats c
            JOIN chat_participants pa ON pa.chat_id = c.id AND pa.account_id = $1
            JOIN chat_participants pb ON pb.chat_id = c.id AND pb.account_id = $2
            WHERE c.kind = 'one_to_one'
            "#,
        )
        .bind(a.into_inner())
        .bind(b.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        let Some(model) = model else {
            return Ok(None);
        };
        let participants = self.load_participants(&[model.id]).await?;
        Ok(Some(chat_from_rows(model, participants)))
    }

    #[instrument(skip(self))]
    async fn find_by_account(&self, account_id: Snowflake) -> RepoResult<Vec<Chat>> {
        let models = sqlx::query_as::<_, ChatModel>(
            r#"
            SELECT c.id, c.kind, c.name, c.display_picture, c.last_message_sent_at,
                   c.created_at, c.updated_at
            FROM chats c
            JOIN chat_participants p ON p.chat_id = c.id
            WHERE p.account_id = $1 AND p.is_deleted = FALSE
            ORDER BY c.last_message_sent_at DESC NULLS LAST
            "#,
        )
        .bind(account_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        if models.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        let mut by_chat: HashMap<i64, Vec<ParticipantModel>> = HashMap::new();
        for participant in self.load_participants(&ids).await? {
            by_chat.entry(participant.chat_id).or_default().push(participant);
        }

        Ok(models
            .into_iter()
            .map(|model| {
                let participants = by_chat.remove(&model.id).unwrap_or_default();
                chat_from_rows(model, participants)
            })
            .collect())
    }

    #[instrument(skip(self, chat, opening))]
    async fn create(&self, chat: &Chat, opening: Option<&Message>) -> RepoResult<()> {
        let chat = chat.clone();
        let opening = opening.cloned();
        self.tx
            .run(move |tx| {
                let chat = chat.clone();
                let opening = opening.clone();
                Box::pin(async move {
                    insert_chat_row_tx(tx, &chat).await?;
                    for participant in &chat.participants {
                        insert_participant_tx(tx, chat.id, participant).await?;
                    }
                    if let Some(opening) = &opening {
                        insert_message_tx(tx, opening).await?;
                    }
                    Ok(())
                })
            })
            .await
    }

    #[instrument(skip(self, chat, banner))]
    async fn save_membership(&self, chat: &Chat, banner: &Message) -> RepoResult<()> {
        let chat = chat.clone();
        let banner = banner.clone();
        self.tx
            .run(move |tx| {
                let chat = chat.clone();
                let banner = banner.clone();
                Box::pin(async move {
                    // The aggregate is authoritative: replace the stored set
                    sqlx::query("DELETE FROM chat_participants WHERE chat_id = $1")
                        .bind(chat.id.into_inner())
                        .execute(&mut **tx)
                        .await
                        .map_err(map_tx_error)?;
                    for participant in &chat.participants {
                        insert_participant_tx(tx, chat.id, participant).await?;
                    }
                    update_chat_row_tx(tx, &chat).await?;
                    insert_message_tx(tx, &banner).await?;
                    Ok(())
                })
            })
            .await
    }

    #[instrument(skip(self, chat, banner))]
    async fn save_profile(&self, chat: &Chat, banner: &Message) -> RepoResult<()> {
        let chat = chat.clone();
        let banner = banner.clone();
        self.tx
            .run(move |tx| {
                let chat = chat.clone();
                let banner = banner.clone();
                Box::pin(async move {
                    update_chat_row_tx(tx, &chat).await?;
                    insert_message_tx(tx, &banner).await?;
                    Ok(())
                })
            })
            .await
    }

    #[instrument(skip(self, participant))]
    async fn update_participant(
        &self,
        chat_id: Snowflake,
        participant: &Participant,
    ) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE chat_participants
            SET is_member = $3, is_admin = $4, is_muted = $5, is_pinned = $6,
                is_deleted = $7, joined_at = $8
            WHERE chat_id = $1 AND account_id = $2
            "#,
        )
        .bind(chat_id.into_inner())
        .bind(participant.account_id.into_inner())
        .bind(participant.is_member)
        .bind(participant.is_admin)
        .bind(participant.is_muted)
        .bind(participant.is_pinned)
        .bind(participant.is_deleted)
        .bind(participant.joined_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotAMember);
        }

        Ok(())
    }
}

async fn insert_chat_row_tx(tx: &mut PgTransaction, chat: &Chat) -> RepoResult<()> {
    sqlx::query(
        r#"
        INSERT INTO chats (id, kind, name, display_picture, last_message_sent_at, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(chat.id.into_inner())
    .bind(chat_kind_to_str(chat.kind))
    .bind(chat.name.as_deref())
    .bind(chat.display_picture.as_deref())
    .bind(chat.last_message_sent_at)
    .bind(chat.created_at)
    .bind(chat.updated_at)
    .execute(&mut **tx)
    .await
    .map_err(map_tx_error)?;

    Ok(())
}

// `last_message_sent_at` only moves forward: a writer holding a stale
// aggregate snapshot must not rewind the chat clock past a stored message.
pub(super) async fn update_chat_row_tx(tx: &mut PgTransaction, chat: &Chat) -> RepoResult<()> {
    sqlx::query(
        r#"
        UPDATE chats
        SET name = $2,
            display_picture = $3,
            last_message_sent_at = GREATEST(last_message_sent_at, $4),
            updated_at = $5
        WHERE id = $1
        "#,
    )
    .bind(chat.id.into_inner())
    .bind(chat.name.as_deref())
    .bind(chat.display_picture.as_deref())
    .bind(chat.last_message_sent_at)
    .bind(chat.updated_at)
    .execute(&mut **tx)
    .await
    .map_err(map_tx_error)?;

    Ok(())
}

pub(super) async fn insert_participant_tx(
    tx: &mut PgTransaction,
    chat_id: Snowflake,
    participant: &Participant,
) -> RepoResult<()> {
    sqlx::query(
        r#"
        INSERT INTO chat_participants
            (chat_id, account_id, is_member, is_admin, is_muted, is_pinned,
             is_deleted, joined_at, invited_by)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(chat_id.into_inner())
    .bind(participant.account_id.into_inner())
    .bind(participant.is_member)
    .bind(participant.is_admin)
    .bind(participant.is_muted)
    .bind(participant.is_pinned)
    .bind(participant.is_deleted)
    .bind(participant.joined_at)
    .bind(participant.invited_by.map(Snowflake::into_inner))
    .execute(&mut **tx)
    .await
    .map_err(map_tx_error)?;

    Ok(())
}
