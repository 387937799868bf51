use std::str::FromStr;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::moderation::models::{
    AccountStatus, AggregatedVerdict, Category, ModerationRecord, ReputationAccount,
};
use crate::moderation::repositories::{ModerationRecordRepository, ReputationRepository};
use sentinel_common::error::{SentinelError, SentinelResult};

#[derive(Clone)]
pub struct PgModerationRecordRepository {
    pool: PgPool,
}

impl PgModerationRecordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_record_row(row: PgRow) -> SentinelResult<ModerationRecord> {
        let category_raw: String = row.get("category");
        let category = Category::from_str(&category_raw).map_err(SentinelError::Internal)?;

        Ok(ModerationRecord {
            content_id: row.get("content_id"),
            author_id: row.get("author_id"),
            verdict: AggregatedVerdict {
                is_bullying: row.get("is_bullying"),
                category,
                explanation: row.get("explanation"),
                disagreement: row.get("disagreement"),
                degraded: row.get("degraded"),
            },
            applied: row.get("applied"),
            created_at: row.get("created_at"),
        })
    }
}

#[async_trait]
impl ModerationRecordRepository for PgModerationRecordRepository {
    async fn insert(&self, record: ModerationRecord) -> SentinelResult<ModerationRecord> {
        sqlx::query(
            "insert into moderation_records \
             (content_id, author_id, is_bullying, category, explanation, disagreement, degraded, applied, created_at) \
             values ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             on conflict (content_id) do nothing",
        )
        .bind(record.content_id)
        .bind(record.author_id)
        .bind(record.verdict.is_bullying)
        .bind(record.verdict.category.as_str())
        .bind(&record.verdict.explanation)
        .bind(record.verdict.disagreement)
        .bind(record.verdict.degraded)
        .bind(record.applied)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| SentinelError::Database(e.to_string()))?;

        // Re-read so a lost insert race still returns the winning row.
        self.get(record.content_id).await?.ok_or_else(|| {
            SentinelError::Internal(format!(
                "moderation record vanished after insert: {}",
                record.content_id
            ))
        })
    }

    async fn get(&self, content_id: Uuid) -> SentinelResult<Option<ModerationRecord>> {
        let row = sqlx::query(
            "select content_id, author_id, is_bullying, category, explanation, disagreement, degraded, applied, created_at \
             from moderation_records where content_id = $1",
        )
        .bind(content_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| SentinelError::Database(e.to_string()))?;

        row.map(Self::map_record_row).transpose()
    }

    async fn mark_applied(&self, content_id: Uuid) -> SentinelResult<()> {
        let result = sqlx::query(
            "update moderation_records set applied = true where content_id = $1",
        )
        .bind(content_id)
        .execute(&self.pool)
        .await
        .map_err(|e| SentinelError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(SentinelError::NotFound(format!(
                "moderation record not found: {content_id}"
            )));
        }

        Ok(())
    }
}

#[derive(Clone)]
pub struct PgReputationRepository {
    pool: PgPool,
}

impl PgReputationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_account_row(row: PgRow) -> SentinelResult<ReputationAccount> {
        let status_raw: String = row.get("status");
        let status = AccountStatus::from_str(&status_raw).map_err(SentinelError::Internal)?;

        Ok(ReputationAccount {
            user_id: row.get("user_id"),
            score: row.get("score"),
            flagged_count: row.get("flagged_count"),
            status,
            updated_at: row.get("updated_at"),
        })
    }
}

#[async_trait]
impl ReputationRepository for PgReputationRepository {
    async fn get(&self, user_id: Uuid) -> SentinelResult<Option<ReputationAccount>> {
        let row = sqlx::query(
            "select user_id, score, flagged_count, status, updated_at \
             from reputation_accounts where user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| SentinelError::Database(e.to_string()))?;

        row.map(Self::map_account_row).transpose()
    }

    async fn upsert(&self, account: ReputationAccount) -> SentinelResult<ReputationAccount> {
        let row = sqlx::query(
            "insert into reputation_accounts (user_id, score, flagged_count, status, updated_at) \
             values ($1, $2, $3, $4, $5) \
             on conflict (user_id) do update set \
               score = excluded.score, \
               flagged_count = excluded.flagged_count, \
               status = excluded.status, \
               updated_at = excluded.updated_at \
             returning user_id, score, flagged_count, status, updated_at",
        )
        .bind(account.user_id)
        .bind(account.score)
        .bind(account.flagged_count)
        .bind(account.status.as_str())
        .bind(account.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| SentinelError::Database(e.to_string()))?;

        Self::map_account_row(row)
    }
}
