use async_trait::async_trait;
use uuid::Uuid;

use crate::moderation::models::{ModerationRecord, ReputationAccount};
use sentinel_common::error::SentinelResult;

#[async_trait]
pub trait ModerationRecordRepository: Send + Sync {
    /// Insert a record keyed by `content_id`. If a record already exists
    /// for that content item the existing row wins and is returned
    /// unchanged, so concurrent writers converge on one verdict.
    async fn insert(&self, record: ModerationRecord) -> SentinelResult<ModerationRecord>;

    async fn get(&self, content_id: Uuid) -> SentinelResult<Option<ModerationRecord>>;

    /// Flip the idempotency guard after the ledger mutation landed.
    async fn mark_applied(&self, content_id: Uuid) -> SentinelResult<()>;
}

#[async_trait]
pub trait ReputationRepository: Send + Sync {
    async fn get(&self, user_id: Uuid) -> SentinelResult<Option<ReputationAccount>>;

    /// Insert or overwrite the account row for `account.user_id`.
    async fn upsert(&self, account: ReputationAccount) -> SentinelResult<ReputationAccount>;
}
