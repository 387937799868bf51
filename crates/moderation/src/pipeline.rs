use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use sentinel_common::error::{SentinelError, SentinelResult};
use sentinel_db::moderation::models::{
    AccountStatus, AggregatedVerdict, ModerationRecord, ReputationAccount,
};
use sentinel_db::moderation::repositories::{ModerationRecordRepository, ReputationRepository};

use crate::adapter::{validate_text, ClassifierAdapter, ClassifierBackend};
use crate::aggregator::aggregate;
use crate::config::ModerationConfig;
use crate::ledger::ReputationLedger;
use crate::verdict::{ClassifierSource, ClassifierVerdict};

/// Result of an ad-hoc classification: both normalized verdicts plus the
/// aggregate, with no persistence or reputation effect.
#[derive(Debug, Clone)]
pub struct ClassifyOutcome {
    pub local: ClassifierVerdict,
    pub remote: ClassifierVerdict,
    pub verdict: AggregatedVerdict,
}

/// Orchestrates moderation for one piece of submitted content: fan out
/// both classifiers, merge, persist the record, charge the ledger, and
/// hand the verdict back to the caller.
pub struct ModerationPipeline<R, M> {
    config: ModerationConfig,
    local: ClassifierAdapter,
    remote: ClassifierAdapter,
    records: Arc<M>,
    ledger: ReputationLedger<R, M>,
}

impl<R, M> ModerationPipeline<R, M>
where
    R: ReputationRepository,
    M: ModerationRecordRepository,
{
    pub fn new(
        config: ModerationConfig,
        local_backend: Arc<dyn ClassifierBackend>,
        remote_backend: Arc<dyn ClassifierBackend>,
        accounts: R,
        records: Arc<M>,
    ) -> Self {
        let local = ClassifierAdapter::new(
            local_backend,
            Duration::from_millis(config.timeouts.local_ms),
            config.max_text_len,
        );
        let remote = ClassifierAdapter::new(
            remote_backend,
            Duration::from_millis(config.timeouts.remote_ms),
            config.max_text_len,
        );
        let ledger = ReputationLedger::new(config.policy.clone(), accounts, Arc::clone(&records));

        Self {
            config,
            local,
            remote,
            records,
            ledger,
        }
    }

    /// Moderate one content item, applying its verdict to the author's
    /// reputation exactly once.
    ///
    /// The record is durably written before the ledger mutation, so a
    /// crash between the two steps is recoverable: re-driving the same
    /// `content_id` reuses the persisted verdict instead of
    /// re-classifying.
    pub async fn moderate(
        &self,
        content_id: Uuid,
        author_id: Uuid,
        text: &str,
    ) -> SentinelResult<AggregatedVerdict> {
        let text = validate_text(text, self.config.max_text_len)?;

        if self.config.block_restricted_authors {
            let account = self.ledger.read(author_id).await?;
            if account.status == AccountStatus::Restricted {
                return Err(SentinelError::AccountRestricted(format!(
                    "account {author_id} may not submit content"
                )));
            }
        }

        if let Some(existing) = self.records.get(content_id).await? {
            tracing::info!(%content_id, "re-driving previously computed verdict");
            self.ledger
                .apply(content_id, author_id, &existing.verdict)
                .await?;
            return Ok(existing.verdict);
        }

        let (local, remote) = tokio::join!(
            self.classify_with_retry(&self.local, text),
            self.classify_with_retry(&self.remote, text),
        );
        let verdict = aggregate(&local?, &remote?);

        if verdict.degraded {
            tracing::warn!(%content_id, "verdict produced from degraded classification");
        }

        let record = ModerationRecord {
            content_id,
            author_id,
            verdict: verdict.clone(),
            applied: false,
            created_at: Utc::now(),
        };
        let record = self.records.insert(record).await?;

        self.ledger
            .apply(content_id, author_id, &record.verdict)
            .await?;

        Ok(record.verdict)
    }

    /// Ad-hoc classification: full fan-out and aggregation, no
    /// persistence and no reputation effect.
    pub async fn classify_only(&self, text: &str) -> SentinelResult<ClassifyOutcome> {
        let text = validate_text(text, self.config.max_text_len)?;

        let (local, remote) = tokio::join!(
            self.classify_with_retry(&self.local, text),
            self.classify_with_retry(&self.remote, text),
        );
        let (local, remote) = (local?, remote?);
        let verdict = aggregate(&local, &remote);

        Ok(ClassifyOutcome {
            local,
            remote,
            verdict,
        })
    }

    /// Run a single classifier through its adapter.
    pub async fn classify_single(
        &self,
        source: ClassifierSource,
        text: &str,
    ) -> SentinelResult<ClassifierVerdict> {
        let adapter = match source {
            ClassifierSource::Local => &self.local,
            ClassifierSource::Remote => &self.remote,
        };
        adapter.classify(text).await
    }

    /// Current reputation snapshot for an author.
    pub async fn reputation(&self, author_id: Uuid) -> SentinelResult<ReputationAccount> {
        self.ledger.read(author_id).await
    }

    async fn classify_with_retry(
        &self,
        adapter: &ClassifierAdapter,
        text: &str,
    ) -> SentinelResult<ClassifierVerdict> {
        let verdict = adapter.classify(text).await?;
        if verdict.is_ok() || !self.config.retry_failed {
            return Ok(verdict);
        }
        tracing::warn!(
            source = verdict.source.as_str(),
            status = verdict.status.as_str(),
            "classifier degraded, retrying once"
        );
        adapter.classify(text).await
    }
}
