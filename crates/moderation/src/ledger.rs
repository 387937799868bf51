use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use uuid::Uuid;

use sentinel_common::error::{SentinelError, SentinelResult};
use sentinel_db::moderation::models::{AccountStatus, AggregatedVerdict, ReputationAccount};
use sentinel_db::moderation::repositories::{ModerationRecordRepository, ReputationRepository};

use crate::config::ReputationPolicy;

/// Append-only accumulator of moderation events per author.
///
/// `apply` is serialized per author: two concurrent flagged items from the
/// same user always count twice. Different authors hold different locks
/// and never contend. The moderation record's `applied` flag is the
/// idempotency guard; a content item can only ever be charged once.
pub struct ReputationLedger<R, M> {
    policy: ReputationPolicy,
    accounts: R,
    records: Arc<M>,
    locks: Mutex<HashMap<Uuid, Arc<tokio::sync::Mutex<()>>>>,
}

impl<R, M> ReputationLedger<R, M>
where
    R: ReputationRepository,
    M: ModerationRecordRepository,
{
    pub fn new(policy: ReputationPolicy, accounts: R, records: Arc<M>) -> Self {
        Self {
            policy,
            accounts,
            records,
            locks: Mutex::new(HashMap::new()),
        }
    }

    fn author_lock(&self, author_id: Uuid) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().expect("author lock map poisoned");
        locks.entry(author_id).or_default().clone()
    }

    fn fresh_account(&self, user_id: Uuid) -> ReputationAccount {
        ReputationAccount {
            user_id,
            score: self.policy.starting_score,
            flagged_count: 0,
            status: AccountStatus::Active,
            updated_at: Utc::now(),
        }
    }

    /// Charge a content item's verdict against its author, exactly once.
    ///
    /// Re-applying an already-applied content item is a no-op that
    /// returns the current account, so crash-recovery re-drives and
    /// duplicate submissions can never double-penalize.
    pub async fn apply(
        &self,
        content_id: Uuid,
        author_id: Uuid,
        verdict: &AggregatedVerdict,
    ) -> SentinelResult<ReputationAccount> {
        let lock = self.author_lock(author_id);
        let _guard = lock.lock().await;

        let record = self.records.get(content_id).await?.ok_or_else(|| {
            SentinelError::Internal(format!(
                "moderation record must be persisted before apply: {content_id}"
            ))
        })?;

        if record.applied {
            tracing::debug!(%content_id, "verdict already applied");
            return self.read(author_id).await;
        }

        let mut account = match self.accounts.get(author_id).await? {
            Some(account) => account,
            None => self.fresh_account(author_id),
        };

        if verdict.is_bullying {
            account.flagged_count += 1;
            if account.flagged_count % self.policy.flag_interval == 0 {
                account.score =
                    (account.score - self.policy.decrement).max(self.policy.score_floor);
            }
            if account.status == AccountStatus::Active
                && account.score <= self.policy.restrict_threshold
            {
                account.status = AccountStatus::Restricted;
                tracing::warn!(%author_id, score = account.score, "account restricted");
            }
            account.updated_at = Utc::now();
            account = self.accounts.upsert(account).await?;
        }

        self.records.mark_applied(content_id).await?;

        Ok(account)
    }

    /// Current snapshot; an author with no history reads as a fresh
    /// active account at the starting score. Does not take the author
    /// lock.
    pub async fn read(&self, author_id: Uuid) -> SentinelResult<ReputationAccount> {
        Ok(self
            .accounts
            .get(author_id)
            .await?
            .unwrap_or_else(|| self.fresh_account(author_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sentinel_db::moderation::models::{Category, ModerationRecord};

    struct MemoryRecordRepo {
        records: Mutex<HashMap<Uuid, ModerationRecord>>,
    }

    impl MemoryRecordRepo {
        fn new() -> Self {
            Self {
                records: Mutex::new(HashMap::new()),
            }
        }
    }

    #[async_trait]
    impl ModerationRecordRepository for MemoryRecordRepo {
        async fn insert(&self, record: ModerationRecord) -> SentinelResult<ModerationRecord> {
            let mut records = self.records.lock().unwrap();
            let entry = records
                .entry(record.content_id)
                .or_insert_with(|| record.clone());
            Ok(entry.clone())
        }

        async fn get(&self, content_id: Uuid) -> SentinelResult<Option<ModerationRecord>> {
            Ok(self.records.lock().unwrap().get(&content_id).cloned())
        }

        async fn mark_applied(&self, content_id: Uuid) -> SentinelResult<()> {
            let mut records = self.records.lock().unwrap();
            let record = records
                .get_mut(&content_id)
                .ok_or_else(|| SentinelError::NotFound(content_id.to_string()))?;
            record.applied = true;
            Ok(())
        }
    }

    struct MemoryReputationRepo {
        accounts: Mutex<HashMap<Uuid, ReputationAccount>>,
    }

    impl MemoryReputationRepo {
        fn new() -> Self {
            Self {
                accounts: Mutex::new(HashMap::new()),
            }
        }
    }

    #[async_trait]
    impl ReputationRepository for MemoryReputationRepo {
        async fn get(&self, user_id: Uuid) -> SentinelResult<Option<ReputationAccount>> {
            Ok(self.accounts.lock().unwrap().get(&user_id).cloned())
        }

        async fn upsert(&self, account: ReputationAccount) -> SentinelResult<ReputationAccount> {
            self.accounts
                .lock()
                .unwrap()
                .insert(account.user_id, account.clone());
            Ok(account)
        }
    }

    fn flagged_verdict() -> AggregatedVerdict {
        AggregatedVerdict {
            is_bullying: true,
            category: Category::GeneralHarassment,
            explanation: None,
            disagreement: false,
            degraded: false,
        }
    }

    fn clean_verdict() -> AggregatedVerdict {
        AggregatedVerdict {
            is_bullying: false,
            category: Category::NotBullying,
            explanation: None,
            disagreement: false,
            degraded: false,
        }
    }

    fn ledger() -> ReputationLedger<MemoryReputationRepo, MemoryRecordRepo> {
        ReputationLedger::new(
            ReputationPolicy::default(),
            MemoryReputationRepo::new(),
            Arc::new(MemoryRecordRepo::new()),
        )
    }

    async fn seed_record(
        ledger: &ReputationLedger<MemoryReputationRepo, MemoryRecordRepo>,
        content_id: Uuid,
        author_id: Uuid,
        verdict: &AggregatedVerdict,
    ) {
        ledger
            .records
            .insert(ModerationRecord {
                content_id,
                author_id,
                verdict: verdict.clone(),
                applied: false,
                created_at: Utc::now(),
            })
            .await
            .unwrap();
    }

    async fn apply_flagged(
        ledger: &ReputationLedger<MemoryReputationRepo, MemoryRecordRepo>,
        author_id: Uuid,
    ) -> ReputationAccount {
        let content_id = Uuid::new_v4();
        let verdict = flagged_verdict();
        seed_record(ledger, content_id, author_id, &verdict).await;
        ledger.apply(content_id, author_id, &verdict).await.unwrap()
    }

    #[tokio::test]
    async fn clean_verdict_does_not_mutate() {
        let ledger = ledger();
        let author = Uuid::new_v4();
        let content = Uuid::new_v4();
        let verdict = clean_verdict();
        seed_record(&ledger, content, author, &verdict).await;

        let account = ledger.apply(content, author, &verdict).await.unwrap();
        assert_eq!(account.score, 10);
        assert_eq!(account.flagged_count, 0);
        assert_eq!(account.status, AccountStatus::Active);
    }

    #[tokio::test]
    async fn four_flags_cost_two_points() {
        let ledger = ledger();
        let author = Uuid::new_v4();

        for _ in 0..3 {
            apply_flagged(&ledger, author).await;
        }
        let account = apply_flagged(&ledger, author).await;
        assert_eq!(account.flagged_count, 4);
        assert_eq!(account.score, 8);
        assert_eq!(account.status, AccountStatus::Active);
    }

    #[tokio::test]
    async fn ten_flags_restrict_the_account() {
        let ledger = ledger();
        let author = Uuid::new_v4();

        for _ in 0..9 {
            apply_flagged(&ledger, author).await;
        }
        let account = apply_flagged(&ledger, author).await;
        assert_eq!(account.flagged_count, 10);
        assert_eq!(account.score, 5);
        assert_eq!(account.status, AccountStatus::Restricted);
    }

    #[tokio::test]
    async fn restriction_is_sticky() {
        let ledger = ledger();
        let author = Uuid::new_v4();

        for _ in 0..10 {
            apply_flagged(&ledger, author).await;
        }
        // Clean content afterwards does not lift the restriction.
        let content = Uuid::new_v4();
        let verdict = clean_verdict();
        seed_record(&ledger, content, author, &verdict).await;
        let account = ledger.apply(content, author, &verdict).await.unwrap();
        assert_eq!(account.status, AccountStatus::Restricted);
    }

    #[tokio::test]
    async fn apply_is_idempotent_per_content_item() {
        let ledger = ledger();
        let author = Uuid::new_v4();
        let content = Uuid::new_v4();
        let verdict = flagged_verdict();
        seed_record(&ledger, content, author, &verdict).await;

        let first = ledger.apply(content, author, &verdict).await.unwrap();
        let second = ledger.apply(content, author, &verdict).await.unwrap();

        assert_eq!(first.flagged_count, 1);
        assert_eq!(second.flagged_count, 1);
        assert_eq!(first.score, second.score);
    }

    #[tokio::test]
    async fn apply_without_record_is_an_error() {
        let ledger = ledger();
        let err = ledger
            .apply(Uuid::new_v4(), Uuid::new_v4(), &flagged_verdict())
            .await
            .unwrap_err();
        assert!(matches!(err, SentinelError::Internal(_)));
    }

    #[tokio::test]
    async fn score_clamps_at_floor() {
        let ledger = ledger();
        let author = Uuid::new_v4();

        // 30 flags would cost 15 points from a starting 10; the floor holds.
        for _ in 0..29 {
            apply_flagged(&ledger, author).await;
        }
        let account = apply_flagged(&ledger, author).await;
        assert_eq!(account.flagged_count, 30);
        assert_eq!(account.score, 0);
        assert_eq!(account.status, AccountStatus::Restricted);
    }

    #[tokio::test]
    async fn hundred_concurrent_applies_lose_no_updates() {
        let ledger = Arc::new(ledger());
        let author = Uuid::new_v4();

        // Seed 100 distinct content items up front.
        let mut content_ids = Vec::new();
        for _ in 0..100 {
            let content_id = Uuid::new_v4();
            seed_record(&ledger, content_id, author, &flagged_verdict()).await;
            content_ids.push(content_id);
        }

        let mut handles = Vec::new();
        for content_id in content_ids {
            let ledger = Arc::clone(&ledger);
            handles.push(tokio::spawn(async move {
                ledger
                    .apply(content_id, author, &flagged_verdict())
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let account = ledger.read(author).await.unwrap();
        assert_eq!(account.flagged_count, 100);
        // 50 decrements from a starting 10, clamped at the floor of 0.
        assert_eq!(account.score, 0);
        assert_eq!(account.status, AccountStatus::Restricted);
    }

    #[tokio::test]
    async fn different_authors_do_not_interfere() {
        let ledger = ledger();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        apply_flagged(&ledger, alice).await;
        apply_flagged(&ledger, alice).await;
        let bob_account = apply_flagged(&ledger, bob).await;

        let alice_account = ledger.read(alice).await.unwrap();
        assert_eq!(alice_account.flagged_count, 2);
        assert_eq!(alice_account.score, 9);
        assert_eq!(bob_account.flagged_count, 1);
        assert_eq!(bob_account.score, 10);
    }

    #[tokio::test]
    async fn read_of_unknown_author_is_a_fresh_account() {
        let ledger = ledger();
        let account = ledger.read(Uuid::new_v4()).await.unwrap();
        assert_eq!(account.score, 10);
        assert_eq!(account.flagged_count, 0);
        assert_eq!(account.status, AccountStatus::Active);
    }
}
