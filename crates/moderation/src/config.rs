use serde::{Deserialize, Serialize};

/// Scoring policy for the reputation ledger.
///
/// Every flagged item increments the flag counter; every
/// `flag_interval`-th flag costs `decrement` points. An account is
/// restricted once its score reaches `restrict_threshold` and never
/// recovers on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReputationPolicy {
    pub starting_score: i32,
    pub flag_interval: i32,
    pub decrement: i32,
    pub restrict_threshold: i32,
    pub score_floor: i32,
}

impl Default for ReputationPolicy {
    fn default() -> Self {
        Self {
            starting_score: 10,
            flag_interval: 2,
            decrement: 1,
            restrict_threshold: 5,
            score_floor: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierTimeouts {
    pub local_ms: u64,
    pub remote_ms: u64,
}

impl Default for ClassifierTimeouts {
    fn default() -> Self {
        Self {
            local_ms: 2_000,
            remote_ms: 30_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationConfig {
    pub policy: ReputationPolicy,
    pub timeouts: ClassifierTimeouts,
    /// Submissions longer than this are rejected before classification.
    pub max_text_len: usize,
    /// Retry a classifier once when its first verdict is degraded.
    pub retry_failed: bool,
    /// Reject submissions from restricted accounts before classification.
    /// When off, restricted authors are still classified and penalized.
    pub block_restricted_authors: bool,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            policy: ReputationPolicy::default(),
            timeouts: ClassifierTimeouts::default(),
            max_text_len: 5_000,
            retry_failed: false,
            block_restricted_authors: true,
        }
    }
}

impl ModerationConfig {
    /// Defaults overridden by `MODERATION_*` / `*_CLASSIFIER_TIMEOUT_MS`
    /// environment variables where set.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(v) = env_parse("MODERATION_STARTING_SCORE") {
            config.policy.starting_score = v;
        }
        if let Some(v) = env_parse("MODERATION_FLAG_INTERVAL") {
            config.policy.flag_interval = v;
        }
        if let Some(v) = env_parse("MODERATION_RESTRICT_THRESHOLD") {
            config.policy.restrict_threshold = v;
        }
        if let Some(v) = env_parse("LOCAL_CLASSIFIER_TIMEOUT_MS") {
            config.timeouts.local_ms = v;
        }
        if let Some(v) = env_parse("REMOTE_CLASSIFIER_TIMEOUT_MS") {
            config.timeouts.remote_ms = v;
        }
        if let Some(v) = env_parse("MAX_TEXT_LEN") {
            config.max_text_len = v;
        }
        if let Some(v) = env_parse("MODERATION_RETRY_FAILED") {
            config.retry_failed = v;
        }
        if let Some(v) = env_parse("MODERATION_BLOCK_RESTRICTED") {
            config.block_restricted_authors = v;
        }

        config
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
