use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Closed set of harm categories a verdict can carry.
///
/// `Unknown` is the sentinel for labels a classifier returned that could
/// not be mapped onto the canonical set; it is treated as harmful rather
/// than silently dropped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    NotBullying,
    Race,
    Gender,
    Religion,
    GeneralHarassment,
    Unknown,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotBullying => "not_bullying",
            Self::Race => "race",
            Self::Gender => "gender",
            Self::Religion => "religion",
            Self::GeneralHarassment => "general_harassment",
            Self::Unknown => "unknown",
        }
    }

    /// Everything except an explicit all-clear counts as bullying.
    /// `Unknown` is conservative-true.
    pub fn implies_bullying(&self) -> bool {
        !matches!(self, Self::NotBullying)
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::NotBullying => "Safe, neutral, or positive content",
            Self::Race => "Bullying based on race, ethnicity, or nationality",
            Self::Gender => "Bullying based on gender or sexual orientation",
            Self::Religion => "Bullying based on religious beliefs",
            Self::GeneralHarassment => "General insults, harassment, or bullying",
            Self::Unknown => "Unclassifiable content held for manual review",
        }
    }

    /// The categories exposed to clients, in display order.
    pub const ALL: &'static [Category] = &[
        Self::NotBullying,
        Self::Race,
        Self::Gender,
        Self::Religion,
        Self::GeneralHarassment,
    ];
}

impl FromStr for Category {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "not_bullying" => Ok(Self::NotBullying),
            "race" => Ok(Self::Race),
            "gender" => Ok(Self::Gender),
            "religion" => Ok(Self::Religion),
            "general_harassment" => Ok(Self::GeneralHarassment),
            "unknown" => Ok(Self::Unknown),
            _ => Err(format!("unknown category: {value}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Restricted,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Restricted => "restricted",
        }
    }
}

impl FromStr for AccountStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(Self::Active),
            "restricted" => Ok(Self::Restricted),
            _ => Err(format!("unknown account status: {value}")),
        }
    }
}

/// The authoritative moderation decision for one piece of content.
/// Created once by the aggregator and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AggregatedVerdict {
    pub is_bullying: bool,
    pub category: Category,
    pub explanation: Option<String>,
    /// True when the two classifiers returned opposite booleans.
    pub disagreement: bool,
    /// True when at least one classifier timed out or errored.
    pub degraded: bool,
}

/// Binds a content item to its verdict and to the reputation event it
/// produced. `applied` is the idempotency guard: a content item's verdict
/// is charged against its author at most once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationRecord {
    pub content_id: Uuid,
    pub author_id: Uuid,
    pub verdict: AggregatedVerdict,
    pub applied: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReputationAccount {
    pub user_id: Uuid,
    pub score: i32,
    pub flagged_count: i32,
    pub status: AccountStatus,
    pub updated_at: DateTime<Utc>,
}
