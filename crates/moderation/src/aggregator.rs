use sentinel_db::moderation::models::{AggregatedVerdict, Category};

use crate::verdict::ClassifierVerdict;

const UNAVAILABLE_EXPLANATION: &str =
    "classification unavailable, flagged for manual review";

/// Merge the two classifiers' verdicts into the authoritative decision.
///
/// Decision table, evaluated in order:
/// 1. Both Ok: the remote verdict wins (it sees more context and carries
///    an explanation); `disagreement` records whether the local verdict's
///    boolean differed.
/// 2. Exactly one Ok: that verdict is taken as-is, `degraded` set.
/// 3. Neither Ok: conservative fail-safe, flagged for manual review.
///
/// Pure function of its inputs; no classifier or network dependency.
pub fn aggregate(local: &ClassifierVerdict, remote: &ClassifierVerdict) -> AggregatedVerdict {
    match (local.is_ok(), remote.is_ok()) {
        (true, true) => AggregatedVerdict {
            is_bullying: remote.is_bullying(),
            category: remote.label,
            explanation: remote.explanation.clone(),
            disagreement: local.is_bullying() != remote.is_bullying(),
            degraded: false,
        },
        (false, true) => AggregatedVerdict {
            is_bullying: remote.is_bullying(),
            category: remote.label,
            explanation: remote.explanation.clone(),
            disagreement: false,
            degraded: true,
        },
        (true, false) => AggregatedVerdict {
            is_bullying: local.is_bullying(),
            category: local.label,
            explanation: local.explanation.clone(),
            disagreement: false,
            degraded: true,
        },
        (false, false) => AggregatedVerdict {
            is_bullying: true,
            category: Category::Unknown,
            explanation: Some(UNAVAILABLE_EXPLANATION.to_string()),
            disagreement: false,
            degraded: true,
        },
    }
}
