use std::str::FromStr;

use serde::{Deserialize, Serialize};

use sentinel_db::moderation::models::Category;

/// Which of the two heterogeneous classifiers produced a verdict.
/// Modeled as a tagged variant so the aggregator's decision table stays
/// exhaustive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierSource {
    Local,
    Remote,
}

impl ClassifierSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierStatus {
    Ok,
    Timeout,
    Error,
}

impl ClassifierStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Timeout => "timeout",
            Self::Error => "error",
        }
    }
}

/// One classifier's normalized opinion on one text. Produced fresh per
/// classification call; never persisted standalone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassifierVerdict {
    pub source: ClassifierSource,
    pub label: Category,
    pub confidence: Option<f64>,
    pub explanation: Option<String>,
    pub status: ClassifierStatus,
}

impl ClassifierVerdict {
    pub fn ok(
        source: ClassifierSource,
        label: Category,
        confidence: Option<f64>,
        explanation: Option<String>,
    ) -> Self {
        Self {
            source,
            label,
            confidence,
            explanation,
            status: ClassifierStatus::Ok,
        }
    }

    pub fn timeout(source: ClassifierSource) -> Self {
        Self {
            source,
            label: Category::Unknown,
            confidence: None,
            explanation: None,
            status: ClassifierStatus::Timeout,
        }
    }

    pub fn error(source: ClassifierSource) -> Self {
        Self {
            source,
            label: Category::Unknown,
            confidence: None,
            explanation: None,
            status: ClassifierStatus::Error,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == ClassifierStatus::Ok
    }

    /// Only meaningful on an `Ok` verdict.
    pub fn is_bullying(&self) -> bool {
        self.label.implies_bullying()
    }
}

/// Coerce a classifier's free-form label string into the canonical
/// category set. Tries the canonical spelling first, then keyword
/// heuristics for the label vocabularies remote models actually emit.
/// Strings that match nothing become `Unknown`, never a silent drop.
pub fn coerce_label(raw: &str) -> Category {
    let trimmed = raw.trim();
    if let Ok(category) = Category::from_str(&trimmed.to_lowercase()) {
        return category;
    }

    let lower = trimmed.to_lowercase();
    if lower.contains("race") || lower.contains("ethnic") {
        Category::Race
    } else if lower.contains("gender") || lower.contains("sexual") {
        Category::Gender
    } else if lower.contains("religio") {
        Category::Religion
    } else if lower.contains("not") || lower.contains("safe") || lower.contains("neutral") {
        Category::NotBullying
    } else if lower.contains("other")
        || lower.contains("harass")
        || lower.contains("insult")
        || lower.contains("bully")
    {
        Category::GeneralHarassment
    } else {
        Category::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_accepts_canonical_labels() {
        assert_eq!(coerce_label("not_bullying"), Category::NotBullying);
        assert_eq!(coerce_label("general_harassment"), Category::GeneralHarassment);
        assert_eq!(coerce_label("  RACE "), Category::Race);
    }

    #[test]
    fn coerce_maps_remote_vocabulary() {
        assert_eq!(coerce_label("Ethnicity/Race"), Category::Race);
        assert_eq!(coerce_label("Gender/Sexual"), Category::Gender);
        assert_eq!(coerce_label("Religion"), Category::Religion);
        assert_eq!(coerce_label("Not Cyberbullying"), Category::NotBullying);
        assert_eq!(coerce_label("Other"), Category::GeneralHarassment);
    }

    #[test]
    fn coerce_never_drops_unrecognized_labels() {
        assert_eq!(coerce_label("spam"), Category::Unknown);
        assert_eq!(coerce_label(""), Category::Unknown);
        assert_eq!(coerce_label("42"), Category::Unknown);
    }

    #[test]
    fn degraded_constructors_carry_unknown_label() {
        let timeout = ClassifierVerdict::timeout(ClassifierSource::Remote);
        assert_eq!(timeout.status, ClassifierStatus::Timeout);
        assert_eq!(timeout.label, Category::Unknown);
        assert!(!timeout.is_ok());

        let error = ClassifierVerdict::error(ClassifierSource::Local);
        assert_eq!(error.status, ClassifierStatus::Error);
        assert_eq!(error.label, Category::Unknown);
    }
}
