use async_trait::async_trait;

use sentinel_common::error::SentinelResult;
use sentinel_db::moderation::models::Category;

use crate::adapter::{ClassifierBackend, RawVerdict};
use crate::verdict::ClassifierSource;

// Term lists for the local model. Matching is on normalized text;
// extend the slices to cover additional vocabulary.

/// Terms targeting race, ethnicity, or nationality.
const RACE_TERMS: &[&str] = &[
    "your race",
    "your country",
    "your kind",
    "go back to",
    "immigrants like you",
    "your ethnicity",
];

/// Terms targeting gender or sexual orientation.
/// Written post-normalization: "you're" arrives as "you re".
const GENDER_TERMS: &[&str] = &[
    "because you re a woman",
    "because you re a man",
    "because you re a girl",
    "like a girl",
    "women can t",
    "men can t",
    "your gender",
];

/// Terms targeting religious belief or practice.
const RELIGION_TERMS: &[&str] = &[
    "your religion",
    "your god",
    "your faith",
    "your beliefs are evil",
    "religion is evil",
];

/// Generic insults and harassment.
const HARASSMENT_TERMS: &[&str] = &[
    "idiot",
    "stupid",
    "dumb",
    "dumbass",
    "moron",
    "loser",
    "ugly",
    "pathetic",
    "worthless",
    "shut up",
    "i hate you",
    "nobody likes you",
    "kill yourself",
];

/// Lowercase, strip everything non-alphabetic, collapse whitespace.
fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_was_space = true;
    for c in text.chars() {
        if c.is_ascii_alphabetic() {
            out.push(c.to_ascii_lowercase());
            last_was_space = false;
        } else if !last_was_space {
            out.push(' ');
            last_was_space = true;
        }
    }
    out.trim_end().to_string()
}

fn count_hits(normalized: &str, terms: &[&str]) -> usize {
    let padded = format!(" {normalized} ");
    terms
        .iter()
        .filter(|term| padded.contains(&format!(" {term} ")))
        .count()
}

/// Locally-hosted term-list classifier. The most-hit category wins; an
/// identity-targeted term list beats the generic insult list on ties.
pub struct LexiconClassifier;

impl LexiconClassifier {
    pub fn new() -> Self {
        Self
    }

    fn predict(text: &str) -> (Category, Option<f64>) {
        let normalized = normalize(text);

        let scored = [
            (Category::Race, count_hits(&normalized, RACE_TERMS)),
            (Category::Gender, count_hits(&normalized, GENDER_TERMS)),
            (Category::Religion, count_hits(&normalized, RELIGION_TERMS)),
            (
                Category::GeneralHarassment,
                count_hits(&normalized, HARASSMENT_TERMS),
            ),
        ];

        // Strictly-greater comparison keeps the earlier, more specific
        // category on ties.
        let mut best: Option<(Category, usize)> = None;
        for (category, hits) in scored {
            if hits > best.map_or(0, |(_, h)| h) {
                best = Some((category, hits));
            }
        }

        match best {
            Some((category, hits)) => {
                let confidence = (0.55 + 0.15 * hits as f64).min(0.95);
                (category, Some(confidence))
            }
            None => (Category::NotBullying, None),
        }
    }
}

impl Default for LexiconClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClassifierBackend for LexiconClassifier {
    fn source(&self) -> ClassifierSource {
        ClassifierSource::Local
    }

    async fn classify(&self, text: &str) -> SentinelResult<RawVerdict> {
        let (category, confidence) = Self::predict(text);
        Ok(RawVerdict {
            label: category.as_str().to_string(),
            confidence,
            explanation: None,
        })
    }
}
