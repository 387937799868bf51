use serde::Serialize;

use sentinel_moderation::{ClassifierVerdict, ClassifyOutcome};

/// Full dual-classifier result for one text.
#[derive(Debug, Serialize)]
pub struct ClassificationResponse {
    pub text: String,
    pub local_model_label: Option<String>,
    pub remote_label: Option<String>,
    pub remote_explanation: Option<String>,
    pub final_label: String,
    pub is_bullying: bool,
    pub bullying_type: Option<String>,
}

impl ClassificationResponse {
    pub fn from_outcome(text: &str, outcome: &ClassifyOutcome) -> Self {
        let verdict = &outcome.verdict;
        Self {
            text: text.to_string(),
            local_model_label: ok_label(&outcome.local),
            remote_label: ok_label(&outcome.remote),
            remote_explanation: outcome.remote.explanation.clone(),
            final_label: verdict.category.as_str().to_string(),
            is_bullying: verdict.is_bullying,
            bullying_type: verdict
                .is_bullying
                .then(|| verdict.category.as_str().to_string()),
        }
    }
}

fn ok_label(verdict: &ClassifierVerdict) -> Option<String> {
    verdict.is_ok().then(|| verdict.label.as_str().to_string())
}

/// One classifier's normalized result.
#[derive(Debug, Serialize)]
pub struct SingleClassifierResponse {
    pub text: String,
    pub source: String,
    pub label: String,
    pub status: String,
    pub confidence: Option<f64>,
    pub explanation: Option<String>,
    pub is_bullying: bool,
}

impl SingleClassifierResponse {
    pub fn from_verdict(text: &str, verdict: &ClassifierVerdict) -> Self {
        Self {
            text: text.to_string(),
            source: verdict.source.as_str().to_string(),
            label: verdict.label.as_str().to_string(),
            status: verdict.status.as_str().to_string(),
            confidence: verdict.confidence,
            explanation: verdict.explanation.clone(),
            is_bullying: verdict.is_bullying(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryInfo {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<CategoryInfo>,
}
