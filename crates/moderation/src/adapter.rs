use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use sentinel_common::error::{SentinelError, SentinelResult};

use crate::verdict::{coerce_label, ClassifierSource, ClassifierVerdict};

/// A classifier's raw, un-normalized answer. Labels are free-form
/// strings here; the adapter coerces them to the canonical set.
#[derive(Debug, Clone)]
pub struct RawVerdict {
    pub label: String,
    pub confidence: Option<f64>,
    pub explanation: Option<String>,
}

/// An opaque classification backend: takes text, returns a label.
#[async_trait]
pub trait ClassifierBackend: Send + Sync {
    fn source(&self) -> ClassifierSource;
    async fn classify(&self, text: &str) -> SentinelResult<RawVerdict>;
}

/// Reject input the classifiers should never see. Returns the trimmed
/// text on success.
pub fn validate_text(text: &str, max_len: usize) -> SentinelResult<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(SentinelError::InvalidInput(
            "text must not be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > max_len {
        return Err(SentinelError::InvalidInput(format!(
            "text too long (max {max_len} characters)"
        )));
    }
    Ok(trimmed)
}

/// Wraps one backend with timeout enforcement, label normalization and
/// failure containment. Timeouts and backend errors become `status`
/// fields on the verdict, never hard failures; the only error this
/// adapter surfaces is `InvalidInput`.
pub struct ClassifierAdapter {
    backend: Arc<dyn ClassifierBackend>,
    timeout: Duration,
    max_text_len: usize,
}

impl ClassifierAdapter {
    pub fn new(backend: Arc<dyn ClassifierBackend>, timeout: Duration, max_text_len: usize) -> Self {
        Self {
            backend,
            timeout,
            max_text_len,
        }
    }

    pub fn source(&self) -> ClassifierSource {
        self.backend.source()
    }

    pub async fn classify(&self, text: &str) -> SentinelResult<ClassifierVerdict> {
        let text = validate_text(text, self.max_text_len)?;
        let source = self.backend.source();

        match tokio::time::timeout(self.timeout, self.backend.classify(text)).await {
            Ok(Ok(raw)) => Ok(ClassifierVerdict::ok(
                source,
                coerce_label(&raw.label),
                raw.confidence,
                raw.explanation,
            )),
            Ok(Err(e)) => {
                tracing::warn!(source = source.as_str(), error = %e, "classifier failed");
                Ok(ClassifierVerdict::error(source))
            }
            Err(_) => {
                tracing::warn!(
                    source = source.as_str(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "classifier timed out"
                );
                Ok(ClassifierVerdict::timeout(source))
            }
        }
    }
}
