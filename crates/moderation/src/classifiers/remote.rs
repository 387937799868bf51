use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use sentinel_common::error::{SentinelError, SentinelResult};
use sentinel_db::moderation::models::Category;

use crate::adapter::{ClassifierBackend, RawVerdict};
use crate::verdict::ClassifierSource;

#[derive(Debug, Clone)]
pub struct RemoteClassifierConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl RemoteClassifierConfig {
    /// Returns `None` when no API key is configured; the caller degrades
    /// to an always-erroring backend instead of failing startup.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").ok()?;
        let base_url = std::env::var("GEMINI_BASE_URL")
            .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string());
        let model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.0-flash".to_string());
        let timeout_secs = std::env::var("GEMINI_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        Some(Self {
            base_url,
            api_key,
            model,
            timeout_secs,
        })
    }
}

/// LLM-backed classifier reached over the `generateContent` wire format.
/// Prompts for exactly one canonical category plus a one-line reason,
/// returned as a bare JSON object.
pub struct RemoteClassifier {
    client: reqwest::Client,
    config: RemoteClassifierConfig,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct LabelPayload {
    category: String,
    #[serde(default)]
    explanation: Option<String>,
}

impl RemoteClassifier {
    pub fn new(config: RemoteClassifierConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    /// For testing: point the client at a specific base URL (e.g., wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.config.base_url = base_url.to_string();
        self
    }

    fn prompt(text: &str) -> String {
        format!(
            "You are a content-safety reviewer. Decide whether the following text \
             contains bullying or harassment. Even mild insults like \"stupid\", \
             \"idiot\", \"loser\" or \"ugly\" count as harassment.\n\n\
             Text to analyze: \"{text}\"\n\n\
             Classify it into EXACTLY ONE of these categories:\n\
             - \"not_bullying\": neutral, positive, or harmless content\n\
             - \"race\": targets race, ethnicity, or nationality\n\
             - \"gender\": targets gender or sexual orientation\n\
             - \"religion\": targets religious beliefs or practices\n\
             - \"general_harassment\": insults or harassment not covered above\n\n\
             Respond with ONLY a JSON object in this exact format \
             (no markdown, no code blocks):\n\
             {{\"category\": \"category_name\", \"explanation\": \"brief reason\"}}"
        )
    }

    /// Parse the model's answer: strip markdown fences, try the JSON
    /// contract, fall back to scanning for a category name in plain text.
    fn parse_answer(answer: &str) -> SentinelResult<RawVerdict> {
        let cleaned = answer
            .replace("```json", "")
            .replace("```", "")
            .trim()
            .to_string();

        if let Ok(payload) = serde_json::from_str::<LabelPayload>(&cleaned) {
            return Ok(RawVerdict {
                label: payload.category,
                confidence: None,
                explanation: payload.explanation,
            });
        }

        let lower = cleaned.to_lowercase();
        for category in Category::ALL {
            if lower.contains(category.as_str()) {
                return Ok(RawVerdict {
                    label: category.as_str().to_string(),
                    confidence: None,
                    explanation: Some(cleaned),
                });
            }
        }

        Err(SentinelError::Internal(format!(
            "unparseable classifier answer: {cleaned}"
        )))
    }
}

#[async_trait]
impl ClassifierBackend for RemoteClassifier {
    fn source(&self) -> ClassifierSource {
        ClassifierSource::Remote
    }

    async fn classify(&self, text: &str) -> SentinelResult<RawVerdict> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.base_url, self.config.model, self.config.api_key
        );

        let payload = serde_json::json!({
            "contents": [{
                "parts": [{ "text": Self::prompt(text) }]
            }],
            "generationConfig": {
                "temperature": 0.1,
                "topK": 1,
                "topP": 1,
                "maxOutputTokens": 256
            }
        });

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| SentinelError::Internal(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SentinelError::Internal(format!("HTTP {status}: {body}")));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| SentinelError::Internal(format!("invalid response body: {e}")))?;

        let answer = body
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.trim().to_string())
            .ok_or_else(|| SentinelError::Internal("empty classifier response".to_string()))?;

        Self::parse_answer(&answer)
    }
}

/// Stand-in backend for a classifier that has no configuration. Every
/// call fails, which the adapter contains as a degraded verdict.
pub struct UnconfiguredClassifier {
    source: ClassifierSource,
}

impl UnconfiguredClassifier {
    pub fn remote() -> Self {
        Self {
            source: ClassifierSource::Remote,
        }
    }
}

#[async_trait]
impl ClassifierBackend for UnconfiguredClassifier {
    fn source(&self) -> ClassifierSource {
        self.source
    }

    async fn classify(&self, _text: &str) -> SentinelResult<RawVerdict> {
        Err(SentinelError::Config(format!(
            "{} classifier not configured",
            self.source.as_str()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config() -> RemoteClassifierConfig {
        RemoteClassifierConfig {
            base_url: "http://localhost".to_string(),
            api_key: "test-key".to_string(),
            model: "gemini-2.0-flash".to_string(),
            timeout_secs: 5,
        }
    }

    fn answer_body(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [{ "text": text }]
                }
            }]
        })
    }

    async fn client_for(server: &MockServer) -> RemoteClassifier {
        RemoteClassifier::new(test_config())
            .unwrap()
            .with_base_url(&server.uri())
    }

    #[tokio::test]
    async fn parses_json_answer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(answer_body(
                r#"{"category": "general_harassment", "explanation": "direct insult"}"#,
            )))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let raw = client.classify("you idiot").await.unwrap();
        assert_eq!(raw.label, "general_harassment");
        assert_eq!(raw.explanation.as_deref(), Some("direct insult"));
    }

    #[tokio::test]
    async fn strips_markdown_fences() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(answer_body(
                "```json\n{\"category\": \"race\", \"explanation\": \"targets nationality\"}\n```",
            )))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let raw = client.classify("some text").await.unwrap();
        assert_eq!(raw.label, "race");
    }

    #[tokio::test]
    async fn falls_back_to_plain_text_scan() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(answer_body(
                "The text is clearly not_bullying in nature.",
            )))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let raw = client.classify("hello friend").await.unwrap();
        assert_eq!(raw.label, "not_bullying");
    }

    #[tokio::test]
    async fn http_error_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.classify("some text").await.unwrap_err();
        assert!(matches!(err, SentinelError::Internal(_)));
    }

    #[tokio::test]
    async fn empty_candidates_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "candidates": [] })),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.classify("some text").await.unwrap_err();
        assert!(matches!(err, SentinelError::Internal(_)));
    }

    #[tokio::test]
    async fn unparseable_answer_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(answer_body("no verdict here at all")),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.classify("some text").await.unwrap_err();
        assert!(matches!(err, SentinelError::Internal(_)));
    }

    #[tokio::test]
    async fn unconfigured_backend_always_errors() {
        let backend = UnconfiguredClassifier::remote();
        let err = backend.classify("anything").await.unwrap_err();
        assert!(matches!(err, SentinelError::Config(_)));
    }
}
