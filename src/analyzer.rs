//! Analysis client: the boundary with the external reasoning service.
//!
//! The remote model is an opaque capability behind the `UrlClassifier`
//! trait, so the mapping and history logic can be tested against stubs with
//! no network. `GeminiClassifier` is the production implementation; it sends
//! the fixed paranoid-classifier instruction plus one user message and
//! requires a strict four-field JSON verdict back.
//!
//! `analyze` is the total entry point: it never errors to the caller.
//! Transport failures, bad statuses, unparsable payloads, and missing fields
//! all collapse into the sentinel result, which renders like any other.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{ApiConfig, NetworkConfig};
use crate::errors::{LinkSentinelError, Result};
use crate::prompt;
use crate::report::AnalysisResult;
use crate::retry::{ApiRetryPolicy, RetryConfig, RetryExecutor};

/// Upper bound on accepted response bodies. Guards against a misbehaving
/// service streaming unbounded output.
const MAX_RESPONSE_BYTES: usize = 1024 * 1024;

/// The strict verdict payload the service must produce. All four fields are
/// mandatory; a response missing any of them fails deserialization and is
/// treated as a schema violation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifierVerdict {
    pub risk_score: f64,
    pub threat_type: String,
    pub explanation: String,
    pub technical_flags: Vec<String>,
}

/// Opaque URL classification capability.
///
/// Implementations own prompt construction and transport; callers only see
/// the strict verdict or an error. Substitutable with stubs in tests.
#[async_trait]
pub trait UrlClassifier: Send + Sync {
    fn name(&self) -> &'static str;

    async fn classify(&self, url: &str) -> Result<ClassifierVerdict>;
}

/// Production classifier calling the Gemini `generateContent` endpoint.
pub struct GeminiClassifier {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    endpoint: String,
    retry: RetryConfig,
}

impl GeminiClassifier {
    /// Build a classifier from configuration. A missing API key is *not* an
    /// error here — the key is checked per call so key-less runs follow the
    /// ordinary failure path instead of refusing to start.
    pub fn new(api: &ApiConfig, network: &NetworkConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(network.request_timeout)
            .build()
            .map_err(|e| {
                LinkSentinelError::configuration(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            api_key: api.api_key.clone(),
            model: api.model.clone(),
            endpoint: api.endpoint.clone(),
            retry: RetryConfig {
                max_attempts: network.retry_attempts,
                initial_delay: network.retry_delay,
                ..Default::default()
            },
        })
    }

    async fn call_once(&self, url: &str) -> Result<ClassifierVerdict> {
        let api_key = self.api_key.as_deref().ok_or(LinkSentinelError::MissingApiKey)?;

        let request = GenerateContentRequest {
            system_instruction: ContentBlock {
                role: None,
                parts: vec![Part {
                    text: prompt::SYSTEM_INSTRUCTION.to_string(),
                }],
            },
            contents: vec![ContentBlock {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: prompt::user_message(url),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: prompt::response_schema(),
            },
        };

        let endpoint = format!(
            "{}/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        );

        let response = self
            .client
            .post(&endpoint)
            .header("x-goog-api-key", api_key)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(LinkSentinelError::service_status(status, truncate(&body, 512)));
        }

        let body = response.bytes().await?;
        if body.len() > MAX_RESPONSE_BYTES {
            return Err(LinkSentinelError::schema_violation(format!(
                "response too large ({} bytes, max {MAX_RESPONSE_BYTES})",
                body.len()
            )));
        }

        let parsed: GenerateContentResponse = serde_json::from_slice(&body)
            .map_err(|e| LinkSentinelError::schema_violation(format!("invalid envelope: {e}")))?;

        let text = parsed
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
            .ok_or_else(|| LinkSentinelError::schema_violation("no candidate payload"))?;

        if text.trim().is_empty() {
            return Err(LinkSentinelError::schema_violation("empty payload"));
        }

        let verdict: ClassifierVerdict = serde_json::from_str(text)
            .map_err(|e| LinkSentinelError::schema_violation(format!("invalid verdict: {e}")))?;

        Ok(verdict)
    }
}

#[async_trait]
impl UrlClassifier for GeminiClassifier {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn classify(&self, url: &str) -> Result<ClassifierVerdict> {
        let executor = RetryExecutor::new(self.retry.clone());
        executor
            .execute(|| self.call_once(url), ApiRetryPolicy)
            .await
    }
}

/// Run one analysis to completion. Never errors: every service failure is
/// converted into the sentinel result, stamped when finalized.
pub async fn analyze(classifier: &dyn UrlClassifier, url: &str) -> AnalysisResult {
    match classifier.classify(url).await {
        Ok(verdict) => AnalysisResult::from_verdict(
            url,
            verdict.risk_score,
            verdict.threat_type,
            verdict.explanation,
            verdict.technical_flags,
        ),
        Err(e) => {
            debug_assert!(e.is_service_failure(), "unexpected error kind: {e}");
            log::warn!(
                "analysis via {} failed for {url} ({}): {e}",
                classifier.name(),
                e.category()
            );
            AnalysisResult::connection_failure(url)
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &s[..end])
    }
}

/* ------------------------- Wire representation --------------------------- */

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: ContentBlock,
    contents: Vec<ContentBlock>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct ContentBlock {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{CONNECTION_FAILURE_FLAG, CONNECTION_FAILURE_THREAT};
    use crate::verdict::RiskLevel;

    struct FixedClassifier(ClassifierVerdict);

    #[async_trait]
    impl UrlClassifier for FixedClassifier {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn classify(&self, _url: &str) -> Result<ClassifierVerdict> {
            Ok(self.0.clone())
        }
    }

    struct FailingClassifier;

    #[async_trait]
    impl UrlClassifier for FailingClassifier {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn classify(&self, _url: &str) -> Result<ClassifierVerdict> {
            Err(LinkSentinelError::service_unavailable(
                "connect",
                std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused"),
            ))
        }
    }

    #[tokio::test]
    async fn successful_verdict_is_mapped_and_bucketed() {
        let classifier = FixedClassifier(ClassifierVerdict {
            risk_score: 95.0,
            threat_type: "Fake Site".to_string(),
            explanation: "Misspelling of google.com".to_string(),
            technical_flags: vec!["Misspelled domain".to_string()],
        });

        let result = analyze(&classifier, "https://g0ogle.com").await;
        assert_eq!(result.url, "https://g0ogle.com");
        assert_eq!(result.risk_score, 95);
        assert_eq!(result.risk_level, RiskLevel::Malicious);
        assert_eq!(result.threat_type, "Fake Site");
        assert_eq!(result.technical_flags, vec!["Misspelled domain".to_string()]);
    }

    #[tokio::test]
    async fn failure_collapses_to_sentinel_with_url_preserved() {
        let result = analyze(&FailingClassifier, "https://example.com/a?b=c").await;
        assert_eq!(result.url, "https://example.com/a?b=c");
        assert_eq!(result.risk_score, 0);
        assert_eq!(result.risk_level, RiskLevel::Unknown);
        assert_eq!(result.threat_type, CONNECTION_FAILURE_THREAT);
        assert_eq!(
            result.technical_flags,
            vec![CONNECTION_FAILURE_FLAG.to_string()]
        );
    }

    #[tokio::test]
    async fn unreachable_endpoint_follows_failure_path() {
        // Port 9 (discard) on localhost: connection refused immediately.
        let api = ApiConfig {
            api_key: Some("test-key".to_string()),
            model: "test-model".to_string(),
            endpoint: "http://127.0.0.1:9/v1beta/models".to_string(),
        };
        let network = NetworkConfig {
            request_timeout: std::time::Duration::from_secs(2),
            retry_attempts: 0,
            ..Default::default()
        };
        let classifier = GeminiClassifier::new(&api, &network).unwrap();

        let result = analyze(&classifier, "https://example.com").await;
        assert!(result.is_failure());
        assert_eq!(result.risk_level, RiskLevel::Unknown);
    }

    #[tokio::test]
    async fn missing_api_key_follows_failure_path() {
        let api = ApiConfig {
            api_key: None,
            ..Default::default()
        };
        let classifier = GeminiClassifier::new(&api, &NetworkConfig::default()).unwrap();

        let err = classifier.classify("https://example.com").await.unwrap_err();
        assert!(matches!(err, LinkSentinelError::MissingApiKey));

        let result = analyze(&classifier, "https://example.com").await;
        assert!(result.is_failure());
    }

    #[test]
    fn verdict_requires_all_fields() {
        let complete = r#"{"riskScore": 42, "threatType": "Suspicious",
                           "explanation": "unknown domain", "technicalFlags": []}"#;
        assert!(serde_json::from_str::<ClassifierVerdict>(complete).is_ok());

        let missing_flags = r#"{"riskScore": 42, "threatType": "Suspicious",
                                "explanation": "unknown domain"}"#;
        assert!(serde_json::from_str::<ClassifierVerdict>(missing_flags).is_err());

        let missing_score = r#"{"threatType": "Suspicious",
                                "explanation": "x", "technicalFlags": []}"#;
        assert!(serde_json::from_str::<ClassifierVerdict>(missing_score).is_err());
    }
}
