//! Result value objects shared by the analyzer, history store, and output
//! formatters.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::verdict::{classify, RiskLevel};

/// Explanation shown when the analysis service could not be reached or
/// produced an unusable response. Transport and schema failures collapse
/// into this single user-facing message on purpose.
pub const CONNECTION_FAILURE_EXPLANATION: &str =
    "We could not reach the analysis server. Please check your internet connection and try again.";

/// Flag attached to the sentinel failure result.
pub const CONNECTION_FAILURE_FLAG: &str = "Connection Error";

/// Threat label used on the sentinel failure result.
pub const CONNECTION_FAILURE_THREAT: &str = "Error";

/// Outcome of analyzing a single URL. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct AnalysisResult {
    /// The fully-qualified URL that was submitted for analysis.
    pub url: String,

    /// Risk score 0–100 (100 = certain threat), clamped into range.
    pub risk_score: u8,

    /// Coarse bucket derived from the score, or `Unknown` on failure.
    pub risk_level: RiskLevel,

    /// Free-text threat label from the service (e.g. "Phishing"), or
    /// "Error" on failure.
    pub threat_type: String,

    /// Plain-language rationale for the verdict.
    pub explanation: String,

    /// Short indicator strings flagged by the service; may be empty.
    pub technical_flags: Vec<String>,

    /// When the result (success or failure) was finalized.
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisResult {
    /// Build a result from the raw score/labels the service returned.
    ///
    /// Bucketing runs on the raw score before clamping, so an out-of-range
    /// score still lands in the bucket its magnitude implies.
    pub fn from_verdict(
        url: impl Into<String>,
        raw_score: f64,
        threat_type: impl Into<String>,
        explanation: impl Into<String>,
        technical_flags: Vec<String>,
    ) -> Self {
        Self {
            url: url.into(),
            risk_score: clamp_score(raw_score),
            risk_level: classify(raw_score),
            threat_type: threat_type.into(),
            explanation: explanation.into(),
            technical_flags,
            analyzed_at: Utc::now(),
        }
    }

    /// Sentinel result for the failure path. Distinguishable from a genuine
    /// safe verdict by `risk_level` alone (`Unknown`, never `Safe`).
    pub fn connection_failure(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            risk_score: 0,
            risk_level: RiskLevel::Unknown,
            threat_type: CONNECTION_FAILURE_THREAT.to_string(),
            explanation: CONNECTION_FAILURE_EXPLANATION.to_string(),
            technical_flags: vec![CONNECTION_FAILURE_FLAG.to_string()],
            analyzed_at: Utc::now(),
        }
    }

    /// True when this is the failure-path sentinel rather than a verdict.
    pub fn is_failure(&self) -> bool {
        self.risk_level == RiskLevel::Unknown
    }
}

/// A recorded analysis with its history identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct HistoryItem {
    /// Unique identifier assigned at record time.
    pub id: Uuid,

    #[serde(flatten)]
    pub result: AnalysisResult,
}

impl HistoryItem {
    pub fn new(result: AnalysisResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            result,
        }
    }
}

/// Clamp a raw wire score into the 0–100 storage range.
fn clamp_score(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    raw.round().clamp(0.0, 100.0) as u8
}
