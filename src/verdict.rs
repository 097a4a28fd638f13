//! Risk-level taxonomy and deterministic score bucketing.
//!
//! The coarse verdict is always re-derived locally from the numeric score
//! returned by the reasoning service; the service's own wording is never
//! trusted for the bucket. `Unknown` is deliberately unreachable from
//! `classify` — it is assigned only by the analyzer's failure path.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Score at or below which a URL is considered safe.
pub const SAFE_MAX_SCORE: f64 = 15.0;

/// Score at or above which a URL is considered malicious.
pub const MALICIOUS_MIN_SCORE: f64 = 75.0;

/// Coarse risk bucket derived from the numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    /// Confidently legitimate (score 0–15).
    Safe,
    /// Not confidently legitimate (score 16–74).
    Suspicious,
    /// Near-certain threat (score 75–100).
    Malicious,
    /// Analysis failed; no verdict available. Never produced by `classify`.
    Unknown,
}

impl RiskLevel {
    /// Uppercase wire/display label, matching the serialized form.
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "SAFE",
            RiskLevel::Suspicious => "SUSPICIOUS",
            RiskLevel::Malicious => "MALICIOUS",
            RiskLevel::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Map a numeric risk score onto a coarse bucket.
///
/// Total over f64 (fractional scores bucket like their neighborhood; NaN
/// falls through both comparisons into `Malicious`, the conservative bucket
/// for a paranoid scanner). Never returns `Unknown`.
pub fn classify(score: f64) -> RiskLevel {
    if score <= SAFE_MAX_SCORE {
        RiskLevel::Safe
    } else if score < MALICIOUS_MIN_SCORE {
        RiskLevel::Suspicious
    } else {
        RiskLevel::Malicious
    }
}
