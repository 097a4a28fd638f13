//! Structured output module for JSON and YAML serialization.
//!
//! Defines the machine-readable document emitted by `--format json|yaml`:
//! tool metadata, one record per submitted URL, aggregate statistics, and
//! any warnings produced along the way. The document shape is stable and a
//! JSON schema for it can be generated with `--generate-schema`.

use anyhow::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::report::HistoryItem;
use crate::verdict::RiskLevel;

/// Root structure for all linksentinel output in structured formats.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct ScanOutput {
    /// Tool version and metadata
    pub metadata: OutputMetadata,

    /// One record per submitted URL, in submission order
    pub scans: Vec<ScanRecord>,

    /// Aggregate statistics for the run
    pub statistics: ScanStatistics,

    /// Warnings encountered during processing
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<String>,

    /// Success status and result summary
    pub result: ResultSummary,
}

/// Tool metadata and versioning information.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct OutputMetadata {
    /// Tool name
    pub tool_name: String,

    /// Tool version
    pub version: String,

    /// Timestamp when the document was generated
    pub generated_at: chrono::DateTime<chrono::Utc>,

    /// Schema version for this output format
    pub schema_version: String,
}

/// One analyzed URL with its outcome.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct ScanRecord {
    /// The input exactly as the user submitted it
    pub raw_input: String,

    #[serde(flatten)]
    pub item: HistoryItem,
}

/// Aggregate statistics for the run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct ScanStatistics {
    /// URLs submitted on the command line
    pub urls_submitted: u32,

    /// Scans that produced a verdict
    pub verdicts: u32,

    /// Scans that ended in the failure-path sentinel
    pub failures: u32,

    /// Inputs rejected before any service call
    pub rejected_inputs: u32,

    /// Wall-clock duration of the whole run
    pub total_time_ms: u64,
}

/// Result summary and status.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct ResultSummary {
    /// True when every submitted URL produced a verdict
    pub success: bool,

    /// Highest risk level observed across the run (absent when no scan
    /// produced a verdict)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highest_risk: Option<RiskLevel>,
}

impl ScanOutput {
    /// Create an empty output document with current metadata.
    pub fn new() -> Self {
        Self {
            metadata: OutputMetadata {
                tool_name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                generated_at: chrono::Utc::now(),
                schema_version: "1.0.0".to_string(),
            },
            scans: Vec::new(),
            statistics: ScanStatistics::default(),
            warnings: Vec::new(),
            result: ResultSummary {
                success: false,
                highest_risk: None,
            },
        }
    }

    /// Append a completed scan and update the running statistics.
    pub fn push_scan(&mut self, raw_input: impl Into<String>, item: HistoryItem) {
        if item.result.is_failure() {
            self.statistics.failures += 1;
        } else {
            self.statistics.verdicts += 1;
            self.result.highest_risk = Some(match self.result.highest_risk {
                Some(prev) => max_risk(prev, item.result.risk_level),
                None => item.result.risk_level,
            });
        }
        self.scans.push(ScanRecord {
            raw_input: raw_input.into(),
            item,
        });
    }

    /// Record an input rejected by validation.
    pub fn push_rejected(&mut self, raw_input: &str, reason: &str) {
        self.statistics.rejected_inputs += 1;
        self.warnings.push(format!("{raw_input}: {reason}"));
    }

    /// Close the document: stamp totals and the success flag.
    pub fn finalize(&mut self, urls_submitted: u32, total_time_ms: u64) {
        self.statistics.urls_submitted = urls_submitted;
        self.statistics.total_time_ms = total_time_ms;
        self.result.success = self.statistics.failures == 0
            && self.statistics.rejected_inputs == 0
            && self.statistics.verdicts > 0;
    }

    /// Generate the JSON schema for this output format.
    pub fn generate_json_schema() -> Result<String> {
        let schema = schemars::schema_for!(ScanOutput);
        Ok(serde_json::to_string_pretty(&schema)?)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

impl Default for ScanOutput {
    fn default() -> Self {
        Self::new()
    }
}

/// Ordering helper: the more severe of two risk levels, with `Unknown`
/// weakest (it never competes — failures don't reach this path).
fn max_risk(a: RiskLevel, b: RiskLevel) -> RiskLevel {
    fn rank(level: RiskLevel) -> u8 {
        match level {
            RiskLevel::Unknown => 0,
            RiskLevel::Safe => 1,
            RiskLevel::Suspicious => 2,
            RiskLevel::Malicious => 3,
        }
    }
    if rank(b) > rank(a) {
        b
    } else {
        a
    }
}
