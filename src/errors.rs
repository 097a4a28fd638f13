//! Unified error handling for linksentinel.
//!
//! A `thiserror`-based model with:
//!   * Typed variants for the failure domains the scanner actually has
//!   * A categorization layer (`ErrorCategory`) for diagnostics & reporting
//!   * Helper constructors
//!   * `From` conversions for common lower-level errors
//!
//! Two groups of variants exist on purpose. Validation errors (`EmptyInput`,
//! `MalformedUrl`) are recovered locally and shown next to the offending
//! input; no service call is issued for them. Service-call errors
//! (`MissingApiKey`, `ServiceUnavailable`, `SchemaViolation`) never reach the
//! rendering layer as errors at all — the analyzer converts them into a
//! well-formed sentinel result. The variants still stay distinct here so
//! diagnostic logging can tell a dead network from a misbehaving service.

use std::io;

use thiserror::Error;

/// High-level classification for diagnostics / structured reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Network,
    Parse,
    Internal,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorCategory::Input => "input",
            ErrorCategory::Network => "network",
            ErrorCategory::Parse => "parse",
            ErrorCategory::Internal => "internal",
        };
        f.write_str(s)
    }
}

/// Primary application error type.
#[derive(Error, Debug)]
pub enum LinkSentinelError {
    // ------------------------ Input / Validation ----------------------------
    #[error("Please enter a link to check")]
    EmptyInput,

    #[error("'{input}' does not look like a valid link: {reason}")]
    MalformedUrl { input: String, reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    // ----------------------------- Service ----------------------------------
    #[error("No API key configured (set LINKSENTINEL_API_KEY or GEMINI_API_KEY)")]
    MissingApiKey,

    #[error("Analysis service unreachable during {operation}: {source}")]
    ServiceUnavailable {
        operation: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Analysis service returned status {status}: {body}")]
    ServiceStatus { status: u16, body: String },

    #[error("Analysis service response violated the expected schema: {reason}")]
    SchemaViolation { reason: String },

    // ----------------------------- I/O / FS ---------------------------------
    #[error("I/O error during {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: io::Error,
    },

    // ---------------------------- Internal ----------------------------------
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl LinkSentinelError {
    /// Categorize the error for diagnostics / structured output.
    pub fn category(&self) -> ErrorCategory {
        use LinkSentinelError::*;
        match self {
            EmptyInput | MalformedUrl { .. } | Configuration { .. } => ErrorCategory::Input,

            MissingApiKey | ServiceUnavailable { .. } | ServiceStatus { .. } => {
                ErrorCategory::Network
            }

            SchemaViolation { .. } => ErrorCategory::Parse,

            Io { .. } | Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// True for errors that must collapse into the sentinel analysis result
    /// rather than surfacing to the user as a distinct failure.
    pub fn is_service_failure(&self) -> bool {
        matches!(
            self,
            LinkSentinelError::MissingApiKey
                | LinkSentinelError::ServiceUnavailable { .. }
                | LinkSentinelError::ServiceStatus { .. }
                | LinkSentinelError::SchemaViolation { .. }
        )
    }

    // ---------------------------- Constructors -----------------------------

    pub fn malformed_url(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedUrl {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn service_unavailable(
        operation: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ServiceUnavailable {
            operation: operation.into(),
            source: source.into(),
        }
    }

    pub fn service_status(status: u16, body: impl Into<String>) -> Self {
        Self::ServiceStatus {
            status,
            body: body.into(),
        }
    }

    pub fn schema_violation(reason: impl Into<String>) -> Self {
        Self::SchemaViolation {
            reason: reason.into(),
        }
    }

    pub fn io(operation: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Public result alias.
pub type Result<T> = std::result::Result<T, LinkSentinelError>;

impl From<io::Error> for LinkSentinelError {
    fn from(e: io::Error) -> Self {
        LinkSentinelError::Io {
            operation: "unspecified".into(),
            source: e,
        }
    }
}

impl From<reqwest::Error> for LinkSentinelError {
    fn from(e: reqwest::Error) -> Self {
        let operation = if e.is_timeout() {
            "request (timed out)"
        } else if e.is_connect() {
            "connect"
        } else {
            "request"
        };
        LinkSentinelError::service_unavailable(operation, e)
    }
}

impl From<serde_json::Error> for LinkSentinelError {
    fn from(e: serde_json::Error) -> Self {
        LinkSentinelError::schema_violation(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_mapping() {
        assert_eq!(LinkSentinelError::EmptyInput.category(), ErrorCategory::Input);
        assert_eq!(
            LinkSentinelError::malformed_url("x", "bad").category(),
            ErrorCategory::Input
        );
        assert_eq!(
            LinkSentinelError::MissingApiKey.category(),
            ErrorCategory::Network
        );
        assert_eq!(
            LinkSentinelError::schema_violation("missing riskScore").category(),
            ErrorCategory::Parse
        );
        assert_eq!(
            LinkSentinelError::internal("boom").category(),
            ErrorCategory::Internal
        );
    }

    #[test]
    fn service_failures_collapse() {
        assert!(LinkSentinelError::MissingApiKey.is_service_failure());
        assert!(LinkSentinelError::service_status(503, "down").is_service_failure());
        assert!(LinkSentinelError::schema_violation("no payload").is_service_failure());
        assert!(!LinkSentinelError::EmptyInput.is_service_failure());
        assert!(!LinkSentinelError::malformed_url("::", "parse").is_service_failure());
    }

    #[test]
    fn display_snippets() {
        let e = LinkSentinelError::malformed_url("ht!tp//x", "relative URL without a base");
        let s = e.to_string();
        assert!(s.contains("ht!tp//x"));
        assert!(s.contains("relative URL without a base"));

        let st = LinkSentinelError::service_status(429, "quota exceeded");
        assert!(st.to_string().contains("429"));
    }

    #[test]
    fn json_error_maps_to_schema_violation() {
        let bad: std::result::Result<serde_json::Value, _> = serde_json::from_str("{nope");
        let mapped: LinkSentinelError = bad.unwrap_err().into();
        assert!(matches!(mapped, LinkSentinelError::SchemaViolation { .. }));
    }
}
