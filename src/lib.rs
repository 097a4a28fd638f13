//! linksentinel library: AI-assisted URL risk scanning.
//!
//! The scanner validates and normalizes a URL locally, delegates the actual
//! risk assessment to an external reasoning service behind the
//! [`analyzer::UrlClassifier`] trait, re-derives a coarse risk level from
//! the returned score, and keeps a bounded most-recent-first history of the
//! session's results. Service failures never surface as errors: they become
//! a well-formed sentinel result that renders like any other.
//!
//! # Example
//!
//! ```rust,no_run
//! use linksentinel::{Config, LinkSentinel};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env();
//! let mut session = LinkSentinel::new(&config)?;
//!
//! let item = session.scan("g0ogle.com").await?;
//! println!("{} -> {} ({}/100)", item.result.url, item.result.risk_level, item.result.risk_score);
//! # Ok(())
//! # }
//! ```

// Re-export all modules for library use
pub mod analyzer;
pub mod cli;
pub mod config;
pub mod errors;
pub mod facade;
pub mod history;
pub mod prompt;
pub mod report;
pub mod retry;
pub mod structured_output;
pub mod styled_output;
pub mod urlnorm;
pub mod verdict;

// Re-export commonly used types and functions for convenience
pub use analyzer::{analyze, ClassifierVerdict, GeminiClassifier, UrlClassifier};
pub use config::Config;
pub use errors::{ErrorCategory, LinkSentinelError, Result};
pub use facade::LinkSentinel;
pub use history::{ScanHistory, HISTORY_CAPACITY};
pub use report::{AnalysisResult, HistoryItem};
pub use urlnorm::normalize;
pub use verdict::{classify, RiskLevel};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
