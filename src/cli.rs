use clap::{Parser, ValueEnum};

/// Command-line interface definition.
/// Provides command-line options for URL risk scanning.
///
/// Verbosity levels:
/// 0 - silent (only final output)
/// 1 - errors (default)
/// 2 - warnings + errors
/// 5 - trace/debug
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Scan URLs for phishing, typosquatting, and brand impersonation using an AI reasoning service"
)]
pub struct Cli {
    /// URLs to analyze (a bare hostname gets an https:// prefix). Required
    /// unless --generate-schema is used.
    #[arg(required_unless_present = "generate_schema")]
    pub urls: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Styled)]
    pub format: OutputFormat,

    /// Verbosity level (0,1,2,5)
    #[arg(long, default_value_t = 1)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Show the session history table after scanning
    #[arg(long = "show-history")]
    pub show_history: bool,

    /// Model identifier override
    #[arg(long)]
    pub model: Option<String>,

    /// Service endpoint override (base URL)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    #[arg(long = "timeout-secs")]
    pub timeout_secs: Option<u64>,

    /// Retry attempts for transient service failures
    #[arg(long)]
    pub retries: Option<u32>,

    /// Print the JSON schema of the structured output format and exit
    #[arg(long = "generate-schema")]
    pub generate_schema: bool,
}

/// Output format selection.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Styled terminal output (default)
    Styled,
    /// Plain text without styling
    Plain,
    /// One tab-separated line per URL: url, risk level, score
    Batch,
    /// Structured JSON document
    Json,
    /// Structured YAML document
    Yaml,
}

impl Cli {
    /// Parse CLI arguments from process args.
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Convenience: are we in very verbose/debug mode?
    pub fn is_trace(&self) -> bool {
        self.verbose >= 5
    }

    /// Are warning-level messages enabled?
    pub fn warn_enabled(&self) -> bool {
        self.verbose >= 2
    }

    /// Are error-level messages enabled?
    pub fn error_enabled(&self) -> bool {
        self.verbose >= 1
    }

    /// Is a machine-readable document format selected?
    pub fn is_structured_output(&self) -> bool {
        matches!(self.format, OutputFormat::Json | OutputFormat::Yaml)
    }

    /// Should the styled formatter be used?
    pub fn should_use_styling(&self) -> bool {
        self.format == OutputFormat::Styled
    }
}
