//! Configuration management for linksentinel.
//!
//! Settings are layered: built-in defaults, then environment variables, then
//! command-line arguments (CLI wins). The API key is environment-only — it
//! never appears on a command line.

use std::time::Duration;

use crate::cli::Cli;
use crate::errors::{LinkSentinelError, Result};

/// Default model identifier for the reasoning service.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Default base endpoint for the reasoning service.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Main configuration structure.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Reasoning-service settings
    pub api: ApiConfig,

    /// Network operation settings
    pub network: NetworkConfig,
}

/// Reasoning-service configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// API key; absent means every call fails into the sentinel path.
    pub api_key: Option<String>,

    /// Model identifier appended to the endpoint.
    pub model: String,

    /// Base endpoint (overridable for self-hosted gateways and tests).
    pub endpoint: String,
}

/// Network-related configuration.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Hard timeout for one service request. A hung service becomes a
    /// sentinel result instead of an indefinite wait.
    pub request_timeout: Duration,

    /// Retry attempts for transient failures (not counting the first try).
    pub retry_attempts: u32,

    /// Initial delay between retries.
    pub retry_delay: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            retry_attempts: 2,
            retry_delay: Duration::from_millis(250),
        }
    }
}

impl Config {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.api.api_key = std::env::var("LINKSENTINEL_API_KEY")
            .or_else(|_| std::env::var("GEMINI_API_KEY"))
            .ok()
            .filter(|k| !k.trim().is_empty());

        if let Ok(model) = std::env::var("LINKSENTINEL_MODEL") {
            if !model.trim().is_empty() {
                config.api.model = model;
            }
        }

        if let Ok(endpoint) = std::env::var("LINKSENTINEL_ENDPOINT") {
            if !endpoint.trim().is_empty() {
                config.api.endpoint = endpoint;
            }
        }

        if let Ok(timeout) = std::env::var("LINKSENTINEL_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse::<u64>() {
                config.network.request_timeout = Duration::from_secs(secs);
            }
        }

        if let Ok(attempts) = std::env::var("LINKSENTINEL_RETRY_ATTEMPTS") {
            if let Ok(n) = attempts.parse::<u32>() {
                config.network.retry_attempts = n;
            }
        }

        config
    }

    /// Merge with CLI arguments, giving CLI precedence.
    pub fn merge_with_cli(&mut self, cli: &Cli) {
        if let Some(ref model) = cli.model {
            self.api.model = model.clone();
        }

        if let Some(ref endpoint) = cli.endpoint {
            self.api.endpoint = endpoint.clone();
        }

        if let Some(secs) = cli.timeout_secs {
            self.network.request_timeout = Duration::from_secs(secs);
        }

        if let Some(retries) = cli.retries {
            self.network.retry_attempts = retries;
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.network.request_timeout.as_secs() == 0 {
            return Err(LinkSentinelError::configuration(
                "request timeout must be greater than 0 seconds",
            ));
        }

        if self.api.model.trim().is_empty() {
            return Err(LinkSentinelError::configuration(
                "model identifier must not be empty",
            ));
        }

        if !self.api.endpoint.starts_with("http://") && !self.api.endpoint.starts_with("https://") {
            return Err(LinkSentinelError::configuration(format!(
                "endpoint must be an http(s) URL, got '{}'",
                self.api.endpoint
            )));
        }

        Ok(())
    }
}
