//! Retry utilities for the analysis-service call.
//!
//! Bounded exponential backoff with jitter. The policy layer decides which
//! failures are worth another attempt: transport-level trouble and
//! rate-limit / server-side statuses are transient, everything else
//! (authentication, schema violations, other client errors) fails fast.

use std::time::Duration;

use tokio::time::{sleep, Instant};

use crate::errors::LinkSentinelError;

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (not including the initial attempt).
    pub max_attempts: u32,

    /// Initial delay between retries.
    pub initial_delay: Duration,

    /// Maximum delay between retries (for exponential backoff).
    pub max_delay: Duration,

    /// Multiplier for exponential backoff.
    pub backoff_multiplier: f64,

    /// Whether to add jitter to avoid synchronized retries.
    pub jitter: bool,

    /// Maximum total time to spend retrying.
    pub max_total_duration: Option<Duration>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(8),
            backoff_multiplier: 2.0,
            jitter: true,
            max_total_duration: Some(Duration::from_secs(90)),
        }
    }
}

/// Policy for determining whether an operation should be retried.
pub trait RetryPolicy {
    /// Returns true if the operation should be retried for this error.
    fn should_retry(&self, error: &LinkSentinelError, attempt: u32) -> bool;
}

/// Retry policy for the reasoning-service HTTP call.
///
/// Retries transport failures, timeouts, and 429/5xx statuses. Never retries
/// a missing API key, a schema violation, or any other 4xx status — those
/// won't succeed on a second attempt.
pub struct ApiRetryPolicy;

impl RetryPolicy for ApiRetryPolicy {
    fn should_retry(&self, error: &LinkSentinelError, attempt: u32) -> bool {
        if attempt >= 2 {
            return false;
        }

        match error {
            LinkSentinelError::ServiceUnavailable { .. } => true,
            LinkSentinelError::ServiceStatus { status, .. } => {
                *status == 429 || *status >= 500
            }
            _ => false,
        }
    }
}

/// Retry executor that handles the backoff loop.
pub struct RetryExecutor {
    config: RetryConfig,
}

impl RetryExecutor {
    /// Create a new retry executor with the given configuration.
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Create a retry executor with default configuration.
    pub fn with_default_config() -> Self {
        Self::new(RetryConfig::default())
    }

    /// Execute an async operation with retry logic.
    pub async fn execute<F, Fut, T, P>(
        &self,
        operation: F,
        policy: P,
    ) -> Result<T, LinkSentinelError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T, LinkSentinelError>>,
        P: RetryPolicy,
    {
        let start_time = Instant::now();
        let mut delay = self.config.initial_delay;

        for attempt in 0..=self.config.max_attempts {
            let out_of_time = self
                .config
                .max_total_duration
                .map(|max| start_time.elapsed() >= max)
                .unwrap_or(false);

            match operation().await {
                Ok(result) => return Ok(result),
                Err(error) => {
                    if out_of_time
                        || attempt >= self.config.max_attempts
                        || !policy.should_retry(&error, attempt)
                    {
                        return Err(error);
                    }

                    log::debug!(
                        "retrying after {} (attempt {} of {})",
                        error,
                        attempt + 1,
                        self.config.max_attempts
                    );

                    let actual_delay = if self.config.jitter {
                        add_jitter(delay)
                    } else {
                        delay
                    };
                    sleep(actual_delay).await;

                    delay = std::cmp::min(
                        Duration::from_millis(
                            (delay.as_millis() as f64 * self.config.backoff_multiplier) as u64,
                        ),
                        self.config.max_delay,
                    );
                }
            }
        }

        unreachable!("retry loop always returns before exhausting its range")
    }
}

/// Add random jitter (±10%) to a delay.
fn add_jitter(delay: Duration) -> Duration {
    use rand::Rng;

    let jitter_range = delay.as_millis() as f64 * 0.1;
    let mut rng = rand::thread_rng();
    let jitter: f64 = rng.gen_range(-jitter_range..=jitter_range);

    let jittered_ms = (delay.as_millis() as f64 + jitter).max(0.0) as u64;
    Duration::from_millis(jittered_ms)
}
