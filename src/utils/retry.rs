//! Retry utilities for transient HTTP failures
//!
//! Requests are retried with exponential backoff when the failure is a
//! connection problem or one of the configured status codes. Parse errors
//! and other statuses fail immediately.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::HttpConfig;
use crate::errors::{FetchError, FetchResult};

/// Retry behaviour for a single request
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts including the first one
    pub max_attempts: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
    /// Add up to 25% jitter to every delay
    pub jitter: bool,
    /// Status codes considered transient
    pub retry_statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::from(&HttpConfig::default())
    }
}

impl From<&HttpConfig> for RetryConfig {
    fn from(http: &HttpConfig) -> Self {
        Self {
            max_attempts: http.retries.saturating_add(1),
            initial_delay: http.backoff,
            max_delay: http.max_backoff,
            backoff_multiplier: 2.0,
            jitter: true,
            retry_statuses: http.retry_statuses.clone(),
        }
    }
}

impl RetryConfig {
    /// Single attempt, no waiting
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            backoff_multiplier: 1.0,
            jitter: false,
            retry_statuses: Vec::new(),
        }
    }

    pub fn is_retryable(&self, error: &FetchError) -> bool {
        match error {
            FetchError::Network { .. } => true,
            FetchError::Status { status, .. } => self.retry_statuses.contains(status),
            FetchError::Parse { .. } => false,
        }
    }
}

/// Run `operation` until it succeeds, fails permanently or runs out of attempts
pub async fn with_retry<T, F, Fut>(
    config: &RetryConfig,
    mut operation: F,
    operation_name: &str,
) -> FetchResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = FetchResult<T>>,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    debug!(
                        "Request '{}' succeeded on attempt {}/{}",
                        operation_name, attempt, max_attempts
                    );
                }
                return Ok(result);
            }
            Err(err) if !config.is_retryable(&err) => {
                debug!(
                    "Request '{}' failed with non-retryable error: {}",
                    operation_name, err
                );
                return Err(err);
            }
            Err(err) if attempt >= max_attempts => {
                warn!(
                    "Request '{}' failed after {} attempts: {}",
                    operation_name, max_attempts, err
                );
                return Err(err);
            }
            Err(err) => {
                let delay = calculate_delay(config, attempt);
                warn!(
                    "Request '{}' failed on attempt {}/{}, retrying in {:?}: {}",
                    operation_name, attempt, max_attempts, delay, err
                );
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// Exponential backoff capped at `max_delay`, plus optional jitter
pub fn calculate_delay(config: &RetryConfig, attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
    let exponential_delay =
        config.initial_delay.as_millis() as f64 * config.backoff_multiplier.powi(exponent);

    let delay_ms = exponential_delay.min(config.max_delay.as_millis() as f64) as u64;

    let final_delay = if config.jitter {
        delay_ms + fastrand::u64(0..=delay_ms / 4)
    } else {
        delay_ms
    };

    Duration::from_millis(final_delay)
}
