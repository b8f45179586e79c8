//! Timeouts and retry logic for provider calls

use crate::{NavigatorError, Result};
use std::future::Future;
use std::time::Duration;
use tracing::{error, warn};

/// Retry configuration
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt
    pub max_retries: usize,
    /// Initial delay between retries
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Backoff multiplier
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// No retries at all
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    fn next_delay(&self, delay: Duration) -> Duration {
        Duration::from_millis(
            ((delay.as_millis() as f64) * self.multiplier).min(self.max_delay.as_millis() as f64)
                as u64,
        )
    }
}

/// Run `fut`, failing with [`NavigatorError::Timeout`] once `limit` elapses
pub async fn with_timeout<T, F>(limit: Duration, what: &str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(NavigatorError::timeout(format!(
            "{what} did not complete within {limit:?}"
        ))),
    }
}

/// Execute an operation with retry logic.
///
/// Only transient errors are retried. Permanent errors come back as-is on the
/// attempt that produced them; running out of retries yields
/// [`NavigatorError::RetriesExhausted`].
pub async fn retry_with_backoff<F, Fut, T>(config: &RetryConfig, mut f: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    let mut delay = config.initial_delay;

    loop {
        attempt += 1;
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) if !e.is_transient() => return Err(e),
            Err(e) => {
                if attempt > config.max_retries {
                    error!("All {} attempts failed: {}", attempt, e);
                    return Err(NavigatorError::RetriesExhausted {
                        attempts: attempt,
                        last_error: Box::new(e),
                    });
                }

                warn!("Attempt {} failed: {}. Retrying in {:?}", attempt, e, delay);
                tokio::time::sleep(delay).await;
                delay = config.next_delay(delay);
            }
        }
    }
}
