//! Bounded retry with fixed backoff for rate-limited fetches
//!
//! | Condition | Action |
//! |-----------|--------|
//! | Success | Return the value |
//! | Rate limited, retries left | Sleep `backoff`, try again |
//! | Rate limited, no retries left | Give up (`Exhausted`) |
//! | Any other error | Give up immediately (`Failed`) |
//!
//! The backoff sleep only suspends the retrying task; other workers keep
//! running. Dropping the future (task abort) cancels the sleep.

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::FetchError;
use std::future::Future;
use std::time::Duration;

/// Retry settings applied to rate-limited fetches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt
    pub max_retries: u32,

    /// Fixed delay before each retry
    pub backoff: Duration,
}

/// How a retried operation ended
#[derive(Debug, PartialEq, Eq)]
pub enum RetryOutcome<T> {
    Success { value: T, retries: u32 },
    Exhausted { retries: u32 },
    Failed { error: FetchError, retries: u32 },
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff: Duration) -> Self {
        Self {
            max_retries,
            backoff,
        }
    }

    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(
            config.max_rate_limit_retries,
            Duration::from_millis(config.rate_limit_backoff_ms),
        )
    }

    /// Total number of attempts including the first one
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Runs `operation` until it succeeds, fails, or runs out of retries
    ///
    /// `on_rate_limited` is called with the retry number (starting at 1)
    /// right before each backoff sleep.
    pub async fn run<T, F, Fut, R>(
        &self,
        mut operation: F,
        mut on_rate_limited: R,
    ) -> RetryOutcome<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
        R: FnMut(u32),
    {
        let mut retries = 0;

        loop {
            match operation().await {
                Ok(value) => return RetryOutcome::Success { value, retries },
                Err(FetchError::RateLimited) => {
                    if retries >= self.max_retries {
                        return RetryOutcome::Exhausted { retries };
                    }
                    retries += 1;
                    on_rate_limited(retries);
                    tokio::time::sleep(self.backoff).await;
                }
                Err(error) => return RetryOutcome::Failed { error, retries },
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(5, Duration::from_secs(2))
    }
}
