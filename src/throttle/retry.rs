//! Bounded exponential-backoff retries
//!
//! | Condition | Action |
//! |-----------|--------|
//! | Success | Return the value |
//! | Non-retryable error | Return immediately, no backoff |
//! | Retryable error, budget left | Sleep `min(base * 2^attempt, max)`, try again |
//! | Retryable error, budget spent | Return the last error |

use crate::config::ScraperConfig;
use rand::Rng;
use std::future::Future;
use std::time::Duration;

/// Classifies an error as worth another attempt or not
pub trait RetryableError {
    fn is_retryable(&self) -> bool;
}

/// Information handed to the operation on every attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryAttempt {
    /// Attempt index, starting at 0
    pub index: u32,

    /// Backoff slept before this attempt (zero for the first attempt)
    pub backoff: Duration,
}

/// Final result of [`RetryPolicy::execute`]
#[derive(Debug)]
pub struct RetryOutcome<T, E> {
    /// The operation's value, or the error of the last attempt
    pub result: Result<T, E>,

    /// How many times the operation was invoked
    pub attempts_made: u32,
}

/// Retry configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Additional attempts after the first one
    pub max_retries: u32,

    /// Backoff before the first retry
    pub base_delay: Duration,

    /// Ceiling for any single backoff
    pub max_delay: Duration,

    /// Scale each backoff by a random factor in [0.5, 1.0]
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            jitter: false,
        }
    }
}

impl RetryPolicy {
    /// Builds a policy from the scraper configuration
    pub fn from_config(config: &ScraperConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: config.base_delay(),
            max_delay: config.max_delay(),
            jitter: config.jitter,
        }
    }

    /// Total number of attempts this policy allows
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Computes the backoff to sleep after the failed attempt `attempt`
    ///
    /// `base_delay * 2^attempt`, saturating at `max_delay` for any attempt
    /// index instead of overflowing.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let delay = 2u32
            .checked_pow(attempt)
            .and_then(|factor| self.base_delay.checked_mul(factor))
            .unwrap_or(self.max_delay)
            .min(self.max_delay);

        if self.jitter {
            let factor: f64 = rand::thread_rng().gen_range(0.5..=1.0);
            Duration::try_from_secs_f64(delay.as_secs_f64() * factor).unwrap_or(delay)
        } else {
            delay
        }
    }

    /// Runs `operation` until it succeeds, fails permanently, or the retry
    /// budget is spent
    ///
    /// # Arguments
    ///
    /// * `operation` - Called once per attempt with the attempt details
    ///
    /// # Returns
    ///
    /// A [`RetryOutcome`] holding the last result and the number of attempts
    /// made. With `max_retries = 0` the operation runs exactly once.
    pub async fn execute<T, E, F, Fut>(&self, mut operation: F) -> RetryOutcome<T, E>
    where
        E: RetryableError + std::fmt::Display,
        F: FnMut(RetryAttempt) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let max_attempts = self.max_attempts();
        let mut backoff = Duration::ZERO;
        let mut index = 0;

        loop {
            let attempts_made = index + 1;

            let error = match operation(RetryAttempt { index, backoff }).await {
                Ok(value) => {
                    return RetryOutcome {
                        result: Ok(value),
                        attempts_made,
                    }
                }
                Err(error) => error,
            };

            if !error.is_retryable() {
                tracing::debug!("Non-retryable failure on attempt {}: {}", attempts_made, error);
                return RetryOutcome {
                    result: Err(error),
                    attempts_made,
                };
            }

            if attempts_made >= max_attempts {
                tracing::debug!("Retries exhausted after {} attempts: {}", attempts_made, error);
                return RetryOutcome {
                    result: Err(error),
                    attempts_made,
                };
            }

            backoff = self.backoff_delay(index);
            tracing::warn!(
                "{} (attempt {}/{}), retrying in {:?}",
                error,
                attempts_made,
                max_attempts,
                backoff
            );
            tokio::time::sleep(backoff).await;
            index += 1;
        }
    }
}
