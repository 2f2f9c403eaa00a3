//! Single-URL fetcher
//!
//! # Request Flow
//!
//! 1. Validate the URL; a malformed URL fails immediately with
//!    `attempts_made = 0` and never reaches the transport
//! 2. For each attempt allowed by the retry policy:
//!    a. Wait for an admission from the rate limiter
//!    b. Call the transport under the per-attempt deadline
//! 3. Return a [`FetchOutcome`]

use crate::fetch::{FetchError, FetchFailure, FetchOutcome, Transport};
use crate::throttle::{RateLimiter, RetryAttempt, RetryPolicy};
use crate::url::validate_url;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Fetches single URLs through the rate limiter and retry policy
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    limiter: Arc<RateLimiter>,
    retry: RetryPolicy,
    timeout: Duration,
}

impl Fetcher {
    /// Creates a new fetcher
    ///
    /// # Arguments
    ///
    /// * `transport` - The HTTP transport to issue requests with
    /// * `limiter` - Admission gate shared by every request of a run
    /// * `retry` - Retry policy applied per URL
    /// * `timeout` - Deadline for each individual attempt
    pub fn new(
        transport: Arc<dyn Transport>,
        limiter: Arc<RateLimiter>,
        retry: RetryPolicy,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            limiter,
            retry,
            timeout,
        }
    }

    /// Fetches a URL and classifies the result
    ///
    /// Never returns an error: every failure is folded into
    /// [`FetchOutcome::Failure`].
    pub async fn fetch(&self, url: &str) -> FetchOutcome {
        let parsed = match validate_url(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid URL {}: {}", url, e);
                return FetchOutcome::Failure(FetchFailure::new(
                    url,
                    FetchError::validation(e.to_string()),
                    0,
                ));
            }
        };

        let outcome = self
            .retry
            .execute(|attempt| self.attempt(&parsed, attempt))
            .await;

        match outcome.result {
            Ok(content) => {
                tracing::info!("Fetched: {}", url);
                FetchOutcome::Success {
                    url: url.to_string(),
                    content,
                    attempts_made: outcome.attempts_made,
                }
            }
            Err(error) => {
                tracing::error!(
                    "Failed after {} attempt(s): {} - {}",
                    outcome.attempts_made,
                    url,
                    error
                );
                FetchOutcome::Failure(FetchFailure::new(url, error, outcome.attempts_made))
            }
        }
    }

    /// Performs a single admitted, deadline-bounded request
    async fn attempt(&self, url: &Url, attempt: RetryAttempt) -> Result<String, FetchError> {
        self.limiter.acquire().await;
        tracing::debug!("Requesting {} (attempt {})", url, attempt.index + 1);

        match tokio::time::timeout(self.timeout, self.transport.get(url)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::timeout(format!(
                "no response within {:?}",
                self.timeout
            ))),
        }
    }
}
