//! Run coordinator - concurrent fan-out over a fixed URL set
//!
//! This module contains the orchestration loop that:
//! - Spawns one task per input URL
//! - Bounds the number of in-flight fetches with a semaphore
//! - Hands successful documents to the extractor
//! - Collects records and failures without aborting on per-item errors
//! - Honors an external cancellation signal
//! - Computes the final run statistics

use crate::config::{validate_scraper_config, ScraperConfig};
use crate::extract::{ExtractedRecord, Extractor};
use crate::fetch::{ErrorKind, FetchFailure, FetchOutcome, Fetcher, Transport};
use crate::orchestrator::stats::RunStatistics;
use crate::throttle::{RateLimiter, RetryPolicy};
use crate::ConfigError;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Everything a run produced
///
/// Records and failures are ordered by the position of their URL in the
/// input, regardless of completion order.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeReport {
    pub records: Vec<ExtractedRecord>,
    pub failures: Vec<FetchFailure>,
    pub statistics: RunStatistics,
}

/// Resolution of a single input URL
#[derive(Debug)]
enum ItemResult {
    Record(ExtractedRecord),
    Failed(FetchFailure),
}

/// Drives concurrent fetches across an input URL set
///
/// Each run owns a fresh [`RateLimiter`], so admission spacing never carries
/// over from one `scrape` call to the next.
pub struct Orchestrator {
    transport: Arc<dyn Transport>,
    extractor: Arc<dyn Extractor>,
    retry: RetryPolicy,
    requests_per_second: f64,
    timeout: Duration,
}

impl Orchestrator {
    /// Creates a new orchestrator
    ///
    /// Validates the configuration and derives the retry policy; the rate
    /// limiter and fetcher are built per run.
    ///
    /// # Arguments
    ///
    /// * `config` - Throttling, retry and timeout settings
    /// * `transport` - HTTP transport used for every request
    /// * `extractor` - Collaborator turning documents into records
    ///
    /// # Returns
    ///
    /// * `Ok(Orchestrator)` - Ready to run
    /// * `Err(ConfigError)` - The configuration is invalid
    pub fn new(
        config: &ScraperConfig,
        transport: Arc<dyn Transport>,
        extractor: Arc<dyn Extractor>,
    ) -> Result<Self, ConfigError> {
        validate_scraper_config(config)?;
        RateLimiter::new(config.requests_per_second)?;

        Ok(Self {
            transport,
            extractor,
            retry: RetryPolicy::from_config(config),
            requests_per_second: config.requests_per_second,
            timeout: config.timeout(),
        })
    }

    /// Fetches and extracts every URL, with at most `max_concurrency` in flight
    ///
    /// # Returns
    ///
    /// * `Ok(ScrapeReport)` - The run completed; inspect `statistics.status`
    ///   and `failures` for per-item problems
    /// * `Err(ConfigError)` - The URL set is empty or `max_concurrency` is 0
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::sync::Arc;
    /// use sumi_harvest::config::{ScraperConfig, UserAgentConfig};
    /// use sumi_harvest::fetch::ReqwestTransport;
    /// use sumi_harvest::{HtmlExtractor, Orchestrator};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = ScraperConfig::default();
    /// let transport = ReqwestTransport::new(&UserAgentConfig::default(), &config)?;
    /// let orchestrator =
    ///     Orchestrator::new(&config, Arc::new(transport), Arc::new(HtmlExtractor::new()))?;
    ///
    /// let urls = vec!["https://example.com/".to_string()];
    /// let report = orchestrator.scrape(&urls, 5).await?;
    /// println!("{} records, status {}", report.records.len(), report.statistics.status);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn scrape(
        &self,
        urls: &[String],
        max_concurrency: usize,
    ) -> Result<ScrapeReport, ConfigError> {
        self.scrape_until(urls, max_concurrency, CancellationToken::new())
            .await
    }

    /// Like [`Orchestrator::scrape`], but stops early when `cancel` fires
    ///
    /// On cancellation every unfinished task is aborted. Items that had
    /// already resolved are kept; aborted ones (including those waiting for
    /// an admission or sleeping in backoff) are counted as abandoned, not
    /// failed, and the run is reported as `partial`.
    pub async fn scrape_until(
        &self,
        urls: &[String],
        max_concurrency: usize,
        cancel: CancellationToken,
    ) -> Result<ScrapeReport, ConfigError> {
        if urls.is_empty() {
            return Err(ConfigError::Validation("URL set is empty".to_string()));
        }
        if max_concurrency == 0 {
            return Err(ConfigError::Validation(
                "max_concurrency must be at least 1".to_string(),
            ));
        }

        tracing::info!(
            "Starting run: {} URLs, max concurrency {}",
            urls.len(),
            max_concurrency
        );

        let fetcher = Arc::new(Fetcher::new(
            Arc::clone(&self.transport),
            Arc::new(RateLimiter::new(self.requests_per_second)?),
            self.retry.clone(),
            self.timeout,
        ));

        // Permits beyond the URL count are never used
        let permits = max_concurrency.min(urls.len());

        let start_time = Instant::now();
        let semaphore = Arc::new(Semaphore::new(permits));
        let mut tasks = JoinSet::new();

        for (index, url) in urls.iter().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let fetcher = Arc::clone(&fetcher);
            let extractor = Arc::clone(&self.extractor);
            let url = url.clone();

            tasks.spawn(async move {
                // Held until this item resolves
                let _permit = semaphore.acquire_owned().await.ok();
                (index, process_url(&fetcher, extractor.as_ref(), &url).await)
            });
        }

        let mut resolved = Vec::with_capacity(urls.len());
        let mut abandoned: u64 = 0;
        let mut cancel_seen = false;

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled(), if !cancel_seen => {
                    cancel_seen = true;
                    tracing::warn!(
                        "Cancellation requested, abandoning {} unfinished fetches",
                        tasks.len()
                    );
                    tasks.abort_all();
                }

                joined = tasks.join_next() => match joined {
                    Some(Ok(item)) => {
                        resolved.push(item);
                        if resolved.len() % 10 == 0 {
                            tracing::info!("Progress: {}/{} URLs resolved", resolved.len(), urls.len());
                        }
                    }
                    Some(Err(e)) if e.is_cancelled() => abandoned += 1,
                    Some(Err(e)) => std::panic::resume_unwind(e.into_panic()),
                    None => break,
                },
            }
        }

        let elapsed = start_time.elapsed();
        resolved.sort_by_key(|(index, _)| *index);

        let mut records = Vec::new();
        let mut failures = Vec::new();
        for (_, item) in resolved {
            match item {
                ItemResult::Record(record) => records.push(record),
                ItemResult::Failed(failure) => failures.push(failure),
            }
        }

        let statistics = RunStatistics::compute(
            records.len() as u64,
            failures.len() as u64,
            abandoned,
            elapsed,
            abandoned > 0,
        );

        tracing::info!(
            "Run {}: {} succeeded, {} failed, {} abandoned in {:.2}s ({:.2} items/sec)",
            statistics.status,
            statistics.successful_items,
            statistics.failed_items,
            statistics.abandoned_items,
            statistics.total_time,
            statistics.items_per_second
        );

        Ok(ScrapeReport {
            records,
            failures,
            statistics,
        })
    }
}

/// Fetches one URL and extracts a record from it
///
/// An extraction error is reported as a failure of the item; it is not
/// retried.
async fn process_url(fetcher: &Fetcher, extractor: &dyn Extractor, url: &str) -> ItemResult {
    match fetcher.fetch(url).await {
        FetchOutcome::Success {
            url,
            content,
            attempts_made,
        } => match extractor.extract(&url, &content) {
            Ok(record) => ItemResult::Record(record),
            Err(e) => {
                tracing::warn!("Error extracting {}: {}", url, e.message);
                ItemResult::Failed(FetchFailure {
                    url,
                    kind: ErrorKind::Extraction,
                    attempts_made,
                    message: e.message,
                })
            }
        },
        FetchOutcome::Failure(failure) => ItemResult::Failed(failure),
    }
}
