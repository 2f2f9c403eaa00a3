//! Sumi-Harvest: a polite concurrent document harvester
//!
//! This crate fetches a fixed set of URLs concurrently, extracts structured
//! fields from each document, and reports aggregate outcome statistics while
//! respecting a global request rate and retrying transient failures.

pub mod config;
pub mod extract;
pub mod fetch;
pub mod orchestrator;
pub mod output;
pub mod throttle;
pub mod url;

use thiserror::Error;

/// Main error type for Sumi-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to initialize HTTP transport: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to serialize results: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
///
/// These are the only errors that escape an orchestration run.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Sumi-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use extract::{ExtractedRecord, Extractor, HtmlExtractor};
pub use fetch::{ErrorKind, FetchError, FetchFailure, FetchOutcome, Fetcher, Transport};
pub use orchestrator::{Orchestrator, RunStatistics, RunStatus, ScrapeReport};
pub use throttle::{RateLimiter, RetryPolicy};
