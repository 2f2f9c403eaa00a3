use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Sumi-Harvest
///
/// Every section is optional; missing sections and keys fall back to their
/// defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scraper: ScraperConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    pub input: InputConfig,
}

/// Throttling, retry and concurrency configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ScraperConfig {
    /// Maximum number of request admissions per second (global)
    pub requests_per_second: f64,

    /// Per-attempt request deadline (seconds)
    #[serde(rename = "timeout")]
    pub timeout_secs: f64,

    /// Additional attempts after the first one for retryable failures
    pub max_retries: u32,

    /// Maximum number of fetches in flight at once
    pub max_concurrency: usize,

    /// Backoff delay before the first retry (seconds)
    #[serde(rename = "base-delay")]
    pub base_delay_secs: f64,

    /// Ceiling for the backoff delay (seconds)
    #[serde(rename = "max-delay")]
    pub max_delay_secs: f64,

    /// Scale each backoff delay by a random factor in [0.5, 1.0]
    pub jitter: bool,

    /// Skip TLS certificate verification
    pub accept_invalid_certs: bool,
}

impl ScraperConfig {
    /// Returns the per-attempt timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout_secs).unwrap_or(Duration::MAX)
    }

    /// Returns the base backoff delay as a Duration
    pub fn base_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.base_delay_secs).unwrap_or(Duration::ZERO)
    }

    /// Returns the backoff ceiling as a Duration
    pub fn max_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.max_delay_secs).unwrap_or(Duration::MAX)
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 2.0,
            timeout_secs: 10.0,
            max_retries: 3,
            max_concurrency: 5,
            base_delay_secs: 1.0,
            max_delay_secs: 30.0,
            jitter: false,
            accept_invalid_certs: false,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the harvester
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the harvester
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the harvester
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for harvester-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// Format: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "SumiHarvest".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "admin@example.com".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the JSON results file
    #[serde(rename = "results-path")]
    pub results_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_path: "scraping_results.json".to_string(),
        }
    }
}

/// The URL set to harvest
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub urls: Vec<String>,
}
