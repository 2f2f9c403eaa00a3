//! HTTP transport
//!
//! This module handles the network side of a single request:
//! - Building an HTTP client with a proper user agent string
//! - Issuing the GET request
//! - Classifying HTTP statuses and client errors into [`ErrorKind`]s
//!
//! [`ErrorKind`]: crate::fetch::ErrorKind

use crate::config::{ScraperConfig, UserAgentConfig};
use crate::fetch::FetchError;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Maximum number of redirects followed for a single request
const MAX_REDIRECTS: usize = 10;

/// Performs one GET request and returns the document body
///
/// Implementations map every failure into a [`FetchError`]. Rate limiting,
/// retries and the per-attempt deadline are applied by the caller.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<String, FetchError>;
}

/// Transport backed by a shared `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Builds a transport from configuration
    ///
    /// # Returns
    ///
    /// * `Ok(ReqwestTransport)` - Client built successfully
    /// * `Err(reqwest::Error)` - The client could not be initialized (e.g. TLS backend)
    pub fn new(user_agent: &UserAgentConfig, config: &ScraperConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(user_agent, config)?;
        Ok(Self { client })
    }

    /// Wraps an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(classify_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::from_status(status.as_u16()));
        }

        response.text().await.map_err(classify_error)
    }
}

/// Builds an HTTP client with proper configuration
///
/// The client-level timeout is a backstop; the fetcher enforces the
/// per-attempt deadline itself.
///
/// # Example
///
/// ```no_run
/// use sumi_harvest::config::{ScraperConfig, UserAgentConfig};
/// use sumi_harvest::fetch::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &ScraperConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    config: &ScraperConfig,
) -> Result<Client, reqwest::Error> {
    let timeout = config.timeout();

    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .danger_accept_invalid_certs(config.accept_invalid_certs)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Maps a reqwest error into the fetch error taxonomy
///
/// | Condition | Kind |
/// |-----------|------|
/// | Timeout | Timeout |
/// | Connection refused, DNS, TLS | Connection |
/// | Redirect loop / too many redirects | Client |
/// | Request could not be built | Validation |
/// | Anything else (body, decode) | Connection |
fn classify_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::timeout(error.to_string())
    } else if error.is_connect() {
        FetchError::connection(error.to_string())
    } else if error.is_redirect() {
        FetchError::client(error.to_string())
    } else if error.is_builder() {
        FetchError::validation(error.to_string())
    } else if let Some(status) = error.status() {
        FetchError::from_status(status.as_u16())
    } else {
        FetchError::connection(error.to_string())
    }
}
