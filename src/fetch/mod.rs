//! Fetching module
//!
//! This module turns one URL into one [`FetchOutcome`]:
//! - URL validation
//! - Rate-limited, deadline-bounded HTTP requests
//! - Retries for transient failures
//! - Error classification

mod fetcher;
mod outcome;
mod transport;

pub use fetcher::Fetcher;
pub use outcome::{ErrorKind, FetchError, FetchFailure, FetchOutcome};
pub use transport::{build_http_client, ReqwestTransport, Transport};
