//! Per-item fetch results and the error taxonomy
//!
//! No transport-specific error type leaves the fetch module; every failure is
//! mapped into an [`ErrorKind`] first.

use crate::throttle::RetryableError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Classification of a per-item failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed URL
    Validation,

    /// Per-attempt deadline exceeded
    Timeout,

    /// DNS failure, refused connection, TLS failure, broken body
    Connection,

    /// Remote answered with a server-side failure status (5xx)
    Server,

    /// Remote answered with a client-side failure status (4xx, other non-2xx)
    Client,

    /// Fetch succeeded but structured extraction failed
    Extraction,
}

impl ErrorKind {
    /// Returns true if a failure of this kind is worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout | Self::Connection | Self::Server)
    }

    /// Returns the serialized name of this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Timeout => "timeout",
            Self::Connection => "connection",
            Self::Server => "server",
            Self::Client => "client",
            Self::Extraction => "extraction",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified failure of a single fetch attempt
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} error: {message}")]
pub struct FetchError {
    pub kind: ErrorKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Connection, message)
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Server, message)
    }

    pub fn client(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Client, message)
    }

    /// Maps an HTTP status that is not a success into a classified error
    pub fn from_status(status: u16) -> Self {
        if (500..600).contains(&status) {
            Self::server(format!("HTTP {}", status))
        } else {
            Self::client(format!("HTTP {}", status))
        }
    }
}

impl RetryableError for FetchError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

/// A URL that could not be turned into a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchFailure {
    /// The URL as given in the input
    pub url: String,

    /// Classification of the final error
    #[serde(rename = "error_kind")]
    pub kind: ErrorKind,

    /// Number of requests issued for this URL
    pub attempts_made: u32,

    /// Human-readable description of the final error
    pub message: String,
}

impl FetchFailure {
    pub fn new(url: impl Into<String>, error: FetchError, attempts_made: u32) -> Self {
        Self {
            url: url.into(),
            kind: error.kind,
            attempts_made,
            message: error.message,
        }
    }
}

/// Result of fetching one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The document was retrieved
    Success {
        /// The URL as given in the input
        url: String,
        /// Document body
        content: String,
        /// Number of requests issued, including the successful one
        attempts_made: u32,
    },

    /// Every permitted attempt failed, or the failure was not retryable
    Failure(FetchFailure),
}

impl FetchOutcome {
    /// Returns the input URL this outcome belongs to
    pub fn url(&self) -> &str {
        match self {
            Self::Success { url, .. } => url,
            Self::Failure(failure) => &failure.url,
        }
    }

    /// Returns true for a successful fetch
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}
