//! Structured field extraction
//!
//! The orchestrator treats extraction as an opaque collaborator: anything
//! implementing [`Extractor`] can turn fetched content into an
//! [`ExtractedRecord`]. [`HtmlExtractor`] is the default implementation for
//! article-like HTML pages.

mod html;

pub use html::HtmlExtractor;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Extraction failed for a successfully fetched document
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Extraction failed for {url}: {message}")]
pub struct ExtractionError {
    pub url: String,
    pub message: String,
}

impl ExtractionError {
    pub fn new(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            message: message.into(),
        }
    }
}

/// Structured fields extracted from one document
///
/// Optional fields serialize as explicit `null`s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    pub title: String,
    pub url: String,
    pub author: Option<String>,
    pub published_date: Option<String>,
    pub summary: Option<String>,
    pub scraped_at: DateTime<Utc>,
}

impl ExtractedRecord {
    /// Creates a record with only a title and URL, stamped with the current time
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            author: None,
            published_date: None,
            summary: None,
            scraped_at: Utc::now(),
        }
    }
}

/// Maps raw document content to a structured record
///
/// Implementations must be thread-safe; one extractor is shared by every
/// concurrent fetch of a run.
pub trait Extractor: Send + Sync {
    /// Extracts a record from `content`, fetched from `url`
    fn extract(&self, url: &str, content: &str) -> Result<ExtractedRecord, ExtractionError>;
}
