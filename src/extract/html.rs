//! HTML extractor for article-like pages
//!
//! # Extraction Rules
//!
//! | Field | Source |
//! |-------|--------|
//! | title | first `<h1>`, else `<title>`, else `"N/A"` |
//! | author | `<meta name="author" content="...">` |
//! | published_date | `<meta property="article:published_time" content="...">` |
//! | summary | `<meta name="description" content="...">` |
//!
//! Text is whitespace-trimmed; empty values count as absent.

use crate::extract::{ExtractedRecord, ExtractionError, Extractor};
use chrono::Utc;
use scraper::{Html, Selector};

/// Title used when a page has neither `<h1>` nor `<title>`
pub const MISSING_TITLE: &str = "N/A";

/// Default extractor built on the `scraper` crate
#[derive(Debug, Clone, Default)]
pub struct HtmlExtractor;

impl HtmlExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Extractor for HtmlExtractor {
    fn extract(&self, url: &str, content: &str) -> Result<ExtractedRecord, ExtractionError> {
        if content.trim().is_empty() {
            return Err(ExtractionError::new(url, "document is empty"));
        }

        let document = Html::parse_document(content);

        let title = first_text(&document, "h1")
            .or_else(|| first_text(&document, "title"))
            .unwrap_or_else(|| MISSING_TITLE.to_string());

        Ok(ExtractedRecord {
            title,
            url: url.to_string(),
            author: meta_content(&document, "meta[name='author']"),
            published_date: meta_content(&document, "meta[property='article:published_time']"),
            summary: meta_content(&document, "meta[name='description']"),
            scraped_at: Utc::now(),
        })
    }
}

/// Returns the trimmed text of the first element matching `selector`
fn first_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Returns the trimmed `content` attribute of the first matching meta tag
fn meta_content(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("content"))
        .map(|content| content.trim().to_string())
        .find(|content| !content.is_empty())
}
