//! Integration tests for Sumi-Harvest
//!
//! These tests use wiremock to create mock HTTP servers and drive the real
//! reqwest transport end-to-end.

mod fetch_tests;
mod harvest_tests;

use sumi_harvest::config::{ScraperConfig, UserAgentConfig};

/// Scraper settings fast enough for real-clock tests
pub fn fast_scraper_config(max_retries: u32) -> ScraperConfig {
    ScraperConfig {
        requests_per_second: 50.0,
        timeout_secs: 2.0,
        max_retries,
        max_concurrency: 4,
        base_delay_secs: 0.01,
        max_delay_secs: 0.05,
        jitter: false,
        accept_invalid_certs: false,
    }
}

pub fn test_user_agent() -> UserAgentConfig {
    UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
        contact_email: "test@example.com".to_string(),
    }
}

/// A small article page with every extractable field
pub fn article_page(title: &str) -> String {
    format!(
        r#"<html>
        <head>
            <title>{title} | Site</title>
            <meta name="author" content="Jane Doe">
            <meta property="article:published_time" content="2024-03-01T10:00:00Z">
            <meta name="description" content="All about {title}.">
        </head>
        <body><h1>{title}</h1><p>Body text.</p></body>
        </html>"#
    )
}
