//! URL handling module for Sumi-Harvest
//!
//! Input URLs are validated before any request is issued. A URL that fails
//! validation is recorded as a per-item failure and never reaches the
//! transport.

use crate::{UrlError, UrlResult};
use url::Url;

/// Parses and validates a URL string for fetching
///
/// # Validation Steps
///
/// 1. Trim surrounding whitespace and parse; reject if malformed
/// 2. Accept only `http` and `https` schemes
/// 3. Require a non-empty host
/// 4. Drop the fragment (never sent to the server)
///
/// # Examples
///
/// ```
/// use sumi_harvest::url::validate_url;
///
/// let url = validate_url(" https://example.com/post#comments ").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/post");
///
/// assert!(validate_url("ftp://example.com/file").is_err());
/// ```
pub fn validate_url(url_str: &str) -> UrlResult<Url> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(UrlError::MissingDomain),
    }

    url.set_fragment(None);
    Ok(url)
}
