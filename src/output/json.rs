//! JSON results document

use crate::extract::ExtractedRecord;
use crate::fetch::FetchFailure;
use crate::orchestrator::{RunStatistics, ScrapeReport};
use crate::HarvestError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Top-level shape of the results file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsDocument {
    /// When the document was written
    pub timestamp: DateTime<Utc>,

    /// SHA-256 of the config file the run used, if any
    pub config_hash: Option<String>,

    pub articles: Vec<ExtractedRecord>,
    pub failures: Vec<FetchFailure>,
    pub statistics: RunStatistics,
}

impl ResultsDocument {
    /// Builds a document from a finished run, stamped with the current time
    pub fn from_report(report: &ScrapeReport, config_hash: Option<&str>) -> Self {
        Self {
            timestamp: Utc::now(),
            config_hash: config_hash.map(str::to_string),
            articles: report.records.clone(),
            failures: report.failures.clone(),
            statistics: report.statistics.clone(),
        }
    }
}

/// Writes the results of a run as pretty-printed JSON
///
/// # Arguments
///
/// * `report` - The finished run
/// * `path` - Destination file; created or truncated
/// * `config_hash` - Hash of the config file, recorded for provenance
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the file
/// * `Err(HarvestError)` - Serialization or I/O failure
pub fn write_results(
    report: &ScrapeReport,
    path: &Path,
    config_hash: Option<&str>,
) -> Result<(), HarvestError> {
    let document = ResultsDocument::from_report(report, config_hash);

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &document)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    tracing::info!("Results written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{ErrorKind, FetchError};
    use std::time::Duration;
    use tempfile::TempDir;

    fn sample_report() -> ScrapeReport {
        let mut record = ExtractedRecord::new("Hello", "https://example.com/a");
        record.author = Some("Jane".to_string());

        ScrapeReport {
            records: vec![record],
            failures: vec![FetchFailure::new(
                "https://example.com/b",
                FetchError::from_status(404),
                1,
            )],
            statistics: RunStatistics::compute(1, 1, 0, Duration::from_secs(2), false),
        }
    }

    #[test]
    fn test_write_results_shape() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("results.json");

        write_results(&sample_report(), &path, Some("abc123")).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();

        assert!(json["timestamp"].is_string());
        assert_eq!(json["config_hash"], "abc123");

        let article = &json["articles"][0];
        assert_eq!(article["title"], "Hello");
        assert_eq!(article["author"], "Jane");
        assert!(article["published_date"].is_null());
        assert!(article["summary"].is_null());

        let failure = &json["failures"][0];
        assert_eq!(failure["url"], "https://example.com/b");
        assert_eq!(failure["error_kind"], "client");
        assert_eq!(failure["attempts_made"], 1);

        assert_eq!(json["statistics"]["total_items"], 2);
        assert_eq!(json["statistics"]["status"], "partial");
    }

    #[test]
    fn test_results_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("results.json");
        let report = sample_report();

        write_results(&report, &path, None).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let document: ResultsDocument = serde_json::from_str(&raw).unwrap();
        assert_eq!(document.config_hash, None);
        assert_eq!(document.articles, report.records);
        assert_eq!(document.failures[0].kind, ErrorKind::Client);
        assert_eq!(document.statistics, report.statistics);
    }

    #[test]
    fn test_write_results_bad_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("results.json");

        let result = write_results(&sample_report(), &path, None);
        assert!(matches!(result, Err(HarvestError::Io(_))));
    }
}
