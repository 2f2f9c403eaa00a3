//! End-to-end harvest tests: config file → orchestrator → results file

use crate::{article_page, fast_scraper_config, test_user_agent};
use std::io::Write;
use std::sync::Arc;
use sumi_harvest::config::load_config_with_hash;
use sumi_harvest::fetch::ReqwestTransport;
use sumi_harvest::output::write_results;
use sumi_harvest::{ErrorKind, HtmlExtractor, Orchestrator, RunStatus};
use tempfile::{NamedTempFile, TempDir};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_site(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/posts/1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(article_page("First Post"))
                .insert_header("content-type", "text/html"),
        )
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/posts/2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><head><title>Bare page</title></head></html>")
                .insert_header("content-type", "text/html"),
        )
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_harvest_from_config_file() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;
    let base = mock_server.uri();

    let mut config_file = NamedTempFile::new().unwrap();
    write!(
        config_file,
        r#"
[scraper]
requests-per-second = 50.0
timeout = 2.0
max-retries = 2
max-concurrency = 3
base-delay = 0.01
max-delay = 0.05

[user-agent]
crawler-name = "TestBot"
crawler-version = "1.0.0"
contact-url = "https://example.com/contact"
contact-email = "test@example.com"

[input]
urls = ["{base}/posts/1", "{base}/gone", "{base}/posts/2", "not a url"]
"#
    )
    .unwrap();

    let (config, hash) = load_config_with_hash(config_file.path()).unwrap();
    assert_eq!(hash.len(), 64);

    let transport = ReqwestTransport::new(&config.user_agent, &config.scraper).unwrap();
    let orchestrator = Orchestrator::new(
        &config.scraper,
        Arc::new(transport),
        Arc::new(HtmlExtractor::new()),
    )
    .unwrap();

    let report = orchestrator
        .scrape(&config.input.urls, config.scraper.max_concurrency)
        .await
        .unwrap();

    assert_eq!(report.statistics.total_items, 4);
    assert_eq!(report.statistics.successful_items, 2);
    assert_eq!(report.statistics.failed_items, 2);
    assert_eq!(report.statistics.status, RunStatus::Partial);

    // Input order is preserved
    assert_eq!(report.records[0].title, "First Post");
    assert_eq!(report.records[0].author.as_deref(), Some("Jane Doe"));
    assert_eq!(report.records[1].title, "Bare page");
    assert!(report.records[1].summary.is_none());

    assert_eq!(report.failures[0].url, format!("{}/gone", base));
    assert_eq!(report.failures[0].kind, ErrorKind::Client);
    assert_eq!(report.failures[1].kind, ErrorKind::Validation);
    assert_eq!(report.failures[1].attempts_made, 0);

    // Results file
    let dir = TempDir::new().unwrap();
    let results_path = dir.path().join("scraping_results.json");
    write_results(&report, &results_path, Some(&hash)).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&results_path).unwrap()).unwrap();

    assert_eq!(json["config_hash"], hash.as_str());
    assert_eq!(json["articles"].as_array().unwrap().len(), 2);
    assert_eq!(json["articles"][0]["summary"], "All about First Post.");
    assert!(json["articles"][1]["author"].is_null());
    assert!(json["articles"][1]["published_date"].is_null());
    assert_eq!(json["failures"][0]["error_kind"], "client");
    assert_eq!(json["statistics"]["successful_items"], 2);
    assert_eq!(json["statistics"]["status"], "partial");
}

#[tokio::test]
async fn test_harvest_all_succeed() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;

    let urls: Vec<String> = ["/posts/1", "/posts/2", "/posts/1"]
        .iter()
        .map(|p| format!("{}{}", mock_server.uri(), p))
        .collect();

    let config = fast_scraper_config(1);
    let transport = ReqwestTransport::new(&test_user_agent(), &config).unwrap();
    let orchestrator = Orchestrator::new(
        &config,
        Arc::new(transport),
        Arc::new(HtmlExtractor::new()),
    )
    .unwrap();

    let report = orchestrator.scrape(&urls, 2).await.unwrap();
    assert_eq!(report.statistics.status, RunStatus::Completed);
    assert_eq!(report.records.len(), 3);
    assert!(report.failures.is_empty());
    assert!(report.statistics.items_per_second > 0.0);
}

#[tokio::test]
async fn test_harvest_server_failures_exhaust_retries() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(6)
        .mount(&mock_server)
        .await;

    let urls = vec![
        format!("{}/a", mock_server.uri()),
        format!("{}/b", mock_server.uri()),
    ];

    let config = fast_scraper_config(2);
    let transport = ReqwestTransport::new(&test_user_agent(), &config).unwrap();
    let orchestrator = Orchestrator::new(
        &config,
        Arc::new(transport),
        Arc::new(HtmlExtractor::new()),
    )
    .unwrap();

    let report = orchestrator.scrape(&urls, 2).await.unwrap();

    assert_eq!(report.statistics.status, RunStatus::Failed);
    assert!(report
        .failures
        .iter()
        .all(|f| f.kind == ErrorKind::Server && f.attempts_made == 3));
}
