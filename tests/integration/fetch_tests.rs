//! Fetcher tests against a mock HTTP server

use crate::{fast_scraper_config, test_user_agent};
use std::sync::Arc;
use std::time::Duration;
use sumi_harvest::fetch::{build_http_client, ErrorKind, FetchOutcome, Fetcher, ReqwestTransport};
use sumi_harvest::throttle::{RateLimiter, RetryPolicy};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher(max_retries: u32, timeout_secs: f64) -> Fetcher {
    let config = sumi_harvest::config::ScraperConfig {
        timeout_secs,
        ..fast_scraper_config(max_retries)
    };
    let transport =
        ReqwestTransport::new(&test_user_agent(), &config).expect("Failed to build transport");

    Fetcher::new(
        Arc::new(transport),
        Arc::new(RateLimiter::new(config.requests_per_second).unwrap()),
        RetryPolicy::from_config(&config),
        config.timeout(),
    )
}

fn failure(outcome: FetchOutcome) -> sumi_harvest::FetchFailure {
    match outcome {
        FetchOutcome::Failure(failure) => failure,
        FetchOutcome::Success { url, .. } => panic!("expected failure for {}", url),
    }
}

#[tokio::test]
async fn test_fetch_success_sends_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/article"))
        .and(header(
            "user-agent",
            "TestBot/1.0.0 (+https://example.com/contact; test@example.com)",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>hello</html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/article", mock_server.uri());
    let outcome = fetcher(3, 2.0).fetch(&url).await;

    match outcome {
        FetchOutcome::Success {
            url: fetched,
            content,
            attempts_made,
        } => {
            assert_eq!(fetched, url);
            assert_eq!(content, "<html>hello</html>");
            assert_eq!(attempts_made, 1);
        }
        FetchOutcome::Failure(f) => panic!("unexpected failure: {:?}", f),
    }
}

#[tokio::test]
async fn test_fetch_not_found_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/missing", mock_server.uri());
    let failure = failure(fetcher(3, 2.0).fetch(&url).await);

    assert_eq!(failure.kind, ErrorKind::Client);
    assert_eq!(failure.attempts_made, 1);
}

#[tokio::test]
async fn test_fetch_server_error_is_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(503))
        .expect(4)
        .mount(&mock_server)
        .await;

    let url = format!("{}/broken", mock_server.uri());
    let failure = failure(fetcher(3, 2.0).fetch(&url).await);

    assert_eq!(failure.kind, ErrorKind::Server);
    assert_eq!(failure.attempts_made, 4);
}

#[tokio::test]
async fn test_fetch_recovers_after_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string("finally"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/flaky", mock_server.uri());
    match fetcher(3, 2.0).fetch(&url).await {
        FetchOutcome::Success {
            content,
            attempts_made,
            ..
        } => {
            assert_eq!(content, "finally");
            assert_eq!(attempts_made, 3);
        }
        FetchOutcome::Failure(f) => panic!("unexpected failure: {:?}", f),
    }
}

#[tokio::test]
async fn test_fetch_slow_response_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("too late")
                .set_delay(Duration::from_secs(3)),
        )
        .expect(2)
        .mount(&mock_server)
        .await;

    let url = format!("{}/slow", mock_server.uri());
    let failure = failure(fetcher(1, 0.2).fetch(&url).await);

    assert_eq!(failure.kind, ErrorKind::Timeout);
    assert_eq!(failure.attempts_made, 2);
}

#[tokio::test]
async fn test_fetch_connection_refused() {
    // Nothing listens on port 1
    let failure = failure(fetcher(1, 2.0).fetch("http://127.0.0.1:1/").await);

    assert_eq!(failure.kind, ErrorKind::Connection);
    assert_eq!(failure.attempts_made, 2);
}

#[tokio::test]
async fn test_fetch_malformed_url_makes_no_request() {
    let failure = failure(fetcher(3, 2.0).fetch("ftp://example.com/file").await);

    assert_eq!(failure.kind, ErrorKind::Validation);
    assert_eq!(failure.attempts_made, 0);
}

#[tokio::test]
async fn test_fetch_with_prebuilt_client() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/shared"))
        .respond_with(ResponseTemplate::new(200).set_body_string("shared client"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = fast_scraper_config(0);
    let client = build_http_client(&test_user_agent(), &config).unwrap();
    let fetcher = Fetcher::new(
        Arc::new(ReqwestTransport::with_client(client)),
        Arc::new(RateLimiter::new(config.requests_per_second).unwrap()),
        RetryPolicy::from_config(&config),
        config.timeout(),
    );

    let url = format!("{}/shared", mock_server.uri());
    let outcome = fetcher.fetch(&url).await;

    assert!(outcome.is_success());
    assert_eq!(outcome.url(), url);
}
