//! HTTP fetcher tests against a mock server

use crate::mount_page;
use sitegraph::config::{CrawlerConfig, UserAgentConfig};
use sitegraph::crawler::{FetchError, Fetcher, HttpFetcher};
use std::time::Duration;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher() -> HttpFetcher {
    HttpFetcher::new(&CrawlerConfig::default(), &UserAgentConfig::default())
        .expect("Failed to build fetcher")
}

fn url_for(server: &MockServer, route: &str) -> Url {
    Url::parse(&format!("{}{}", server.uri(), route)).expect("Failed to parse URL")
}

#[tokio::test]
async fn test_fetch_returns_body() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "<html><body>hello</body></html>").await;

    let body = fetcher().fetch(&url_for(&server, "/")).await.unwrap();
    assert_eq!(body, "<html><body>hello</body></html>");
}

#[tokio::test]
async fn test_fetch_sends_user_agent() {
    let server = MockServer::start().await;
    let agent = UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: Some("https://example.com/contact".to_string()),
    };

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header(
            "user-agent",
            "TestBot/1.0.0 (+https://example.com/contact)",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"ok".to_vec(), "text/html"))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(&CrawlerConfig::default(), &agent).unwrap();
    assert!(fetcher.fetch(&url_for(&server, "/")).await.is_ok());
}

#[tokio::test]
async fn test_fetch_not_found() {
    let server = MockServer::start().await;

    let result = fetcher().fetch(&url_for(&server, "/missing")).await;
    match result {
        Err(FetchError::Status { status, .. }) => assert_eq!(status, 404),
        other => panic!("Expected a status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let error = fetcher()
        .fetch(&url_for(&server, "/broken"))
        .await
        .unwrap_err();
    assert!(matches!(error, FetchError::Status { status: 503, .. }));
    assert!(error.url().ends_with("/broken"));
}

#[tokio::test]
async fn test_fetch_rejects_binary_content() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0x89, 0x50, 0x4e, 0x47], "image/png"))
        .mount(&server)
        .await;

    let error = fetcher()
        .fetch(&url_for(&server, "/logo.png"))
        .await
        .unwrap_err();
    assert!(error.is_malformed_content());
}

#[tokio::test]
async fn test_fetch_rejects_invalid_utf8() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/garbled"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0xff, 0xfe, 0xfd], "text/html"))
        .mount(&server)
        .await;

    let error = fetcher()
        .fetch(&url_for(&server, "/garbled"))
        .await
        .unwrap_err();
    assert!(error.is_malformed_content());
}

#[tokio::test]
async fn test_fetch_unreachable_host() {
    // Bind and drop a listener so nothing accepts on its port
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let url = Url::parse(&format!("http://127.0.0.1:{}/", port)).unwrap();
    let error = fetcher().fetch(&url).await.unwrap_err();
    assert!(matches!(error, FetchError::Unreachable { .. }));
}

#[tokio::test]
async fn test_fetch_slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"<html></html>".to_vec(), "text/html")
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let crawler = CrawlerConfig {
        request_timeout_secs: 1,
        ..CrawlerConfig::default()
    };
    let fetcher = HttpFetcher::new(&crawler, &UserAgentConfig::default()).unwrap();

    let error = fetcher.fetch(&url_for(&server, "/slow")).await.unwrap_err();
    assert!(matches!(error, FetchError::Timeout { .. }));
    assert!(error.url().ends_with("/slow"));
}
