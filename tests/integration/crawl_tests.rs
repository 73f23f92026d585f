//! End-to-end crawl tests against a mock site

use crate::{mount_page, page_with_links};
use sitegraph::config::Config;
use sitegraph::crawl_with_config;
use sitegraph::{ConfigError, CrawlError};
use sitegraph::output::{format_sitemap_xml, prepare_output_dir, write_sitemap_xml, LinkDiagram};
use sitegraph::storage::{NewSummary, SqliteStore, SummaryStore};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(max_depth: u32) -> Config {
    let mut config = Config::default();
    config.crawler.max_depth = max_depth;
    config.crawler.max_concurrent_fetches = 4;
    config.user_agent.crawler_name = "TestBot".to_string();
    config
}

fn seed_of(server: &MockServer) -> String {
    format!("{}/", server.uri())
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", &page_with_links("Home", &["/page1", "/page2"])).await;
    mount_page(&server, "/page1", &page_with_links("Page 1", &["/page2", "/"])).await;
    mount_page(
        &server,
        "/page2",
        &page_with_links("Page 2", &[&format!("{}/page1", base)]),
    )
    .await;

    let report = crawl_with_config(&seed_of(&server), &test_config(2))
        .await
        .expect("Crawl failed");

    assert_eq!(report.visited_count, 3);
    assert_eq!(report.graph.len(), 3);
    assert_eq!(report.failed_count(), 0);
    assert_eq!(
        report.graph[&format!("{}/", base)],
        vec!["/page1".to_string(), "/page2".to_string()]
    );
    assert_eq!(
        report.graph[&format!("{}/page2", base)],
        vec![format!("{}/page1", base)]
    );
}

#[tokio::test]
async fn test_each_page_fetched_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            page_with_links("Home", &["/a", "/b", "/a"]).into_bytes(),
            "text/html",
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            page_with_links("A", &["/b", "/"]).into_bytes(),
            "text/html",
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            page_with_links("B", &["/a", "/"]).into_bytes(),
            "text/html",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let report = crawl_with_config(&seed_of(&server), &test_config(5))
        .await
        .unwrap();

    assert_eq!(report.visited_count, 3);
    assert_eq!(report.graph.len(), 3);
    // Expectations on the mocks are verified when the server drops
}

#[tokio::test]
async fn test_dead_link_does_not_stop_crawl() {
    let server = MockServer::start().await;

    mount_page(&server, "/", &page_with_links("Home", &["/missing", "/ok"])).await;
    mount_page(&server, "/ok", &page_with_links("Ok", &[])).await;

    let report = crawl_with_config(&seed_of(&server), &test_config(2))
        .await
        .unwrap();

    assert_eq!(report.visited_count, 3);
    assert_eq!(report.graph.len(), 2);
    assert_eq!(report.failed_count(), 1);
    assert!(!report
        .graph
        .contains_key(&format!("{}/missing", server.uri())));
}

#[tokio::test]
async fn test_non_text_content_is_skipped() {
    let server = MockServer::start().await;

    mount_page(&server, "/", &page_with_links("Home", &["/logo.png"])).await;
    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0x89, 0x50, 0x4e, 0x47], "image/png"))
        .mount(&server)
        .await;

    let report = crawl_with_config(&seed_of(&server), &test_config(2))
        .await
        .unwrap();

    assert_eq!(report.visited_count, 2);
    assert_eq!(report.graph.len(), 1);
}

#[tokio::test]
async fn test_depth_limit() {
    let server = MockServer::start().await;

    mount_page(&server, "/", &page_with_links("Home", &["/a"])).await;
    mount_page(&server, "/a", &page_with_links("A", &["/b"])).await;
    mount_page(&server, "/b", &page_with_links("B", &["/c"])).await;
    mount_page(&server, "/c", &page_with_links("C", &[])).await;

    let report = crawl_with_config(&seed_of(&server), &test_config(1))
        .await
        .unwrap();

    assert_eq!(report.visited_count, 2);
    let keys: Vec<&String> = report.graph.keys().collect();
    assert_eq!(
        keys,
        vec![&format!("{}/", server.uri()), &format!("{}/a", server.uri())]
    );
    // The depth-1 page still records its own links
    assert_eq!(report.graph[&format!("{}/a", server.uri())], vec!["/b".to_string()]);
}

#[tokio::test]
async fn test_depth_zero_fetches_only_seed() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &page_with_links("Home", &["/a", "/b"])).await;

    let report = crawl_with_config(&seed_of(&server), &test_config(0))
        .await
        .unwrap();

    assert_eq!(report.visited_count, 1);
    assert_eq!(report.graph.len(), 1);
}

#[tokio::test]
async fn test_external_links_recorded_but_not_followed() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        &page_with_links(
            "Home",
            &["http://other.invalid/page", "mailto:team@example.com", "#top", "/local"],
        ),
    )
    .await;
    mount_page(&server, "/local", &page_with_links("Local", &[])).await;

    let report = crawl_with_config(&seed_of(&server), &test_config(2))
        .await
        .unwrap();

    assert_eq!(report.visited_count, 2);
    let home = &report.graph[&seed_of(&server)];
    assert!(home.contains(&"http://other.invalid/page".to_string()));
    assert!(home.contains(&"/local".to_string()));
    assert!(!home.iter().any(|link| link.starts_with("mailto:") || link.starts_with('#')));
}

#[tokio::test]
async fn test_missing_seed_page_yields_empty_graph() {
    let server = MockServer::start().await;

    let report = crawl_with_config(&seed_of(&server), &test_config(2))
        .await
        .unwrap();

    assert_eq!(report.visited_count, 1);
    assert!(report.graph.is_empty());
}

#[tokio::test]
async fn test_invalid_seed_is_rejected() {
    assert!(crawl_with_config("not a url", &test_config(2)).await.is_err());
    assert!(crawl_with_config("ftp://example.com/", &test_config(2)).await.is_err());
}

#[tokio::test]
async fn test_outputs_and_summary_round_trip() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &page_with_links("Home", &["/about"])).await;
    mount_page(&server, "/about", &page_with_links("About", &["/"])).await;

    let seed = seed_of(&server);
    let report = crawl_with_config(&seed, &test_config(2)).await.unwrap();

    let temp = TempDir::new().unwrap();
    let output_dir = prepare_output_dir(temp.path(), &seed).unwrap();
    assert!(output_dir.starts_with(temp.path()));
    assert!(output_dir.is_dir());

    let sitemap_path = output_dir.join("sitemap.xml");
    write_sitemap_xml(&report.graph, &sitemap_path).unwrap();
    let written = std::fs::read_to_string(&sitemap_path).unwrap();
    assert_eq!(written, format_sitemap_xml(&report.graph));
    assert!(written.contains(&format!("<loc>{}about</loc>", seed)));

    let diagram_path = output_dir.join("sitemap.svg");
    LinkDiagram::from_graph(&report.graph)
        .write_svg(&diagram_path)
        .unwrap();
    assert!(std::fs::read_to_string(&diagram_path)
        .unwrap()
        .starts_with("<svg"));

    let db_path = output_dir.join("crawls.db");
    let mut store = SqliteStore::open(&db_path).unwrap();
    store
        .insert_summary(&NewSummary::from_report(&report, &sitemap_path))
        .unwrap();

    let record = store.latest_summary_for(&seed).unwrap().unwrap();
    assert_eq!(record.url, seed);
    assert_eq!(record.links_found, 2);
    assert_eq!(record.result_filename, sitemap_path.display().to_string());
    assert!(record.time_consumed >= 0.0);
}

#[tokio::test]
async fn test_invalid_config_is_rejected_before_fetching() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"<html></html>".to_vec(), "text/html"))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = test_config(2);
    config.crawler.request_timeout_secs = 0;

    let result = crawl_with_config(&seed_of(&server), &config).await;
    assert!(matches!(
        result,
        Err(CrawlError::Config(ConfigError::Validation(_)))
    ));
}
