//! Integration tests for Sitegraph
//!
//! These tests use wiremock to create mock HTTP servers and exercise the
//! fetcher and the full crawl cycle end-to-end.

mod crawl_tests;
mod fetch_tests;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mounts an HTML page at `route`
pub async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html"))
        .mount(server)
        .await;
}

/// Builds a page body containing one anchor per href
pub fn page_with_links(title: &str, hrefs: &[&str]) -> String {
    let anchors: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{}">{}</a>"#, href, href))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "<html><head><title>{}</title></head><body>\n{}\n</body></html>",
        title, anchors
    )
}
