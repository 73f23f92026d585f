//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `Fetcher` trait
//! - Lenient link extraction from raw markup
//! - The shared visited set and link graph
//! - A bounded worker pool and the crawl coordinator

mod coordinator;
mod extract;
mod fetcher;
mod scheduler;
mod state;

pub use coordinator::{CrawlReport, CrawlSettings, Coordinator};
pub use extract::{extract_links, is_navigable};
pub use fetcher::{build_http_client, FetchError, Fetcher, HttpFetcher};
pub use scheduler::{Branch, Scheduler};
pub use state::{CrawlState, LinkGraph};

use crate::config::{validate, Config};
use crate::CrawlError;

/// Crawls a site with default settings
///
/// The seed is fetched at depth 0 and links are followed while their depth is
/// at most `max_depth`. Only the seed's domain and its subdomains are visited.
///
/// # Arguments
///
/// * `seed` - Absolute HTTP(S) URL to start from
/// * `max_depth` - Deepest link distance from the seed that is still fetched
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Elapsed time, visited count and link graph
/// * `Err(CrawlError)` - The seed URL is unusable or the HTTP client failed to build
///
/// # Example
///
/// ```no_run
/// # async fn example() -> Result<(), sitegraph::CrawlError> {
/// let report = sitegraph::crawl("https://example.com/", 2).await?;
/// println!("{} pages in {:.2}s", report.visited_count, report.elapsed_seconds());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(seed: &str, max_depth: u32) -> Result<CrawlReport, CrawlError> {
    let mut config = Config::default();
    config.crawler.max_depth = max_depth;
    crawl_with_config(seed, &config).await
}

/// Crawls a site using the limits and HTTP settings from `config`
///
/// The configuration is validated first; an invalid one is rejected before
/// any request is made.
pub async fn crawl_with_config(seed: &str, config: &Config) -> Result<CrawlReport, CrawlError> {
    validate(config)?;
    let fetcher = HttpFetcher::new(&config.crawler, &config.user_agent)?;
    let coordinator = Coordinator::new(seed, CrawlSettings::from(&config.crawler), fetcher)?;
    Ok(coordinator.run().await)
}
