use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for Sitegraph
///
/// Every section is optional in the TOML file; missing sections and keys
/// fall back to their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum link distance from the seed URL; the seed itself is depth 0
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Maximum number of pages fetched at the same time
    #[serde(rename = "max-concurrent-fetches")]
    pub max_concurrent_fetches: usize,

    /// Total time allowed for a single request (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Time allowed to establish a connection (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// Maximum number of redirects followed for one request
    #[serde(rename = "max-redirects")]
    pub max_redirects: usize,

    /// Log a progress line every this many fetched pages
    #[serde(rename = "progress-interval")]
    pub progress_interval: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 2,
            max_concurrent_fetches: 16,
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            max_redirects: 10,
            progress_interval: 25,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "sitegraph".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header value
    ///
    /// Format: `Name/Version` or `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory under which the per-site output directory is created
    pub directory: PathBuf,

    /// File name of the XML sitemap
    #[serde(rename = "sitemap-file")]
    pub sitemap_file: String,

    /// File name of the SVG link diagram
    #[serde(rename = "diagram-file")]
    pub diagram_file: String,

    /// Whether to render the link diagram at all
    #[serde(rename = "render-diagram")]
    pub render_diagram: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            sitemap_file: "sitemap.xml".to_string(),
            diagram_file: "sitemap.svg".to_string(),
            render_diagram: true,
        }
    }
}
