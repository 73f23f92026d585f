//! Sitegraph: a same-domain link graph crawler
//!
//! This crate crawls a website from a seed URL up to a bounded depth, stays
//! within the seed's domain (and its subdomains), and records the outbound
//! links of every page it visits. The resulting link graph can be written out
//! as an XML sitemap, rendered as an SVG diagram, and summarized in SQLite.

pub mod config;
pub mod crawler;
pub mod output;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors that prevent a crawl from starting
///
/// Once a crawl is running nothing is fatal: individual fetch failures are
/// absorbed by the branch that hit them.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Invalid seed URL '{url}': {source}")]
    InvalidSeed {
        url: String,
        source: ::url::ParseError,
    },

    #[error("Unsupported URL scheme for seed: {0}")]
    UnsupportedScheme(String),

    #[error("Seed URL has no host: {0}")]
    MissingDomain(String),

    #[error("Invalid crawler configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, crawl_with_config, CrawlReport};
pub use url::{domain_of, same_domain};
