//! Storage module for persisting crawl summaries
//!
//! Each finished crawl is recorded as one row holding the seed URL, the time
//! the crawl took, the number of URLs it visited, and the sitemap it wrote.

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStore;
pub use traits::{StorageError, StorageResult, SummaryStore};

use crate::crawler::CrawlReport;
use std::path::Path;

/// A crawl summary about to be recorded
#[derive(Debug, Clone, PartialEq)]
pub struct NewSummary {
    pub url: String,
    pub time_consumed: f64,
    pub links_found: u64,
    pub result_filename: String,
}

impl NewSummary {
    /// Summarizes a finished crawl whose sitemap was written to `result_file`
    pub fn from_report(report: &CrawlReport, result_file: &Path) -> Self {
        Self {
            url: report.seed.clone(),
            time_consumed: report.elapsed_seconds(),
            links_found: report.visited_count as u64,
            result_filename: result_file.display().to_string(),
        }
    }
}

/// A recorded crawl summary
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRecord {
    pub id: i64,
    pub url: String,
    pub time_consumed: f64,
    pub links_found: u64,
    pub result_filename: String,
    pub created_at: String,
}
