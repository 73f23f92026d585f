//! Storage traits and error types
//!
//! This module defines the trait interface for summary storage backends and
//! associated error types.

use crate::storage::{NewSummary, SummaryRecord};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for crawl summary storage backends
pub trait SummaryStore {
    /// Records one finished crawl
    ///
    /// # Returns
    ///
    /// The ID of the newly inserted record
    fn insert_summary(&mut self, summary: &NewSummary) -> StorageResult<i64>;

    /// Returns every recorded crawl, oldest first
    fn list_summaries(&self) -> StorageResult<Vec<SummaryRecord>>;

    /// Returns the most recent crawl of `url`, if any
    fn latest_summary_for(&self, url: &str) -> StorageResult<Option<SummaryRecord>>;

    /// Returns the number of recorded crawls
    fn count_summaries(&self) -> StorageResult<u64>;
}
