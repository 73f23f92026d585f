//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the SummaryStore trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{StorageResult, SummaryStore};
use crate::storage::{NewSummary, SummaryRecord};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const SELECT_COLUMNS: &str =
    "SELECT id, url, time_consumed, links_found, result_filename, created_at FROM sitemap";

/// SQLite storage backend
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `path`
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStore)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database or apply the schema
    pub fn open(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn summary_from_row(row: &Row<'_>) -> rusqlite::Result<SummaryRecord> {
    Ok(SummaryRecord {
        id: row.get(0)?,
        url: row.get(1)?,
        time_consumed: row.get(2)?,
        links_found: row.get::<_, i64>(3)?.max(0) as u64,
        result_filename: row.get(4)?,
        created_at: row.get(5)?,
    })
}

impl SummaryStore for SqliteStore {
    fn insert_summary(&mut self, summary: &NewSummary) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        let links_found = i64::try_from(summary.links_found).unwrap_or(i64::MAX);

        self.conn.execute(
            "INSERT INTO sitemap (url, time_consumed, links_found, result_filename, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                summary.url,
                summary.time_consumed,
                links_found,
                summary.result_filename,
                now
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn list_summaries(&self) -> StorageResult<Vec<SummaryRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} ORDER BY id ASC", SELECT_COLUMNS))?;

        let records = stmt
            .query_map([], summary_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    fn latest_summary_for(&self, url: &str) -> StorageResult<Option<SummaryRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{} WHERE url = ?1 ORDER BY id DESC LIMIT 1",
            SELECT_COLUMNS
        ))?;

        let record = stmt.query_row(params![url], summary_from_row).optional()?;
        Ok(record)
    }

    fn count_summaries(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM sitemap", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }
}
