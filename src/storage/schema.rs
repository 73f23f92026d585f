//! Database schema definitions
//!
//! This module contains the SQL schema for the Sitegraph summary database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per finished crawl
CREATE TABLE IF NOT EXISTS sitemap (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL,
    time_consumed REAL NOT NULL,
    links_found INTEGER NOT NULL,
    result_filename TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sitemap_url ON sitemap(url);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
