//! Output module for writing crawl results
//!
//! This module handles:
//! - Writing the link graph as an XML sitemap
//! - Rendering the link graph as an SVG diagram
//! - Preparing the per-site output directory

mod diagram;
mod sitemap;

pub use diagram::{DiagramNode, LinkDiagram};
pub use sitemap::{format_sitemap_xml, write_sitemap_xml, SITEMAP_NAMESPACE};

use crate::url::output_dir_for;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to prepare output directory {path}: {source}")]
    Directory {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Creates (if needed) and returns the output directory for a seed URL
///
/// # Arguments
///
/// * `base` - Directory the per-site directory is created under
/// * `seed` - The crawl's seed URL
pub fn prepare_output_dir(base: &Path, seed: &str) -> OutputResult<PathBuf> {
    let dir = output_dir_for(base, seed);
    std::fs::create_dir_all(&dir).map_err(|source| OutputError::Directory {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}

/// Escapes text for use inside XML elements and attribute values
pub(crate) fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("plain"), "plain");
        assert_eq!(
            escape_xml(r#"<a href="x">&'"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&apos;"
        );
    }

    #[test]
    fn test_prepare_output_dir() {
        let base = TempDir::new().unwrap();

        let dir = prepare_output_dir(base.path(), "https://example.com/blog/").unwrap();

        assert_eq!(dir, base.path().join("example.com").join("blog"));
        assert!(dir.is_dir());

        // Existing directories are fine
        assert!(prepare_output_dir(base.path(), "https://example.com/blog/").is_ok());
    }

    #[test]
    fn test_prepare_output_dir_over_file_fails() {
        let base = TempDir::new().unwrap();
        std::fs::write(base.path().join("example.com"), "not a dir").unwrap();

        let result = prepare_output_dir(base.path(), "https://example.com/");
        assert!(matches!(result, Err(OutputError::Directory { .. })));
    }
}
