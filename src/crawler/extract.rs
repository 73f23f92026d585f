//! Lenient link extraction from raw markup
//!
//! Links are pulled out with a pattern match over the raw text instead of a
//! full HTML parse. Malformed markup never fails extraction; the trade-off is
//! that an anchor inside a comment or script is picked up like any other and
//! an unusual anchor may be missed.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches `<a ... href="...">` and captures the href value
static ANCHOR_HREF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<a\s(?:[^>]*?\s)?href\s*=\s*["']([^"']*)["']"#)
        .expect("anchor href pattern is valid")
});

/// Extracts navigable links from raw page content
///
/// Only hrefs that look like page links survive: absolute `http://` or
/// `https://` URLs and paths starting with `/` or `./`. Everything else
/// (`mailto:`, `javascript:`, `#fragment`, bare relative paths) is dropped.
///
/// The result keeps document order and keeps duplicates.
///
/// # Example
///
/// ```
/// use sitegraph::crawler::extract_links;
///
/// let html = r##"<a href="mailto:x@example.com">mail</a>
///                <a href="/about">About</a>
///                <a href="http://example.com/x">X</a>
///                <a href="#top">Top</a>"##;
/// assert_eq!(extract_links(html), vec!["/about", "http://example.com/x"]);
/// ```
pub fn extract_links(content: &str) -> Vec<String> {
    ANCHOR_HREF
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|href| is_navigable(href))
        .map(str::to_string)
        .collect()
}

/// Returns true if a raw href looks like a link to another page
pub fn is_navigable(href: &str) -> bool {
    let lower = href.get(..8).unwrap_or(href).to_ascii_lowercase();
    lower.starts_with("http://")
        || lower.starts_with("https://")
        || href.starts_with('/')
        || href.starts_with("./")
}
