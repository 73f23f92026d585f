use crate::CrawlError;
use std::path::{Path, PathBuf};
use url::Url;

/// Parses and checks the seed URL of a crawl
///
/// The seed must be an absolute `http` or `https` URL with a host, since the
/// host becomes the crawl's domain scope.
pub fn parse_seed(seed: &str) -> Result<Url, CrawlError> {
    let url = Url::parse(seed.trim()).map_err(|source| CrawlError::InvalidSeed {
        url: seed.to_string(),
        source,
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(CrawlError::UnsupportedScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(CrawlError::MissingDomain(seed.to_string()));
    }

    Ok(url)
}

/// Resolves a raw link against the page it was found on
///
/// Returns `None` when the link cannot be joined onto the page URL or the
/// result is not an HTTP(S) URL.
///
/// # Examples
///
/// ```
/// use sitegraph::url::resolve_link;
/// use url::Url;
///
/// let page = Url::parse("https://example.com/docs/intro").unwrap();
/// let link = resolve_link(&page, "./setup").unwrap();
/// assert_eq!(link.as_str(), "https://example.com/docs/setup");
/// ```
pub fn resolve_link(page: &Url, raw: &str) -> Option<Url> {
    let resolved = page.join(raw.trim()).ok()?;
    match resolved.scheme() {
        "http" | "https" => Some(resolved),
        _ => None,
    }
}

/// Derives the per-site output directory for a seed URL
///
/// The trailing slash and the scheme are dropped, so `https://example.com/`
/// maps to `<base>/example.com`. Characters that are awkward in file names
/// become `_`, and empty or dot segments are skipped so the result always
/// stays below `base`.
pub fn output_dir_for(base: &Path, seed: &str) -> PathBuf {
    let trimmed = seed.trim().trim_end_matches('/');
    let without_scheme = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed);

    let mut dir = base.to_path_buf();
    for segment in without_scheme.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." {
            continue;
        }
        let cleaned: String = segment
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        dir.push(cleaned);
    }

    dir
}
