use url::Url;

/// Extracts the domain from a URL
///
/// The domain is the lowercase host of the URL. The port is not part of the
/// domain, so `http://example.com:8080/` and `https://example.com/` share one.
///
/// # Arguments
///
/// * `url` - The URL to extract the domain from
///
/// # Returns
///
/// * `Some(String)` - The lowercase domain/host
/// * `None` - If the URL has no host (e.g. `mailto:` or `data:` URLs)
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitegraph::url::domain_of;
///
/// let url = Url::parse("https://example.com/path").unwrap();
/// assert_eq!(domain_of(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("https://API.Example.COM/path").unwrap();
/// assert_eq!(domain_of(&url), Some("api.example.com".to_string()));
/// ```
pub fn domain_of(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}
