use crate::url::domain::domain_of;
use url::Url;

/// Checks whether a domain falls inside the crawl scope of `base_domain`
///
/// A domain is in scope when it equals the base domain or is any subdomain of
/// it. Sibling domains that merely end with the same characters are not:
/// `myexample.com` is outside the scope of `example.com`.
///
/// Both arguments are expected to be lowercase already.
///
/// # Examples
///
/// ```
/// use sitegraph::url::domain_in_scope;
///
/// assert!(domain_in_scope("example.com", "example.com"));
/// assert!(domain_in_scope("api.v2.example.com", "example.com"));
/// assert!(!domain_in_scope("myexample.com", "example.com"));
/// assert!(!domain_in_scope("example.com", "api.example.com"));
/// ```
pub fn domain_in_scope(candidate: &str, base_domain: &str) -> bool {
    if candidate.is_empty() || base_domain.is_empty() {
        return false;
    }

    candidate == base_domain
        || candidate
            .strip_suffix(base_domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

/// Checks whether a URL belongs to the same logical domain as the crawl seed
///
/// URLs without a host are never same-domain.
///
/// # Arguments
///
/// * `candidate` - An absolute URL discovered during the crawl
/// * `base_domain` - The lowercase host of the seed URL
pub fn same_domain(candidate: &Url, base_domain: &str) -> bool {
    domain_of(candidate).is_some_and(|domain| domain_in_scope(&domain, base_domain))
}
