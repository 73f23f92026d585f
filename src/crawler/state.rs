//! Shared traversal state for one crawl
//!
//! `CrawlState` holds the visited set and the link graph together so that a
//! single lock covers both. Every branch of the crawl goes through that lock
//! for the visited test-and-set and for its graph write.

use crate::url::{domain_of, parse_seed};
use crate::CrawlError;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Mapping from a fetched page URL to the raw links found on it
pub type LinkGraph = BTreeMap<String, Vec<String>>;

/// State shared by all branches of a running crawl
pub type SharedState = Arc<Mutex<CrawlState>>;

/// Traversal state of a single crawl
#[derive(Debug)]
pub struct CrawlState {
    /// URLs that have been claimed for fetching
    visited: HashSet<String>,

    /// Raw links per successfully fetched URL
    graph: LinkGraph,

    /// Host of the seed URL
    domain: String,

    /// Deepest branch depth that is still fetched
    max_depth: u32,
}

impl CrawlState {
    /// Creates the state for a crawl rooted at `seed`
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlState)` - Empty state scoped to the seed's domain
    /// * `Err(CrawlError)` - The seed is not an absolute HTTP(S) URL with a host
    pub fn new(seed: &str, max_depth: u32) -> Result<Self, CrawlError> {
        let seed_url = parse_seed(seed)?;
        let domain =
            domain_of(&seed_url).ok_or_else(|| CrawlError::MissingDomain(seed.to_string()))?;

        Ok(Self {
            visited: HashSet::new(),
            graph: LinkGraph::new(),
            domain,
            max_depth,
        })
    }

    /// The domain every scheduled URL must belong to
    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Returns true if a branch at `depth` may still be fetched
    pub fn within_depth(&self, depth: u32) -> bool {
        depth <= self.max_depth
    }

    /// Claims `url` for fetching
    ///
    /// Returns true exactly once per URL: the first caller wins and every
    /// later caller sees false. Check and insert are one operation, so two
    /// branches can never both claim the same URL.
    pub fn try_visit(&mut self, url: &str) -> bool {
        self.visited.insert(url.to_string())
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Records the links found on a fetched page
    ///
    /// A URL's links are recorded once; a second write for the same URL is
    /// ignored and reported as `false`.
    pub fn record_links(&mut self, url: &str, links: Vec<String>) -> bool {
        if self.graph.contains_key(url) {
            tracing::warn!("Links for {} were already recorded, keeping the first set", url);
            return false;
        }
        self.graph.insert(url.to_string(), links);
        true
    }

    /// Number of URLs claimed so far, fetched or failed
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Number of URLs with a recorded graph entry
    pub fn pages_recorded(&self) -> usize {
        self.graph.len()
    }

    /// Moves the results out, leaving the state empty
    ///
    /// Only meant to be called once every branch has finished.
    pub fn take_results(&mut self) -> (usize, LinkGraph) {
        let visited = std::mem::take(&mut self.visited);
        (visited.len(), std::mem::take(&mut self.graph))
    }

    /// Wraps the state for sharing between branches
    pub fn into_shared(self) -> SharedState {
        Arc::new(Mutex::new(self))
    }
}

/// Locks the shared state
///
/// A branch that panicked while holding the lock leaves the state usable:
/// every mutation is a single insert, so there is no half-applied update to
/// recover from.
pub fn lock_state(state: &Mutex<CrawlState>) -> MutexGuard<'_, CrawlState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
