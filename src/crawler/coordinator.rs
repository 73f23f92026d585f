//! Crawler coordinator - main crawl orchestration logic
//!
//! This module drives a crawl from its seed to completion:
//! - Owning the shared traversal state (visited set and link graph)
//! - Running each branch: depth check, visited claim, fetch, extraction
//! - Feeding same-domain children back into the scheduler
//! - Joining every branch before the results are read out

use crate::config::CrawlerConfig;
use crate::crawler::extract::extract_links;
use crate::crawler::fetcher::{FetchError, Fetcher};
use crate::crawler::scheduler::{Branch, Scheduler};
use crate::crawler::state::{lock_state, CrawlState, LinkGraph, SharedState};
use crate::url::{parse_seed, resolve_link, same_domain};
use crate::CrawlError;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Knobs the coordinator needs from the crawler configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlSettings {
    /// Deepest link distance from the seed that is still fetched
    pub max_depth: u32,

    /// Maximum number of branches running at once
    pub max_concurrent_fetches: usize,

    /// Log progress every this many fetched pages
    pub progress_interval: usize,
}

impl CrawlSettings {
    pub fn with_max_depth(max_depth: u32) -> Self {
        Self {
            max_depth,
            ..Self::default()
        }
    }
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self::from(&CrawlerConfig::default())
    }
}

impl From<&CrawlerConfig> for CrawlSettings {
    fn from(config: &CrawlerConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            max_concurrent_fetches: config.max_concurrent_fetches,
            progress_interval: config.progress_interval.max(1),
        }
    }
}

/// Result of a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// The seed URL the crawl started from
    pub seed: String,

    /// Wall-clock time from start until every branch finished
    pub elapsed: Duration,

    /// Number of URLs the crawl attempted, including failed fetches
    pub visited_count: usize,

    /// Raw links of every successfully fetched page
    pub graph: LinkGraph,
}

impl CrawlReport {
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    /// Number of pages that were fetched and have a graph entry
    pub fn pages_fetched(&self) -> usize {
        self.graph.len()
    }

    /// Number of attempted URLs that produced no graph entry
    pub fn failed_count(&self) -> usize {
        self.visited_count.saturating_sub(self.graph.len())
    }

    /// Total number of (page, link) edges in the graph
    pub fn link_count(&self) -> usize {
        self.graph.values().map(Vec::len).sum()
    }
}

/// How a single branch ended
#[derive(Debug)]
enum BranchOutcome {
    /// Deeper than the configured limit; nothing fetched
    TooDeep,

    /// Another branch already claimed the URL
    AlreadyVisited,

    /// The fetch failed; no graph entry was recorded
    Failed(FetchError),

    /// The page was fetched and its links recorded
    Fetched {
        url: Url,
        link_count: usize,
        children: Vec<Branch>,
    },
}

/// Everything a branch task needs, shared by all of them
struct BranchContext<F> {
    fetcher: Arc<F>,
    state: SharedState,
    domain: String,
    max_depth: u32,
}

/// Main crawler coordinator structure
pub struct Coordinator<F> {
    seed: Url,
    settings: CrawlSettings,
    fetcher: Arc<F>,
    state: SharedState,
}

impl<F: Fetcher + 'static> Coordinator<F> {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `seed` - Absolute HTTP(S) URL to start from; its host is the crawl's domain
    /// * `settings` - Depth and concurrency limits
    /// * `fetcher` - Retrieves page content
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(CrawlError)` - The seed URL is unusable
    pub fn new(seed: &str, settings: CrawlSettings, fetcher: F) -> Result<Self, CrawlError> {
        Self::with_shared_fetcher(seed, settings, Arc::new(fetcher))
    }

    /// Like [`Coordinator::new`], for a fetcher the caller keeps a handle to
    pub fn with_shared_fetcher(
        seed: &str,
        mut settings: CrawlSettings,
        fetcher: Arc<F>,
    ) -> Result<Self, CrawlError> {
        let seed_url = parse_seed(seed)?;
        let state = CrawlState::new(seed_url.as_str(), settings.max_depth)?;
        settings.progress_interval = settings.progress_interval.max(1);

        Ok(Self {
            seed: seed_url,
            settings,
            fetcher,
            state: state.into_shared(),
        })
    }

    /// Runs the crawl until every branch has finished
    ///
    /// This is the core crawling loop that:
    /// 1. Seeds the scheduler with the root branch at depth 0
    /// 2. Keeps up to `max_concurrent_fetches` branches running
    /// 3. Enqueues the children each finished branch reports
    /// 4. Stops once the frontier is empty and no branch is running
    ///
    /// Fetch failures and panicking branches are logged and end only their
    /// own branch.
    pub async fn run(self) -> CrawlReport {
        let start_time = Instant::now();
        let context = {
            let state = lock_state(&self.state);
            Arc::new(BranchContext {
                fetcher: self.fetcher.clone(),
                state: self.state.clone(),
                domain: state.domain().to_string(),
                max_depth: state.max_depth(),
            })
        };

        tracing::info!(
            "Starting crawl of {} (domain: {}, max depth: {})",
            self.seed,
            context.domain,
            context.max_depth
        );

        let mut scheduler = Scheduler::new(self.settings.max_concurrent_fetches);
        scheduler.enqueue(Branch::seed(self.seed.clone()));

        let mut pages_fetched = 0usize;
        let mut pages_failed = 0usize;

        loop {
            scheduler.launch_ready(|branch| visit_branch(branch, context.clone()));

            let joined = match scheduler.next_completed().await {
                Some(joined) => joined,
                None => break,
            };

            match joined {
                Ok(BranchOutcome::Fetched {
                    url,
                    link_count,
                    children,
                }) => {
                    pages_fetched += 1;
                    tracing::debug!(
                        "Fetched {} ({} links, {} new branches)",
                        url,
                        link_count,
                        children.len()
                    );
                    for child in children {
                        scheduler.enqueue(child);
                    }

                    if pages_fetched % self.settings.progress_interval == 0 {
                        let elapsed = start_time.elapsed();
                        let rate = pages_fetched as f64 / elapsed.as_secs_f64().max(f64::EPSILON);
                        tracing::info!(
                            "Progress: {} pages fetched, {} queued, {} in flight, {:.2} pages/sec",
                            pages_fetched,
                            scheduler.frontier_size(),
                            scheduler.in_flight(),
                            rate
                        );
                    }
                }
                Ok(BranchOutcome::Failed(error)) => {
                    pages_failed += 1;
                    tracing::warn!("Skipping {}: {}", error.url(), error);
                }
                Ok(BranchOutcome::AlreadyVisited) | Ok(BranchOutcome::TooDeep) => {}
                Err(e) => {
                    pages_failed += 1;
                    tracing::error!("Crawl branch aborted: {}", e);
                }
            }
        }

        let elapsed = start_time.elapsed();
        let (visited_count, graph) = lock_state(&self.state).take_results();

        tracing::info!(
            "Crawl completed: {} URLs visited ({} fetched, {} failed) in {:?}",
            visited_count,
            pages_fetched,
            pages_failed,
            elapsed
        );

        CrawlReport {
            seed: self.seed.to_string(),
            elapsed,
            visited_count,
            graph,
        }
    }
}

/// Runs one branch of the crawl
///
/// 1. Stops if the branch is deeper than the limit
/// 2. Claims the URL in the visited set; stops if it was already claimed
/// 3. Fetches the page; stops on failure without a graph entry
/// 4. Extracts links and records them under the page URL
/// 5. Returns the unvisited same-domain links as child branches
async fn visit_branch<F: Fetcher>(branch: Branch, context: Arc<BranchContext<F>>) -> BranchOutcome {
    if branch.depth > context.max_depth {
        return BranchOutcome::TooDeep;
    }

    let claimed = lock_state(&context.state).try_visit(branch.url.as_str());
    if !claimed {
        return BranchOutcome::AlreadyVisited;
    }

    tracing::trace!("Fetching {} at depth {}", branch.url, branch.depth);
    let content = match context.fetcher.fetch(&branch.url).await {
        Ok(content) => content,
        Err(error) => return BranchOutcome::Failed(error),
    };

    let links = extract_links(&content);
    let link_count = links.len();

    let mut seen = HashSet::new();
    let candidates: Vec<Url> = links
        .iter()
        .filter_map(|raw| resolve_link(&branch.url, raw))
        .filter(|url| same_domain(url, &context.domain))
        .filter(|url| seen.insert(url.as_str().to_string()))
        .collect();

    let child_depth = branch.depth + 1;
    let children = {
        let mut state = lock_state(&context.state);
        state.record_links(branch.url.as_str(), links);

        if state.within_depth(child_depth) {
            candidates
                .into_iter()
                .filter(|url| !state.is_visited(url.as_str()))
                .map(|url| branch.child(url))
                .collect()
        } else {
            Vec::new()
        }
    };

    BranchOutcome::Fetched {
        url: branch.url,
        link_count,
        children,
    }
}
