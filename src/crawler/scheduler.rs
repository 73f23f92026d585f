//! Scheduler for the crawl's worker pool
//!
//! This module handles:
//! - The FIFO frontier of branches waiting to run
//! - A bounded set of in-flight branch tasks
//! - Joining finished tasks so the coordinator can enqueue their children
//!
//! The scheduler is drained once the frontier is empty and every task it
//! launched has been joined.

use std::collections::VecDeque;
use std::future::Future;
use tokio::task::{JoinError, JoinSet};
use url::Url;

/// One visit attempt for a URL at a given link distance from the seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    /// The URL to visit
    pub url: Url,

    /// Link distance from the seed (the seed is 0)
    pub depth: u32,
}

impl Branch {
    pub fn new(url: Url, depth: u32) -> Self {
        Self { url, depth }
    }

    /// The root branch of a crawl
    pub fn seed(url: Url) -> Self {
        Self::new(url, 0)
    }

    /// A branch one hop further from the seed
    pub fn child(&self, url: Url) -> Self {
        Self::new(url, self.depth + 1)
    }
}

/// Bounded worker pool over a queue of branches
pub struct Scheduler<T> {
    /// Branches waiting for a free slot
    frontier: VecDeque<Branch>,

    /// Running branch tasks
    in_flight: JoinSet<T>,

    /// Maximum number of tasks running at once
    max_in_flight: usize,
}

impl<T: Send + 'static> Scheduler<T> {
    /// Creates a scheduler that runs at most `max_in_flight` tasks at once
    ///
    /// A limit of zero is treated as one.
    pub fn new(max_in_flight: usize) -> Self {
        Self {
            frontier: VecDeque::new(),
            in_flight: JoinSet::new(),
            max_in_flight: max_in_flight.max(1),
        }
    }

    /// Adds a branch to the back of the frontier
    pub fn enqueue(&mut self, branch: Branch) {
        self.frontier.push_back(branch);
    }

    /// Spawns queued branches until the pool is full or the frontier is empty
    ///
    /// Returns the number of tasks launched. Must be called from within a
    /// Tokio runtime.
    pub fn launch_ready<F, Fut>(&mut self, mut launch: F) -> usize
    where
        F: FnMut(Branch) -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let mut launched = 0;
        while self.in_flight.len() < self.max_in_flight {
            let Some(branch) = self.frontier.pop_front() else {
                break;
            };
            self.in_flight.spawn(launch(branch));
            launched += 1;
        }
        launched
    }

    /// Waits for the next running task to finish
    ///
    /// Returns `None` when nothing is in flight.
    pub async fn next_completed(&mut self) -> Option<Result<T, JoinError>> {
        self.in_flight.join_next().await
    }

    /// Number of branches waiting in the frontier
    pub fn frontier_size(&self) -> usize {
        self.frontier.len()
    }

    /// Number of tasks currently running
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Returns true once there is nothing queued and nothing running
    pub fn is_drained(&self) -> bool {
        self.frontier.is_empty() && self.in_flight.is_empty()
    }
}
