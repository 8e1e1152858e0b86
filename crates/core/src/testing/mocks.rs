//! Mock implementations of the search, resolution and store traits.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::ranking::SearchPriorities;
use crate::resolver::Resolver;
use crate::searcher::{DhtLookup, RawCandidate, SearchError, TrackerSearch};
use crate::store::PreferenceStore;

/// Mock tracker aggregator backend.
///
/// Returns configured results, records every query, and can fail the next
/// search with an injected error (consumed on use).
#[derive(Default)]
pub struct MockTrackerSearch {
    results: RwLock<Vec<RawCandidate>>,
    next_error: RwLock<Option<SearchError>>,
    queries: RwLock<Vec<String>>,
}

impl MockTrackerSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the results to return for subsequent searches.
    pub async fn set_results(&self, results: Vec<RawCandidate>) {
        *self.results.write().await = results;
    }

    /// Configure the next search to fail with the given error.
    pub async fn set_next_error(&self, error: SearchError) {
        *self.next_error.write().await = Some(error);
    }

    /// Queries recorded so far.
    pub async fn recorded_queries(&self) -> Vec<String> {
        self.queries.read().await.clone()
    }

    /// Number of searches performed.
    pub async fn search_count(&self) -> usize {
        self.queries.read().await.len()
    }
}

#[async_trait]
impl TrackerSearch for MockTrackerSearch {
    async fn search(&self, query: &str) -> Result<Vec<RawCandidate>, SearchError> {
        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }
        self.queries.write().await.push(query.to_string());
        Ok(self.results.read().await.clone())
    }
}

/// Mock DHT lookup with configurable results and a call counter.
#[derive(Default)]
pub struct MockDhtLookup {
    results: RwLock<Vec<RawCandidate>>,
    queries: RwLock<Vec<String>>,
}

impl MockDhtLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_results(&self, results: Vec<RawCandidate>) {
        *self.results.write().await = results;
    }

    pub async fn search_count(&self) -> usize {
        self.queries.read().await.len()
    }
}

#[async_trait]
impl DhtLookup for MockDhtLookup {
    async fn search(&self, query: &str) -> Vec<RawCandidate> {
        self.queries.write().await.push(query.to_string());
        self.results.read().await.clone()
    }
}

/// Preference store returning a fixed set of priorities.
pub struct MockPreferenceStore {
    priorities: SearchPriorities,
}

impl MockPreferenceStore {
    pub fn new(priorities: SearchPriorities) -> Self {
        Self { priorities }
    }
}

#[async_trait]
impl PreferenceStore for MockPreferenceStore {
    async fn load_priorities(&self) -> SearchPriorities {
        self.priorities
    }
}

/// Scripted outcome for [`MockResolver`].
#[derive(Debug, Clone)]
pub enum MockResolution {
    /// Resolve to this magnet link.
    Found(String),
    /// Resolve successfully but with no link.
    NotFound,
    /// Fail with a connection error carrying this message.
    Fail(String),
}

/// Mock resolver with a scripted outcome, optional artificial latency and a
/// call counter for single-flight assertions.
pub struct MockResolver {
    resolution: RwLock<MockResolution>,
    delay: RwLock<Option<Duration>>,
    calls: AtomicUsize,
}

impl Default for MockResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl MockResolver {
    pub fn new() -> Self {
        Self {
            resolution: RwLock::new(MockResolution::NotFound),
            delay: RwLock::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub async fn set_resolution(&self, resolution: MockResolution) {
        *self.resolution.write().await = resolution;
    }

    /// Make every resolution sleep before completing.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// Number of resolutions started.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Resolver for MockResolver {
    async fn resolve(&self, _title: &str) -> Result<Option<String>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match self.resolution.read().await.clone() {
            MockResolution::Found(magnet) => Ok(Some(magnet)),
            MockResolution::NotFound => Ok(None),
            MockResolution::Fail(message) => Err(SearchError::ConnectionFailed(message)),
        }
    }
}
