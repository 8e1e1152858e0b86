//! Search lifecycle integration tests.
//!
//! These tests wire the real resolver (with mock network backends) into the
//! task manager and verify the complete flow:
//! start -> queued -> running -> {completed | not_found | failed}

use std::sync::Arc;
use std::time::Duration;

use lodestone_core::{
    testing::{MockDhtLookup, MockPreferenceStore, MockTrackerSearch},
    MagnetResolver, MemoryLinkStore, RawCandidate, ResolvedLinkStore, SearchPriorities,
    SearchStatus, SearchTaskManager, TaskConfig,
};

const HTTP_HASH: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
const DHT_HASH: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

/// Test helper holding the full engine with mock network backends.
struct TestHarness {
    manager: SearchTaskManager,
    tracker: Arc<MockTrackerSearch>,
    dht: Arc<MockDhtLookup>,
    link_store: Arc<MemoryLinkStore>,
}

impl TestHarness {
    fn new() -> Self {
        let tracker = Arc::new(MockTrackerSearch::new());
        let dht = Arc::new(MockDhtLookup::new());
        let link_store = Arc::new(MemoryLinkStore::new());

        let resolver = MagnetResolver::new(
            tracker.clone(),
            dht.clone(),
            Arc::new(MockPreferenceStore::new(SearchPriorities::default())),
            vec!["udp://tracker.opentrackr.org:1337/announce".to_string()],
        );

        let manager = SearchTaskManager::new(
            Arc::new(resolver),
            link_store.clone(),
            TaskConfig::default(),
        );

        Self {
            manager,
            tracker,
            dht,
            link_store,
        }
    }

    async fn wait_terminal(&self, entity_id: i64) -> lodestone_core::SearchOutcome {
        for _ in 0..200 {
            let outcome = self.manager.status(entity_id).await;
            if !matches!(outcome.status, SearchStatus::Queued | SearchStatus::Running) {
                return outcome;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("search task did not reach a terminal state");
    }
}

fn candidate(name: &str, info_hash: &str, seeders: u64) -> RawCandidate {
    RawCandidate {
        name: name.to_string(),
        info_hash: Some(info_hash.to_string()),
        magnet: None,
        seeders,
        size: 0,
    }
}

#[tokio::test]
async fn test_full_lifecycle_completes_and_persists() {
    let harness = TestHarness::new();
    harness
        .tracker
        .set_results(vec![candidate(
            "Example 2024 1080p полный дубляж",
            HTTP_HASH,
            25,
        )])
        .await;

    let outcome = harness.manager.start(100, "Example Movie", false).await;
    assert_eq!(outcome.status, SearchStatus::Queued);

    let outcome = harness.wait_terminal(100).await;
    assert_eq!(outcome.status, SearchStatus::Completed);
    assert!(outcome.has_magnet);
    assert!(outcome.magnet_link.contains(HTTP_HASH));
    assert!(outcome.magnet_link.contains("tr=udp%3A%2F%2Ftracker.opentrackr.org"));

    // The winning link was persisted through the injected store.
    let stored = harness.link_store.load(100).await.unwrap();
    assert_eq!(stored, outcome.magnet_link);

    // A best-tier HTTP candidate existed, so the DHT stayed cold.
    assert_eq!(harness.dht.search_count().await, 0);

    // A later start short-circuits on the persisted link.
    let outcome = harness.manager.start(100, "Example Movie", false).await;
    assert_eq!(outcome.status, SearchStatus::Completed);
    assert_eq!(harness.tracker.search_count().await, 1);
}

#[tokio::test]
async fn test_dht_fallback_wins_end_to_end() {
    let harness = TestHarness::new();
    harness
        .tracker
        .set_results(vec![candidate("Example 2024 720p без перевода", HTTP_HASH, 10)])
        .await;
    harness
        .dht
        .set_results(vec![candidate(
            "Example 2024 1080p профессиональный дубляж",
            DHT_HASH,
            40,
        )])
        .await;

    harness.manager.start(200, "Example Movie", false).await;
    let outcome = harness.wait_terminal(200).await;

    assert_eq!(outcome.status, SearchStatus::Completed);
    assert_eq!(harness.dht.search_count().await, 1);
    assert!(outcome
        .magnet_link
        .starts_with(&format!("magnet:?xt=urn:btih:{}", DHT_HASH)));
}

#[tokio::test]
async fn test_empty_pool_is_not_found() {
    let harness = TestHarness::new();

    harness.manager.start(300, "Nothing Anywhere", false).await;
    let outcome = harness.wait_terminal(300).await;

    assert_eq!(outcome.status, SearchStatus::NotFound);
    assert!(!outcome.has_magnet);
    assert!(harness.link_store.load(300).await.is_none());
}

#[tokio::test]
async fn test_tracker_failure_surfaces_as_failed_task() {
    let harness = TestHarness::new();
    harness
        .tracker
        .set_next_error(lodestone_core::SearchError::Timeout)
        .await;

    harness.manager.start(400, "Example Movie", false).await;
    let outcome = harness.wait_terminal(400).await;

    assert_eq!(outcome.status, SearchStatus::Failed);
    assert!(outcome.error.is_some());
}
