//! Magnet resolution: search, enrich, rank, select.
//!
//! One resolution call is stateless: query the tracker aggregator, decide
//! whether the DHT fallback is worth the round trips, fold user priorities
//! into a deterministic ordering and construct the winning magnet URI.

mod magnet;

pub use magnet::{build_magnet, is_valid_info_hash};

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::config::Config;
use crate::ranking::candidate_sort_key;
use crate::searcher::{
    DhtDisabled, DhtLookup, DhtLookupSession, ScoredCandidate, SearchError, TrackerHttpClient,
    TrackerSearch,
};
use crate::store::PreferenceStore;

/// Placeholder rows some aggregators return instead of an empty list.
const NO_RESULTS_MARKER: &str = "no results";

/// Trait for title-to-magnet resolution.
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Resolve a free-text title to the best matching magnet URI.
    ///
    /// `Ok(None)` when the title is blank or no candidate qualifies.
    async fn resolve(&self, title: &str) -> Result<Option<String>, SearchError>;
}

/// Production resolver over the tracker aggregator and DHT backends.
pub struct MagnetResolver {
    tracker: Arc<dyn TrackerSearch>,
    dht: Arc<dyn DhtLookup>,
    preferences: Arc<dyn PreferenceStore>,
    announce_list: Vec<String>,
}

impl MagnetResolver {
    /// Create a resolver from explicit backends.
    pub fn new(
        tracker: Arc<dyn TrackerSearch>,
        dht: Arc<dyn DhtLookup>,
        preferences: Arc<dyn PreferenceStore>,
        announce_list: Vec<String>,
    ) -> Self {
        Self {
            tracker,
            dht,
            preferences,
            announce_list,
        }
    }

    /// Create a resolver from configuration.
    ///
    /// `dht.fallback_enabled = false` wires in the no-op DHT lookup, so the
    /// fallback decision below only has to consider candidate quality.
    pub fn from_config(config: &Config, preferences: Arc<dyn PreferenceStore>) -> Self {
        let tracker = Arc::new(TrackerHttpClient::new(config.search.clone()));
        let dht: Arc<dyn DhtLookup> = if config.dht.fallback_enabled {
            Arc::new(DhtLookupSession::new(config.dht.clone()))
        } else {
            Arc::new(DhtDisabled)
        };
        Self::new(tracker, dht, preferences, config.search.trackers.clone())
    }

    /// Pick the first sorted candidate that can produce a magnet.
    fn select_magnet(&self, candidates: &[ScoredCandidate]) -> Option<String> {
        for candidate in candidates {
            if candidate.name.to_lowercase().contains(NO_RESULTS_MARKER) {
                continue;
            }
            if let Some(magnet) = &candidate.magnet {
                if !magnet.trim().is_empty() {
                    return Some(magnet.clone());
                }
            }
            let Some(info_hash) = &candidate.info_hash else {
                continue;
            };
            if !is_valid_info_hash(info_hash) {
                continue;
            }
            return Some(build_magnet(
                info_hash.trim(),
                &candidate.name,
                &self.announce_list,
            ));
        }
        None
    }
}

#[async_trait]
impl Resolver for MagnetResolver {
    async fn resolve(&self, title: &str) -> Result<Option<String>, SearchError> {
        let query = title.trim();
        if query.is_empty() {
            return Ok(None);
        }

        let raw = self.tracker.search(query).await?;
        let mut candidates: Vec<ScoredCandidate> =
            raw.into_iter().map(ScoredCandidate::from_raw).collect();

        // The fallback is only worth the round trips when nothing from the
        // aggregator is already a best-tier release: some localized voice
        // (or at least not explicitly excluded) at 1080p.
        let has_best_tier = candidates
            .iter()
            .any(|c| c.voice_rank >= 0 && c.quality_rank == 0);
        if !has_best_tier {
            let dht_raw = self.dht.search(query).await;
            debug!(count = dht_raw.len(), "DHT fallback contributed candidates");
            candidates.extend(dht_raw.into_iter().map(|mut raw| {
                // The DHT never yields a magnet string or a payload size.
                raw.magnet = None;
                raw.size = 0;
                ScoredCandidate::from_raw(raw)
            }));
        }

        if candidates.is_empty() {
            return Ok(None);
        }

        let priorities = self.preferences.load_priorities().await;
        candidates.sort_by_cached_key(|c| candidate_sort_key(c, &priorities));

        Ok(self.select_magnet(&candidates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::SearchPriorities;
    use crate::searcher::RawCandidate;
    use crate::testing::{MockDhtLookup, MockPreferenceStore, MockTrackerSearch};

    const HTTP_HASH: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const DHT_HASH: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

    fn raw(name: &str, info_hash: Option<&str>, magnet: Option<&str>, seeders: u64) -> RawCandidate {
        RawCandidate {
            name: name.to_string(),
            info_hash: info_hash.map(str::to_string),
            magnet: magnet.map(str::to_string),
            seeders,
            size: 0,
        }
    }

    fn resolver(
        tracker: MockTrackerSearch,
        dht: MockDhtLookup,
        priorities: SearchPriorities,
    ) -> (MagnetResolver, Arc<MockDhtLookup>, Arc<MockTrackerSearch>) {
        let tracker = Arc::new(tracker);
        let dht = Arc::new(dht);
        let resolver = MagnetResolver::new(
            tracker.clone(),
            dht.clone(),
            Arc::new(MockPreferenceStore::new(priorities)),
            vec!["udp://tracker.example.org:1337/announce".to_string()],
        );
        (resolver, dht, tracker)
    }

    #[tokio::test]
    async fn test_blank_title_resolves_to_none_without_searching() {
        let (resolver, _dht, tracker) = resolver(
            MockTrackerSearch::new(),
            MockDhtLookup::new(),
            SearchPriorities::default(),
        );

        assert!(resolver.resolve("   ").await.unwrap().is_none());
        assert_eq!(tracker.search_count().await, 0);
    }

    #[tokio::test]
    async fn test_preserved_magnet_returned_verbatim() {
        let tracker = MockTrackerSearch::new();
        tracker
            .set_results(vec![raw(
                "Movie 1080p полный дубляж",
                None,
                Some("magnet:?xt=urn:btih:deadbeef&dn=x"),
                10,
            )])
            .await;
        let (resolver, _dht, _tracker) =
            resolver(tracker, MockDhtLookup::new(), SearchPriorities::default());

        let magnet = resolver.resolve("Movie").await.unwrap().unwrap();
        assert_eq!(magnet, "magnet:?xt=urn:btih:deadbeef&dn=x");
    }

    #[tokio::test]
    async fn test_magnet_reconstructed_from_info_hash() {
        let tracker = MockTrackerSearch::new();
        tracker
            .set_results(vec![raw("Movie 1080p дубляж", Some(HTTP_HASH), None, 10)])
            .await;
        let (resolver, _dht, _tracker) =
            resolver(tracker, MockDhtLookup::new(), SearchPriorities::default());

        let magnet = resolver.resolve("Movie").await.unwrap().unwrap();
        assert!(magnet.starts_with(&format!("magnet:?xt=urn:btih:{}", HTTP_HASH)));
        assert!(magnet.contains("dn=Movie%201080p%20%D0%B4%D1%83%D0%B1%D0%BB%D1%8F%D0%B6"));
        assert!(magnet.contains("tr=udp%3A%2F%2Ftracker.example.org%3A1337%2Fannounce"));
    }

    #[tokio::test]
    async fn test_no_results_marker_skipped() {
        let tracker = MockTrackerSearch::new();
        tracker
            .set_results(vec![
                raw("No Results Returned", Some(HTTP_HASH), None, 1000),
                raw("Actual Movie 1080p", Some(DHT_HASH), None, 1),
            ])
            .await;
        let (resolver, _dht, _tracker) =
            resolver(tracker, MockDhtLookup::new(), SearchPriorities::default());

        let magnet = resolver.resolve("Movie").await.unwrap().unwrap();
        assert!(magnet.contains(DHT_HASH));
    }

    #[tokio::test]
    async fn test_invalid_hash_skipped_for_next_candidate() {
        let tracker = MockTrackerSearch::new();
        tracker
            .set_results(vec![
                raw("Movie 1080p дубляж", Some("not-a-hash"), None, 1000),
                raw("Movie 720p", Some(HTTP_HASH), None, 5),
            ])
            .await;
        let (resolver, _dht, _tracker) =
            resolver(tracker, MockDhtLookup::new(), SearchPriorities::default());

        let magnet = resolver.resolve("Movie").await.unwrap().unwrap();
        assert!(magnet.contains(HTTP_HASH));
    }

    #[tokio::test]
    async fn test_no_qualifying_candidate_is_none() {
        let tracker = MockTrackerSearch::new();
        tracker
            .set_results(vec![raw("Movie 1080p русская озвучка", None, None, 50)])
            .await;
        let (resolver, _dht, _tracker) =
            resolver(tracker, MockDhtLookup::new(), SearchPriorities::default());

        assert!(resolver.resolve("Movie").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fallback_not_invoked_when_best_tier_present() {
        let tracker = MockTrackerSearch::new();
        tracker
            .set_results(vec![raw(
                "Movie 1080p полный дубляж",
                Some(HTTP_HASH),
                None,
                3,
            )])
            .await;
        let (resolver, dht, _tracker) =
            resolver(tracker, MockDhtLookup::new(), SearchPriorities::default());

        resolver.resolve("Movie").await.unwrap();
        assert_eq!(dht.search_count().await, 0);
    }

    #[tokio::test]
    async fn test_fallback_invoked_without_best_tier() {
        let tracker = MockTrackerSearch::new();
        // 1080p but explicitly no localized audio: not best tier.
        tracker
            .set_results(vec![raw(
                "Movie 1080p без перевода",
                Some(HTTP_HASH),
                None,
                3,
            )])
            .await;
        let (resolver, dht, _tracker) =
            resolver(tracker, MockDhtLookup::new(), SearchPriorities::default());

        resolver.resolve("Movie").await.unwrap();
        assert_eq!(dht.search_count().await, 1);
    }

    #[tokio::test]
    async fn test_dht_candidate_wins_with_reconstructed_magnet() {
        let tracker = MockTrackerSearch::new();
        tracker
            .set_results(vec![raw(
                "Example 2024 720p без перевода",
                Some(HTTP_HASH),
                None,
                10,
            )])
            .await;
        let dht = MockDhtLookup::new();
        dht.set_results(vec![raw(
            "Example 2024 1080p профессиональный дубляж",
            Some(DHT_HASH),
            None,
            40,
        )])
        .await;
        let (resolver, dht, _tracker) = resolver(tracker, dht, SearchPriorities::default());

        let magnet = resolver.resolve("Example Movie").await.unwrap().unwrap();
        assert_eq!(dht.search_count().await, 1);
        assert!(magnet.starts_with(&format!("magnet:?xt=urn:btih:{}", DHT_HASH)));
    }

    #[tokio::test]
    async fn test_dht_candidates_never_keep_magnet_or_size() {
        let tracker = MockTrackerSearch::new();
        tracker
            .set_results(vec![raw("Movie 480p", None, None, 1)])
            .await;
        let dht = MockDhtLookup::new();
        let mut planted = raw("Movie 1080p дубляж", Some(DHT_HASH), Some("magnet:bogus"), 9);
        planted.size = 123;
        dht.set_results(vec![planted]).await;
        let (resolver, _dht, _tracker) = resolver(tracker, dht, SearchPriorities::default());

        // The planted magnet must be discarded and rebuilt from the hash.
        let magnet = resolver.resolve("Movie").await.unwrap().unwrap();
        assert!(magnet.starts_with(&format!("magnet:?xt=urn:btih:{}", DHT_HASH)));
    }

    #[tokio::test]
    async fn test_tracker_error_propagates() {
        let tracker = MockTrackerSearch::new();
        tracker
            .set_next_error(SearchError::ConnectionFailed("refused".to_string()))
            .await;
        let (resolver, _dht, _tracker) =
            resolver(tracker, MockDhtLookup::new(), SearchPriorities::default());

        assert!(resolver.resolve("Movie").await.is_err());
    }

    #[tokio::test]
    async fn test_quality_priority_prefers_1080p_over_seeders() {
        let tracker = MockTrackerSearch::new();
        tracker
            .set_results(vec![
                raw("Movie 720p дубляж", Some(HTTP_HASH), None, 900),
                raw("Movie 1080p дубляж", Some(DHT_HASH), None, 2),
            ])
            .await;
        let priorities = SearchPriorities {
            quality_priority: 4,
            ..Default::default()
        };
        let (resolver, _dht, _tracker) = resolver(tracker, MockDhtLookup::new(), priorities);

        let magnet = resolver.resolve("Movie").await.unwrap().unwrap();
        assert!(magnet.contains(DHT_HASH));
    }
}
