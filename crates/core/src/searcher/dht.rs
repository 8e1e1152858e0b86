//! Best-effort DHT torrent lookup over an ephemeral librqbit session.
//!
//! One lookup = one session: wide-area DHT discovery only, no routing-table
//! persistence, no port forwarding. The query is hashed into a content
//! fingerprint and resolved in list-only mode, which transfers descriptive
//! metadata but never payload bytes. Everything is bounded by the configured
//! deadline and the session is stopped on every exit path.
//!
//! Nothing here fails past the `DhtLookup` boundary: a missing network,
//! a session that will not start, or a fingerprint nobody has all degrade
//! to an empty result.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use librqbit::{AddTorrent, AddTorrentOptions, AddTorrentResponse, Session, SessionOptions};
use sha1::{Digest, Sha1};
use tracing::{debug, warn};

use crate::config::DhtConfig;
use crate::metrics;
use crate::resolver::is_valid_info_hash;

use super::{DhtLookup, RawCandidate};

/// DHT lookup backed by an ephemeral librqbit session.
pub struct DhtLookupSession {
    config: DhtConfig,
}

impl DhtLookupSession {
    pub fn new(config: DhtConfig) -> Self {
        Self { config }
    }

    /// Build the session: DHT on, everything local/persistent off.
    async fn create_session(&self) -> Result<Arc<Session>, String> {
        let scratch_dir = std::env::temp_dir().join("lodestone-dht");
        std::fs::create_dir_all(&scratch_dir)
            .map_err(|e| format!("Failed to create session directory: {}", e))?;

        let opts = SessionOptions {
            disable_dht: false,
            disable_dht_persistence: true,
            persistence: None,
            enable_upnp_port_forwarding: false,
            ..Default::default()
        };

        Session::new_with_opts(scratch_dir, opts)
            .await
            .map_err(|e| format!("Failed to initialize DHT session: {}", e))
    }

    /// Resolve metadata for the query fingerprint within the deadline.
    async fn fetch_metadata(
        &self,
        session: &Arc<Session>,
        query: &str,
        deadline: Duration,
    ) -> Vec<RawCandidate> {
        let info_hash = query_fingerprint(query);
        let magnet = format!("magnet:?xt=urn:btih:{}", info_hash);

        let add_future = session.add_torrent(
            AddTorrent::from_url(&magnet),
            Some(AddTorrentOptions {
                list_only: true,
                ..Default::default()
            }),
        );

        let response = match tokio::time::timeout(deadline, add_future).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                debug!(info_hash = %info_hash, error = %e, "DHT metadata fetch failed");
                return Vec::new();
            }
            Err(_) => {
                debug!(info_hash = %info_hash, "DHT lookup deadline elapsed");
                return Vec::new();
            }
        };

        let listing = match response {
            AddTorrentResponse::ListOnly(listing) => listing,
            _ => {
                debug!("DHT lookup returned a non-list-only response");
                return Vec::new();
            }
        };

        let name = listing
            .info
            .name
            .as_ref()
            .map(|b| bytes_to_string(b.as_ref()))
            .unwrap_or_default();
        let hash = listing.info_hash.as_string();
        let seeders = listing.seen_peers.len() as u64;

        // Nameless or malformed replies are useless downstream.
        if name.trim().is_empty() || !is_valid_info_hash(&hash) {
            debug!(info_hash = %hash, "Discarding unusable DHT reply");
            return Vec::new();
        }

        debug!(info_hash = %hash, name = %name, seeders = seeders, "DHT reply collected");

        vec![RawCandidate {
            name,
            info_hash: Some(hash),
            magnet: None,
            seeders,
            size: 0,
        }]
    }
}

#[async_trait]
impl DhtLookup for DhtLookupSession {
    async fn search(&self, query: &str) -> Vec<RawCandidate> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let deadline = Duration::from_secs(self.config.timeout_secs.max(1));

        let session = match self.create_session().await {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "DHT lookup unavailable");
                metrics::DHT_LOOKUPS.with_label_values(&["error"]).inc();
                return Vec::new();
            }
        };

        let candidates = self.fetch_metadata(&session, query, deadline).await;

        // Teardown runs on every path, deadline expiry included.
        session.stop().await;

        let result = if candidates.is_empty() { "empty" } else { "hit" };
        metrics::DHT_LOOKUPS.with_label_values(&[result]).inc();

        candidates
    }
}

/// No-op lookup used when the DHT fallback is disabled by configuration.
pub struct DhtDisabled;

#[async_trait]
impl DhtLookup for DhtDisabled {
    async fn search(&self, _query: &str) -> Vec<RawCandidate> {
        Vec::new()
    }
}

/// Derive a 40-hex content fingerprint from a free-text query.
fn query_fingerprint(query: &str) -> String {
    let digest: [u8; 20] = Sha1::digest(query.as_bytes()).into();
    librqbit_core::Id20::new(digest).as_string()
}

/// Convert metadata name bytes to a string, tolerating broken encodings.
fn bytes_to_string(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => String::from_utf8_lossy(bytes).into_owned(),
    }
}
