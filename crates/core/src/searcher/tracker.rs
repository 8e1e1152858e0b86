//! HTTP tracker aggregator backend implementation.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::SearchConfig;
use crate::metrics;

use super::{RawCandidate, SearchError, TrackerSearch};

/// Accepted key spellings for the seeder count, probed in order.
const SEEDER_ALIASES: &[&str] = &[
    "seeders",
    "seeds",
    "Seeders",
    "seeders_count",
    "num_seeders",
    "seedersCount",
];

/// Accepted key spellings for the info hash, probed in order.
const INFO_HASH_ALIASES: &[&str] = &["info_hash", "hash", "infoHash", "torrent_hash"];

/// Accepted key spellings for a ready-made magnet URI, probed in order.
const MAGNET_ALIASES: &[&str] = &["magnet", "magnet_link", "magnetLink"];

/// Search backend for a public tracker aggregator endpoint.
///
/// The upstream API is uncontrolled and its schema has drifted over time,
/// so every field is probed under several spellings and malformed values
/// degrade to defaults instead of failing the whole search.
pub struct TrackerHttpClient {
    client: Client,
    config: SearchConfig,
}

impl TrackerHttpClient {
    /// Create a new client with the configured request timeout.
    pub fn new(config: SearchConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Build the search URL by substituting the URL-escaped query into the
    /// configured template.
    fn build_search_url(&self, query: &str) -> String {
        self.config
            .search_url
            .replace("{query}", &urlencoding::encode(query))
    }
}

#[async_trait]
impl TrackerSearch for TrackerHttpClient {
    async fn search(&self, query: &str) -> Result<Vec<RawCandidate>, SearchError> {
        let url = self.build_search_url(query);
        debug!(query = %query, "Searching tracker aggregator");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                SearchError::Timeout
            } else {
                SearchError::ConnectionFailed(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::ConnectionFailed(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SearchError::ConnectionFailed(e.to_string()))?;
        let data: Value = serde_json::from_str(&body)
            .map_err(|e| SearchError::InvalidResponse(e.to_string()))?;

        let candidates = parse_candidates(&data, query);
        metrics::TRACKER_RESULTS.observe(candidates.len() as f64);
        debug!(
            query = %query,
            results = candidates.len(),
            "Tracker search complete"
        );

        Ok(candidates)
    }
}

/// Extract raw candidates from a tolerated response shape: a bare array of
/// result objects, or an object with a `results` array. Anything else is an
/// empty list, not an error.
fn parse_candidates(data: &Value, query: &str) -> Vec<RawCandidate> {
    let items = match data {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => match map.get("results").and_then(Value::as_array) {
            Some(items) => items.as_slice(),
            None => {
                warn!("Tracker response has no recognizable result list");
                return Vec::new();
            }
        },
        _ => return Vec::new(),
    };

    items
        .iter()
        .filter_map(Value::as_object)
        .map(|item| RawCandidate {
            name: extract_name(item, query),
            info_hash: extract_string(item, INFO_HASH_ALIASES),
            magnet: extract_string(item, MAGNET_ALIASES),
            seeders: extract_count(item, SEEDER_ALIASES),
            size: extract_count(item, &["size"]),
        })
        .collect()
}

fn extract_name(item: &serde_json::Map<String, Value>, query: &str) -> String {
    for key in ["name", "title"] {
        if let Some(name) = item.get(key).and_then(Value::as_str) {
            if !name.trim().is_empty() {
                return name.to_string();
            }
        }
    }
    query.to_string()
}

/// First non-blank string under any of the aliases, trimmed.
fn extract_string(item: &serde_json::Map<String, Value>, aliases: &[&str]) -> Option<String> {
    for key in aliases {
        if let Some(value) = item.get(*key).and_then(Value::as_str) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

/// First parseable non-negative integer under any of the aliases.
///
/// Accepts JSON numbers and numeric strings; unparseable values fall
/// through to the next alias and everything-failed defaults to 0.
fn extract_count(item: &serde_json::Map<String, Value>, aliases: &[&str]) -> u64 {
    for key in aliases {
        let Some(value) = item.get(*key) else {
            continue;
        };
        match value {
            Value::Number(n) => {
                if let Some(v) = n.as_u64() {
                    return v;
                }
                if let Some(v) = n.as_i64() {
                    return v.max(0) as u64;
                }
            }
            Value::String(s) => {
                if let Ok(v) = s.trim().parse::<i64>() {
                    return v.max(0) as u64;
                }
            }
            _ => {}
        }
    }
    0
}
