//! Types for the magnet candidate search system.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ranking::{classify_release, score_quality, score_size, score_voice};

/// A raw search result from either source, before enrichment.
///
/// Both the tracker aggregator and the DHT produce wildly inconsistent
/// payloads; every field except the name is optional or defaulted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCandidate {
    /// Release name as reported by the source.
    pub name: String,
    /// Info hash (hex) if the source reported one; not yet validated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info_hash: Option<String>,
    /// Magnet URI reported verbatim by the source, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magnet: Option<String>,
    /// Seeder count; 0 when unknown or malformed.
    pub seeders: u64,
    /// Payload size in bytes; 0 when unknown.
    pub size: u64,
}

/// A candidate enriched with classification ranks and metric scores.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub name: String,
    pub info_hash: Option<String>,
    pub magnet: Option<String>,
    pub seeders: u64,
    pub size: u64,
    /// 0 = full dub, positive = other localized voiceover, negative = none.
    pub voice_rank: i32,
    /// 0 = 1080p (best) .. 5 = unknown (worst).
    pub quality_rank: i32,
    pub quality_score: i32,
    pub voice_score: i32,
    /// Non-positive; decreases as size grows.
    pub size_score: i64,
}

impl ScoredCandidate {
    /// Enrich a raw candidate with voice/quality ranks and metric scores.
    pub fn from_raw(raw: RawCandidate) -> Self {
        let (voice_rank, quality_rank) = classify_release(&raw.name);
        Self {
            quality_score: score_quality(quality_rank),
            voice_score: score_voice(voice_rank),
            size_score: score_size(raw.size),
            voice_rank,
            quality_rank,
            name: raw.name,
            info_hash: raw.info_hash,
            magnet: raw.magnet,
            seeders: raw.seeders,
            size: raw.size,
        }
    }
}

/// Errors that can occur while querying the tracker aggregator.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("tracker connection failed: {0}")]
    ConnectionFailed(String),

    #[error("tracker request timed out")]
    Timeout,

    #[error("tracker response is not valid JSON: {0}")]
    InvalidResponse(String),
}

/// Trait for the HTTP tracker aggregator backend.
#[async_trait]
pub trait TrackerSearch: Send + Sync {
    /// Execute a free-text search and return raw candidates.
    async fn search(&self, query: &str) -> Result<Vec<RawCandidate>, SearchError>;
}

/// Trait for the best-effort DHT lookup backend.
///
/// Infallible by contract: any internal failure degrades to an empty
/// result so the HTTP path's outcome is never affected.
#[async_trait]
pub trait DhtLookup: Send + Sync {
    async fn search(&self, query: &str) -> Vec<RawCandidate>;
}
