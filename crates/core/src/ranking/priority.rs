//! Priority-weighted candidate ordering.
//!
//! User preferences weight three metrics (quality, voiceover, size). The
//! sort key contributes one component per nonzero-weight metric in
//! descending-weight order, followed by fixed tie-breakers, so the ordering
//! is a strict total order even when every priority is zero.

use serde::{Deserialize, Serialize};

use crate::searcher::ScoredCandidate;

/// User-configurable search priorities.
///
/// All-zero priorities disable preference weighting entirely; selection
/// then degrades to seeders-first with the fixed tie-breakers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchPriorities {
    #[serde(default)]
    pub quality_priority: u32,
    #[serde(default)]
    pub voice_priority: u32,
    #[serde(default)]
    pub size_priority: u32,
    #[serde(default = "default_auto_search")]
    pub auto_search_enabled: bool,
}

fn default_auto_search() -> bool {
    true
}

impl Default for SearchPriorities {
    fn default() -> Self {
        Self {
            quality_priority: 0,
            voice_priority: 0,
            size_priority: 0,
            auto_search_enabled: true,
        }
    }
}

#[derive(Clone, Copy)]
enum Metric {
    Quality,
    Voice,
    Size,
}

/// Build the ascending sort key for a candidate.
///
/// Weighted components are `-weight * score`, so higher weight and higher
/// score sort earlier. Tie-breakers, always appended in this order: more
/// seeders, higher voice score, lower quality rank, smaller size,
/// lexicographic name.
pub fn candidate_sort_key(
    candidate: &ScoredCandidate,
    priorities: &SearchPriorities,
) -> (Vec<i64>, String) {
    let mut weighted = [
        (Metric::Quality, priorities.quality_priority),
        (Metric::Voice, priorities.voice_priority),
        (Metric::Size, priorities.size_priority),
    ]
    .into_iter()
    .filter(|(_, weight)| *weight > 0)
    .collect::<Vec<_>>();
    // Stable sort: equal weights keep the quality, voice, size order.
    weighted.sort_by(|a, b| b.1.cmp(&a.1));

    let mut key = Vec::with_capacity(weighted.len() + 4);
    for (metric, weight) in weighted {
        let score = match metric {
            Metric::Quality => i64::from(candidate.quality_score),
            Metric::Voice => i64::from(candidate.voice_score),
            Metric::Size => candidate.size_score,
        };
        key.push(-(i64::from(weight)) * score);
    }

    key.push(-(candidate.seeders as i64));
    key.push(-i64::from(candidate.voice_score));
    key.push(i64::from(candidate.quality_rank));
    key.push(candidate.size as i64);

    (key, candidate.name.to_lowercase())
}
