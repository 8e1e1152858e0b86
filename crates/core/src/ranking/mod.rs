//! Candidate classification, scoring and priority-weighted ordering.
//!
//! Pure, deterministic logic: release names are classified into voiceover
//! and quality ranks, ranks map to metric scores, and user priorities fold
//! the scores into a strict total order over candidates.

mod classify;
mod priority;
mod score;

pub use classify::{classify_release, DEFAULT_QUALITY_RANK, DEFAULT_VOICE_RANK};
pub use priority::{candidate_sort_key, SearchPriorities};
pub use score::{score_quality, score_size, score_voice};
