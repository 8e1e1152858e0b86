//! Types for the background search task manager.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a search task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    /// Nothing has ever been started for this entity.
    Idle,
    /// A task is registered and waiting for a worker slot.
    Queued,
    /// A worker is resolving right now.
    Running,
    /// A magnet link was found.
    Completed,
    /// Resolution finished but nothing suitable was found.
    NotFound,
    /// Resolution failed.
    Failed,
}

impl SearchStatus {
    /// Stable label for metrics and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchStatus::Idle => "idle",
            SearchStatus::Queued => "queued",
            SearchStatus::Running => "running",
            SearchStatus::Completed => "completed",
            SearchStatus::NotFound => "not_found",
            SearchStatus::Failed => "failed",
        }
    }
}

/// Caller-visible result of a search task.
///
/// The field set is stable regardless of status so pollers never have to
/// branch on shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub status: SearchStatus,
    pub entity_id: i64,
    pub has_magnet: bool,
    pub magnet_link: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchOutcome {
    fn base(status: SearchStatus, entity_id: i64, message: impl Into<String>) -> Self {
        Self {
            status,
            entity_id,
            has_magnet: false,
            magnet_link: String::new(),
            message: message.into(),
            error: None,
        }
    }

    pub fn idle(entity_id: i64) -> Self {
        Self::base(
            SearchStatus::Idle,
            entity_id,
            "Magnet search has not been started yet.",
        )
    }

    pub fn queued(entity_id: i64) -> Self {
        Self::base(
            SearchStatus::Queued,
            entity_id,
            "Magnet link search started.",
        )
    }

    pub fn running(entity_id: i64) -> Self {
        Self::base(
            SearchStatus::Running,
            entity_id,
            "Search is in progress.",
        )
    }

    pub fn completed(entity_id: i64, magnet_link: String, message: impl Into<String>) -> Self {
        Self {
            has_magnet: true,
            magnet_link,
            ..Self::base(SearchStatus::Completed, entity_id, message)
        }
    }

    pub fn not_found(entity_id: i64) -> Self {
        Self::base(
            SearchStatus::NotFound,
            entity_id,
            "No suitable magnet link was found.",
        )
    }

    pub fn failed(entity_id: i64, message: impl Into<String>, error: Option<String>) -> Self {
        Self {
            error,
            ..Self::base(SearchStatus::Failed, entity_id, message)
        }
    }
}

/// Internal state of a registered task.
#[derive(Debug, Clone)]
pub enum TaskState {
    Queued,
    Running,
    Done(SearchOutcome),
}

/// A registered search task (in-memory only; lost on restart).
#[derive(Debug, Clone)]
pub struct TaskEntry {
    /// The query the task is resolving.
    pub query: String,
    /// When the task was registered.
    pub started_at: DateTime<Utc>,
    pub state: TaskState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&SearchStatus::NotFound).unwrap(),
            "\"not_found\""
        );
        assert_eq!(
            serde_json::to_string(&SearchStatus::Running).unwrap(),
            "\"running\""
        );
    }

    #[test]
    fn test_outcome_field_set_is_stable() {
        let outcome = SearchOutcome::queued(42);
        let json = serde_json::to_value(&outcome).unwrap();
        let object = json.as_object().unwrap();
        assert!(object.contains_key("status"));
        assert!(object.contains_key("entity_id"));
        assert!(object.contains_key("has_magnet"));
        assert!(object.contains_key("magnet_link"));
        assert!(object.contains_key("message"));
        // The error field only appears when populated.
        assert!(!object.contains_key("error"));
    }

    #[test]
    fn test_completed_outcome() {
        let outcome = SearchOutcome::completed(7, "magnet:?xt=urn:btih:aa".to_string(), "ok");
        assert_eq!(outcome.status, SearchStatus::Completed);
        assert!(outcome.has_magnet);
        assert_eq!(outcome.magnet_link, "magnet:?xt=urn:btih:aa");
    }

    #[test]
    fn test_failed_outcome_carries_detail() {
        let outcome = SearchOutcome::failed(7, "Magnet search failed: x", Some("x".to_string()));
        assert_eq!(outcome.status, SearchStatus::Failed);
        assert_eq!(outcome.error.as_deref(), Some("x"));
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"error\""));
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(SearchStatus::Completed.as_str(), "completed");
        assert_eq!(SearchStatus::NotFound.as_str(), "not_found");
    }
}
