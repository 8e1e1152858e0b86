//! Background search task manager.
//!
//! Runs magnet resolutions on a bounded worker pool, one in-flight task per
//! entity. Callers never block: `start` registers and returns, `status`
//! polls. The task registry is the only shared mutable structure and every
//! read-modify-write happens under its lock.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tokio::sync::{Mutex, Semaphore};
use tracing::{debug, info, warn};

use crate::config::TaskConfig;
use crate::metrics;
use crate::resolver::Resolver;
use crate::store::ResolvedLinkStore;

use super::types::{SearchOutcome, TaskEntry, TaskState};

/// Per-entity background search scheduling with single-flight semantics.
pub struct SearchTaskManager {
    resolver: Arc<dyn Resolver>,
    link_store: Arc<dyn ResolvedLinkStore>,
    tasks: Arc<Mutex<HashMap<i64, TaskEntry>>>,
    permits: Arc<Semaphore>,
}

impl SearchTaskManager {
    /// Create a manager with the given backends and worker-pool bound.
    pub fn new(
        resolver: Arc<dyn Resolver>,
        link_store: Arc<dyn ResolvedLinkStore>,
        config: TaskConfig,
    ) -> Self {
        Self {
            resolver,
            link_store,
            tasks: Arc::new(Mutex::new(HashMap::new())),
            permits: Arc::new(Semaphore::new(config.max_concurrent_searches.max(1))),
        }
    }

    /// Start (or re-use) a background search for the entity.
    ///
    /// Returns immediately: `failed` for a blank query, the cached
    /// `completed` outcome when a stored link exists and `force` is off,
    /// `running` when a task is already in flight, otherwise `queued` after
    /// scheduling a worker.
    pub async fn start(&self, entity_id: i64, query: &str, force: bool) -> SearchOutcome {
        let query = query.trim().to_string();
        if query.is_empty() {
            return SearchOutcome::failed(entity_id, "No search query was provided.", None);
        }

        if !force {
            if let Some(link) = self.link_store.load(entity_id).await {
                if !link.is_empty() {
                    return SearchOutcome::completed(
                        entity_id,
                        link,
                        "Magnet link already saved.",
                    );
                }
            }
        }

        {
            let mut tasks = self.tasks.lock().await;

            if !force {
                if let Some(entry) = tasks.get(&entity_id) {
                    if matches!(entry.state, TaskState::Queued | TaskState::Running) {
                        debug!(entity_id, "Search already in flight, not scheduling another");
                        return SearchOutcome::running(entity_id);
                    }
                }
            }

            tasks.insert(
                entity_id,
                TaskEntry {
                    query: query.clone(),
                    started_at: Utc::now(),
                    state: TaskState::Queued,
                },
            );
        }

        metrics::SEARCHES_STARTED.inc();
        info!(entity_id, query = %query, "Scheduling magnet search");
        self.spawn_worker(entity_id, query);

        SearchOutcome::queued(entity_id)
    }

    /// Current outcome for the entity.
    ///
    /// `running` while a task is unfinished, the terminal outcome once done,
    /// the persisted link when no in-memory task exists, `idle` otherwise.
    pub async fn status(&self, entity_id: i64) -> SearchOutcome {
        {
            let tasks = self.tasks.lock().await;
            if let Some(entry) = tasks.get(&entity_id) {
                match &entry.state {
                    TaskState::Queued | TaskState::Running => {
                        return SearchOutcome::running(entity_id);
                    }
                    TaskState::Done(outcome) => return outcome.clone(),
                }
            }
        }

        if let Some(link) = self.link_store.load(entity_id).await {
            if !link.is_empty() {
                return SearchOutcome::completed(entity_id, link, "Magnet link saved.");
            }
        }

        SearchOutcome::idle(entity_id)
    }

    fn spawn_worker(&self, entity_id: i64, query: String) {
        let resolver = Arc::clone(&self.resolver);
        let link_store = Arc::clone(&self.link_store);
        let tasks = Arc::clone(&self.tasks);
        let permits = Arc::clone(&self.permits);

        tokio::spawn(async move {
            let _permit = match permits.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => return, // pool torn down
            };

            {
                let mut tasks = tasks.lock().await;
                if let Some(entry) = tasks.get_mut(&entity_id) {
                    entry.state = TaskState::Running;
                }
            }

            let started = Instant::now();
            let outcome = match resolver.resolve(&query).await {
                Ok(Some(magnet)) => {
                    // A failing store does not demote the task: the link
                    // itself was found.
                    let message = match link_store.store(entity_id, &magnet).await {
                        Ok(()) => "Magnet link found and saved.",
                        Err(e) => {
                            warn!(entity_id, error = %e, "Failed to persist magnet link");
                            "Magnet link found, but saving it failed."
                        }
                    };
                    SearchOutcome::completed(entity_id, magnet, message)
                }
                Ok(None) => SearchOutcome::not_found(entity_id),
                Err(e) => {
                    warn!(entity_id, error = %e, "Magnet search failed");
                    SearchOutcome::failed(
                        entity_id,
                        format!("Magnet search failed: {}", e),
                        Some(e.to_string()),
                    )
                }
            };

            let label = outcome.status.as_str();
            metrics::SEARCHES_COMPLETED.with_label_values(&[label]).inc();
            metrics::RESOLUTION_DURATION
                .with_label_values(&[label])
                .observe(started.elapsed().as_secs_f64());
            info!(entity_id, status = label, "Magnet search finished");

            let mut tasks = tasks.lock().await;
            if let Some(entry) = tasks.get_mut(&entity_id) {
                entry.state = TaskState::Done(outcome);
            }
        });
    }
}
