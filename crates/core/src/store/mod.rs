//! External collaborator contracts: preferences and resolved-link storage.
//!
//! The engine never owns persistence. Callers inject implementations of
//! these traits; the in-memory ones here cover tests and single-process
//! deployments.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::ranking::SearchPriorities;

/// Error type for resolved-link store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("link store backend error: {0}")]
    Backend(String),
}

/// Read-only source of user search priorities.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Load the configured priorities.
    ///
    /// Never fails: implementations return [`SearchPriorities::default`]
    /// when the backing store is unavailable.
    async fn load_priorities(&self) -> SearchPriorities;
}

/// Storage for resolved magnet links, keyed by entity id.
#[async_trait]
pub trait ResolvedLinkStore: Send + Sync {
    /// Previously stored link for the entity, if any.
    async fn load(&self, entity_id: i64) -> Option<String>;

    /// Store (or replace) the resolved link for the entity.
    async fn store(&self, entity_id: i64, magnet: &str) -> Result<(), StoreError>;
}

/// Preference source that always yields defaults (all priorities zero).
pub struct DefaultPreferences;

#[async_trait]
impl PreferenceStore for DefaultPreferences {
    async fn load_priorities(&self) -> SearchPriorities {
        SearchPriorities::default()
    }
}

/// In-memory resolved-link store.
#[derive(Default)]
pub struct MemoryLinkStore {
    links: RwLock<HashMap<i64, String>>,
}

impl MemoryLinkStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResolvedLinkStore for MemoryLinkStore {
    async fn load(&self, entity_id: i64) -> Option<String> {
        self.links.read().await.get(&entity_id).cloned()
    }

    async fn store(&self, entity_id: i64, magnet: &str) -> Result<(), StoreError> {
        self.links
            .write()
            .await
            .insert(entity_id, magnet.to_string());
        Ok(())
    }
}
