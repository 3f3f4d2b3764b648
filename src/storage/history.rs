//! Bounded, most-recent-first list of committed queries.

use super::{read_json, write_json, KeyValueStore};
use std::sync::{Arc, RwLock};
use tracing::{debug, instrument, warn};

pub const HISTORY_KEY: &str = "recent_queries";
pub const DEFAULT_CAPACITY: usize = 10;

/// History shared between the controller (writer) and suggestions (reader).
pub type SharedHistory = Arc<RwLock<RecentQueryStore>>;

pub struct RecentQueryStore {
    entries: Vec<String>,
    capacity: usize,
    store: Arc<dyn KeyValueStore>,
}

impl RecentQueryStore {
    /// Reads the persisted list. Missing or corrupt data starts an empty history.
    #[instrument(skip(store))]
    pub fn load(store: Arc<dyn KeyValueStore>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let entries = match read_json::<Vec<String>>(store.as_ref(), HISTORY_KEY) {
            Ok(Some(mut entries)) => {
                entries.truncate(capacity);
                debug!(count = entries.len(), "Search history loaded");
                entries
            }
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to load search history, starting empty");
                Vec::new()
            }
        };

        Self {
            entries,
            capacity,
            store,
        }
    }

    pub fn into_shared(self) -> SharedHistory {
        Arc::new(RwLock::new(self))
    }

    /// Prepends `query` unless it is blank or already present verbatim.
    /// Returns whether the list changed.
    pub fn add(&mut self, query: &str) -> bool {
        if query.is_empty() || self.entries.iter().any(|entry| entry == query) {
            return false;
        }

        self.entries.insert(0, query.to_string());
        self.entries.truncate(self.capacity);
        self.persist();
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn persist(&self) {
        if let Err(e) = write_json(self.store.as_ref(), HISTORY_KEY, &self.entries) {
            warn!(error = %e, "Failed to save search history");
        }
    }
}

impl std::fmt::Debug for RecentQueryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecentQueryStore")
            .field("entries", &self.entries)
            .field("capacity", &self.capacity)
            .finish()
    }
}
