//! Live query completions.
//! Matches a partial query against the preloaded common terms first, then the
//! recent-query history, skipping history entries that repeat a common term.

use crate::search::api::SearchApi;
use crate::storage::SharedHistory;
use std::sync::{PoisonError, RwLock};
use tracing::{debug, info, instrument, warn};

pub const DEFAULT_LIMIT: usize = 5;

pub struct SuggestionProvider {
    common_terms: RwLock<Vec<String>>,
    history: SharedHistory,
}

impl SuggestionProvider {
    /// Starts with an empty common-term list; see [`preload`](Self::preload).
    pub fn new(history: SharedHistory) -> Self {
        Self {
            common_terms: RwLock::new(Vec::new()),
            history,
        }
    }

    pub fn with_common_terms(history: SharedHistory, terms: Vec<String>) -> Self {
        Self {
            common_terms: RwLock::new(terms),
            history,
        }
    }

    pub fn history(&self) -> &SharedHistory {
        &self.history
    }

    /// Fetches the common-term list once. On failure the list stays as it was
    /// and suggestions fall back to history only.
    #[instrument(skip_all, fields(api = api.name()))]
    pub async fn preload(&self, api: &dyn SearchApi) -> bool {
        match api.common_suggestions().await {
            Ok(terms) => {
                info!(count = terms.len(), "Common suggestions loaded");
                self.set_common_terms(terms);
                true
            }
            Err(e) => {
                warn!(error = %e, "Failed to load common suggestions");
                false
            }
        }
    }

    pub fn set_common_terms(&self, terms: Vec<String>) {
        *self
            .common_terms
            .write()
            .unwrap_or_else(PoisonError::into_inner) = terms;
    }

    pub fn common_terms(&self) -> Vec<String> {
        self.common_terms
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Up to `limit` case-insensitive substring matches for `partial`.
    /// Common terms come first in their original order, then history entries.
    pub fn suggest(&self, partial: &str, limit: usize) -> Vec<String> {
        let needle = partial.trim().to_lowercase();
        if needle.is_empty() || limit == 0 {
            return Vec::new();
        }

        let mut picked = Picked::new(limit);

        {
            let terms = self
                .common_terms
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            picked.take_terms(terms.iter(), &needle);
        }

        if !picked.is_full() {
            let history = self.history.read().unwrap_or_else(PoisonError::into_inner);
            picked.take_history(history.entries().iter(), &needle);
        }

        debug!(partial = partial, count = picked.items.len(), "Suggestions computed");
        picked.items
    }
}

/// Accumulates matches up to a limit. Every matching common term is kept;
/// history entries already present among them (case-insensitive) are skipped.
struct Picked {
    items: Vec<String>,
    terms: Vec<String>,
    limit: usize,
}

impl Picked {
    fn new(limit: usize) -> Self {
        Self {
            items: Vec::with_capacity(limit),
            terms: Vec::new(),
            limit,
        }
    }

    fn is_full(&self) -> bool {
        self.items.len() >= self.limit
    }

    fn take_terms<'a>(&mut self, candidates: impl Iterator<Item = &'a String>, needle: &str) {
        for candidate in candidates {
            if self.is_full() {
                return;
            }
            let folded = candidate.to_lowercase();
            if folded.contains(needle) {
                self.items.push(candidate.clone());
                self.terms.push(folded);
            }
        }
    }

    fn take_history<'a>(&mut self, candidates: impl Iterator<Item = &'a String>, needle: &str) {
        for candidate in candidates {
            if self.is_full() {
                return;
            }
            let folded = candidate.to_lowercase();
            if folded.contains(needle) && !self.terms.contains(&folded) {
                self.items.push(candidate.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests;
