//! Unit tests for suggestion ordering, limits and preload.

use super::*;
use crate::search::fake::FakeApi;
use crate::storage::{MemoryStore, RecentQueryStore};
use std::sync::Arc;

fn provider(terms: &[&str], history: &[&str]) -> SuggestionProvider {
    let mut store = RecentQueryStore::load(Arc::new(MemoryStore::new()), 10);
    // Stored most-recent-first, so add oldest first.
    for entry in history.iter().rev() {
        store.add(entry);
    }
    SuggestionProvider::with_common_terms(
        store.into_shared(),
        terms.iter().map(|t| t.to_string()).collect(),
    )
}

#[test]
fn common_terms_precede_history() {
    let p = provider(
        &["Computer Science", "Law", "Data Science"],
        &["social sciences", "science policy"],
    );

    assert_eq!(
        p.suggest("sci", DEFAULT_LIMIT),
        vec![
            "Computer Science",
            "Data Science",
            "social sciences",
            "science policy"
        ]
    );
}

#[test]
fn result_is_truncated_to_limit() {
    let p = provider(
        &["Science A", "Science B", "Science C", "Science D"],
        &["science e", "science f"],
    );

    let suggestions = p.suggest("sci", 5);
    assert_eq!(suggestions.len(), 5);
    assert_eq!(suggestions[4], "science e");
}

#[test]
fn history_duplicates_of_common_terms_are_skipped() {
    let p = provider(&["Data Science"], &["data science", "Political Science"]);

    assert_eq!(
        p.suggest("SCI", 5),
        vec!["Data Science", "Political Science"]
    );
}

#[test]
fn common_terms_are_kept_even_when_they_differ_only_in_case() {
    let p = provider(&["Data Science", "data science"], &["DATA SCIENCE"]);

    assert_eq!(p.suggest("sci", 5), vec!["Data Science", "data science"]);
}

#[test]
fn no_match_is_empty_not_error() {
    let p = provider(&["Law"], &["medicine"]);
    assert!(p.suggest("xyz", 5).is_empty());
}

#[test]
fn empty_common_terms_fall_back_to_history() {
    let p = provider(&[], &["robotics", "rocket science"]);
    assert_eq!(p.suggest("ro", 5), vec!["robotics", "rocket science"]);
}

#[test]
fn history_changes_are_visible() {
    let p = provider(&[], &[]);
    assert!(p.suggest("ling", 5).is_empty());

    p.history().write().unwrap().add("Linguistics");
    assert_eq!(p.suggest("ling", 5), vec!["Linguistics"]);
}

#[tokio::test]
async fn preload_loads_common_terms() {
    let api = FakeApi::new();
    api.set_common(Some(vec!["Artificial Intelligence", "Economics"]));
    let p = provider(&[], &[]);

    assert!(p.preload(&api).await);
    assert_eq!(p.suggest("ai", 5), Vec::<String>::new());
    assert_eq!(p.suggest("intel", 5), vec!["Artificial Intelligence"]);
}

#[tokio::test]
async fn preload_failure_is_silent() {
    let api = FakeApi::new();
    api.set_common(None);
    let p = provider(&["Law"], &[]);

    assert!(!p.preload(&api).await);
    assert_eq!(p.common_terms(), vec!["Law"]);
}
