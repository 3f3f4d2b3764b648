//! Query, filter and request types.

use super::{SearchError, SearchResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Trimmed, non-empty query text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Query(String);

impl Query {
    pub fn parse(text: &str) -> SearchResult<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(SearchError::InvalidQuery);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive substring test used by suggestion matching.
    pub fn matches(&self, candidate: &str) -> bool {
        candidate.to_lowercase().contains(&self.0.to_lowercase())
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Query {
    type Error = SearchError;

    fn try_from(value: String) -> SearchResult<Self> {
        Query::parse(&value)
    }
}

impl From<Query> for String {
    fn from(query: Query) -> Self {
        query.0
    }
}

/// Named constraints sent alongside a query. Blank values are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters(BTreeMap<String, String>);

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds filters from raw form values, dropping blank names and values.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut filters = Self::new();
        filters.merge(pairs);
        filters
    }

    /// Overlays `pairs`; a blank value removes that filter instead of sending it.
    pub fn merge<I, K, V>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (name, value) in pairs {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            let value = value.as_ref().trim();
            if value.is_empty() {
                self.0.remove(name);
            } else {
                self.0.insert(name.to_string(), value.to_string());
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for Filters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

/// One issued search. `sequence` orders requests from the same controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: Query,
    pub page: u32,
    pub filters: Filters,
    pub sequence: u64,
}

impl SearchRequest {
    /// Flat key-value parameters as sent to the search endpoint.
    pub fn params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("q".to_string(), self.query.to_string()),
            ("page".to_string(), self.page.to_string()),
        ];
        params.extend(
            self.filters
                .iter()
                .filter(|(name, _)| !is_reserved_param(name))
                .map(|(name, value)| (name.to_string(), value.to_string())),
        );
        params
    }
}

/// Parameter names owned by the query and page; filters may not shadow them.
pub fn is_reserved_param(name: &str) -> bool {
    matches!(name, "q" | "page")
}
