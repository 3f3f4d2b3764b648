//! Visible-URL query string: written after each successful search,
//! parsed at startup to restore the last search.

use super::query::{is_reserved_param, Filters, Query};
use url::form_urlencoded;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlState {
    pub query: Query,
    pub page: u32,
    pub filters: Filters,
}

impl UrlState {
    pub fn new(query: Query, page: u32, filters: Filters) -> Self {
        Self {
            query,
            page,
            filters,
        }
    }

    /// `q`, then `page` when above 1, then one parameter per filter.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        serializer.append_pair("q", self.query.as_str());
        if self.page > 1 {
            serializer.append_pair("page", &self.page.to_string());
        }
        for (name, value) in self.filters.iter() {
            if !is_reserved_param(name) {
                serializer.append_pair(name, value);
            }
        }
        serializer.finish()
    }

    /// Accepts a raw query string with or without the leading `?`.
    /// Returns `None` when `q` is absent or blank. Unparsable or zero pages become 1.
    pub fn parse(query_string: &str) -> Option<Self> {
        let raw = query_string.strip_prefix('?').unwrap_or(query_string);

        let mut query = None;
        let mut page = 1;
        let mut filters = Filters::new();

        for (name, value) in form_urlencoded::parse(raw.as_bytes()) {
            match &*name {
                "q" => query = Query::parse(&value).ok(),
                "page" => page = value.trim().parse::<u32>().ok().filter(|p| *p >= 1).unwrap_or(1),
                _ => filters.merge([(&*name, &*value)]),
            }
        }

        query.map(|query| Self::new(query, page, filters))
    }
}
