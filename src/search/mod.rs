//! Faculty search: query model, HTTP API, result paging, URL state and the
//! incremental search controller.

pub mod api;
pub mod controller;
pub mod debounce;
pub mod filters;
pub mod pagination;
pub mod query;
pub mod render;
pub mod result;
pub mod url_state;

#[cfg(test)]
pub(crate) mod fake;

pub use api::{ApiError, HttpSearchApi, SearchApi};
pub use controller::{PendingSearch, SearchController, SearchControllerBuilder, SearchOutcome};
pub use filters::FilterOptions;
pub use pagination::Pagination;
pub use query::{Filters, Query, SearchRequest};
pub use render::{NullRenderer, Renderer};
pub use result::{FacultyRecord, SearchResponse};
pub use url_state::UrlState;

use crate::config::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Query must not be empty")]
    InvalidQuery,

    #[error("Invalid page {page}: pages start at 1")]
    InvalidPage { page: u32 },

    #[error("Search request failed: {0}")]
    Transport(#[from] ApiError),

    #[error("Search {sequence} was aborted before completing")]
    Aborted { sequence: u64 },

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

pub type SearchResult<T> = Result<T, SearchError>;
