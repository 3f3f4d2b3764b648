// Incremental search, suggestions and results handling for a faculty directory.

pub mod config;
pub mod search;
pub mod storage;
pub mod suggest;
pub mod telemetry;

pub use config::{Config, ConfigError};
pub use search::{
    FilterOptions, Filters, HttpSearchApi, PendingSearch, Query, Renderer, SearchController,
    SearchError, SearchOutcome, SearchResult,
};
pub use storage::{RecentQueryStore, ViewMode, ViewPreference};
pub use suggest::SuggestionProvider;

use std::sync::Arc;

/// Builds a controller talking HTTP to `config.api.base_url`, with history
/// persisted under `config.storage.data_dir`. The config is validated first.
pub fn connect(config: Config, renderer: Arc<dyn Renderer>) -> SearchResult<SearchController> {
    config.validate()?;
    let api = HttpSearchApi::new(&config.api)?;
    let controller = SearchController::builder(Arc::new(api), renderer)
        .with_config(config)
        .build()?;
    Ok(controller)
}
