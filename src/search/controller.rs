//! High-level coordinator: keystrokes -> suggestions, submits -> search API -> renderer.
//!
//! ```text
//! on_input ──debounce──> SuggestionProvider ──> render_suggestions
//! submit / go_to_page / change_filters ──> SearchApi ──(sequence guard)──> render_*
//! ```
//!
//! Every submit gets a sequence number. In-flight requests are never cancelled;
//! instead a completion is applied only if it belongs to the most recently
//! issued request, so an earlier response can never overwrite a later search.

use super::api::{ApiResult, SearchApi};
use super::debounce::Debouncer;
use super::filters::FilterOptions;
use super::pagination::Pagination;
use super::query::{Filters, Query, SearchRequest};
use super::render::Renderer;
use super::result::SearchResponse;
use super::url_state::UrlState;
use super::{SearchError, SearchResult};
use crate::config::{Config, ConfigResult};
use crate::storage::{FileStore, KeyValueStore, RecentQueryStore};
use crate::suggest::SuggestionProvider;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Shown in place of results whenever a search fails.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong while searching. Please try again.";

/// How a single search ended.
#[derive(Debug)]
pub enum SearchOutcome {
    /// Results were rendered.
    Applied,
    /// A newer request was issued before this one finished; nothing was rendered.
    Discarded,
    /// The error notice was rendered; earlier results were left in place.
    Failed(SearchError),
}

impl SearchOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, SearchOutcome::Applied)
    }

    pub fn is_discarded(&self) -> bool {
        matches!(self, SearchOutcome::Discarded)
    }
}

/// Handle to a spawned search. Dropping it does not cancel the search.
#[derive(Debug)]
pub struct PendingSearch {
    sequence: u64,
    handle: JoinHandle<SearchOutcome>,
}

impl PendingSearch {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Waits for the search to be applied, discarded or failed.
    pub async fn outcome(self) -> SearchOutcome {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(seq = self.sequence, error = %e, "Search task did not finish");
                SearchOutcome::Failed(SearchError::Aborted {
                    sequence: self.sequence,
                })
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ControllerSettings {
    min_query_chars: usize,
    suggestion_limit: usize,
    remote_suggestions: bool,
    default_page_size: u32,
}

impl From<&Config> for ControllerSettings {
    fn from(config: &Config) -> Self {
        Self {
            min_query_chars: config.search.min_query_chars.max(1),
            suggestion_limit: config.suggestions.limit,
            remote_suggestions: config.suggestions.remote,
            default_page_size: config.search.default_page_size.max(1),
        }
    }
}

#[derive(Debug, Default)]
struct ControllerState {
    /// Highest sequence number handed out. Only its completion is ever applied.
    last_issued: u64,
    current: Option<SearchRequest>,
    pagination: Option<Pagination>,
    suggestions_visible: bool,
}

struct Inner {
    api: Arc<dyn SearchApi>,
    renderer: Arc<dyn Renderer>,
    suggestions: Arc<SuggestionProvider>,
    debouncer: Debouncer,
    settings: ControllerSettings,
    state: Mutex<ControllerState>,
}

/// Cheaply cloneable handle; clones drive the same controller.
#[derive(Clone)]
pub struct SearchController {
    inner: Arc<Inner>,
}

impl SearchController {
    pub fn builder(api: Arc<dyn SearchApi>, renderer: Arc<dyn Renderer>) -> SearchControllerBuilder {
        SearchControllerBuilder::new(api, renderer)
    }

    /// Loads common suggestions and filter choices concurrently. Failures are
    /// logged; the controller works without either.
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> FilterOptions {
        let api = self.inner.api.as_ref();
        let (_, options) = futures::future::join(
            self.inner.suggestions.preload(api),
            FilterOptions::load(api),
        )
        .await;
        options
    }

    /// Called on every keystroke. Must be called from within a Tokio runtime.
    pub fn on_input(&self, text: &str) {
        let trimmed = text.trim();
        if trimmed.chars().count() < self.inner.settings.min_query_chars {
            self.inner.debouncer.cancel();
            self.inner.hide_suggestions();
            return;
        }

        let inner = Arc::clone(&self.inner);
        let partial = trimmed.to_string();
        self.inner.debouncer.schedule(async move {
            inner.show_suggestions(partial).await;
        });
    }

    /// Issues a search. Blank queries and page 0 are rejected before any
    /// request is made. Must be called from within a Tokio runtime.
    pub fn submit(&self, query: &str, page: u32, filters: Filters) -> SearchResult<PendingSearch> {
        let query = Query::parse(query)?;
        if page < 1 {
            return Err(SearchError::InvalidPage { page });
        }
        Ok(self.inner.dispatch(query, page, filters))
    }

    /// Merges `new_filters` into the current ones and searches page 1 again.
    /// Blank values remove a filter. `None` when nothing was searched yet.
    pub fn change_filters<I, K, V>(&self, new_filters: I) -> Option<PendingSearch>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let (query, mut filters) = {
            let state = self.inner.lock_state();
            let current = state.current.as_ref()?;
            (current.query.clone(), current.filters.clone())
        };
        filters.merge(new_filters);
        Some(self.inner.dispatch(query, 1, filters))
    }

    /// Re-runs the current search on page `page`. `Ok(None)` when nothing was searched yet.
    pub fn go_to_page(&self, page: u32) -> SearchResult<Option<PendingSearch>> {
        if page < 1 {
            return Err(SearchError::InvalidPage { page });
        }
        let current = self.inner.lock_state().current.clone();
        Ok(current.map(|current| self.inner.dispatch(current.query, page, current.filters)))
    }

    /// Restores a search from a visible-URL query string (`q`, `page`, filters).
    pub fn restore_from_url(&self, query_string: &str) -> Option<PendingSearch> {
        let state = UrlState::parse(query_string)?;
        debug!(query = %state.query, page = state.page, "Restoring search from URL");
        Some(self.inner.dispatch(state.query, state.page, state.filters))
    }

    pub fn current_request(&self) -> Option<SearchRequest> {
        self.inner.lock_state().current.clone()
    }

    pub fn current_query(&self) -> Option<Query> {
        self.inner.lock_state().current.as_ref().map(|c| c.query.clone())
    }

    pub fn current_page(&self) -> Option<u32> {
        self.inner.lock_state().current.as_ref().map(|c| c.page)
    }

    pub fn current_filters(&self) -> Filters {
        self.inner
            .lock_state()
            .current
            .as_ref()
            .map(|c| c.filters.clone())
            .unwrap_or_default()
    }

    /// Pagination derived from the last applied response.
    pub fn pagination(&self) -> Option<Pagination> {
        self.inner.lock_state().pagination
    }

    pub fn last_issued_sequence(&self) -> u64 {
        self.inner.lock_state().last_issued
    }

    pub fn suggestions_visible(&self) -> bool {
        self.inner.lock_state().suggestions_visible
    }

    pub fn suggestions(&self) -> &Arc<SuggestionProvider> {
        &self.inner.suggestions
    }
}

impl Inner {
    fn lock_state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn dispatch(self: &Arc<Self>, query: Query, page: u32, filters: Filters) -> PendingSearch {
        let request = {
            let mut state = self.lock_state();
            state.last_issued += 1;
            let request = SearchRequest {
                query,
                page,
                filters,
                sequence: state.last_issued,
            };
            state.current = Some(request.clone());
            request
        };

        debug!(
            seq = request.sequence,
            query = %request.query,
            page = request.page,
            filters = request.filters.len(),
            "Search issued"
        );
        self.renderer.render_loading_start();

        let sequence = request.sequence;
        let inner = Arc::clone(self);
        let handle = tokio::spawn(async move { inner.run(request).await });
        PendingSearch { sequence, handle }
    }

    async fn run(&self, request: SearchRequest) -> SearchOutcome {
        let _loading = LoadingGuard(self.renderer.as_ref());
        let started = Instant::now();
        let result = self.api.search(&request).await;
        self.complete(&request, result, started)
    }

    /// Applies or discards one completion. Runs entirely under the state lock
    /// so completions render one at a time.
    fn complete(
        &self,
        request: &SearchRequest,
        result: ApiResult<SearchResponse>,
        started: Instant,
    ) -> SearchOutcome {
        let mut state = self.lock_state();

        if request.sequence != state.last_issued {
            debug!(
                seq = request.sequence,
                last_issued = state.last_issued,
                "Discarding stale search response"
            );
            return SearchOutcome::Discarded;
        }

        match result {
            Ok(response) => {
                let page_size = match response.page_size {
                    0 => self.settings.default_page_size,
                    size => size,
                };
                let pagination = Pagination::new(request.page, response.total, page_size);
                state.pagination = Some(pagination);

                self.record_history(&request.query);
                self.renderer.render_results(&response);
                self.renderer.render_stats(&response, request.page);
                self.renderer.render_pagination(&pagination);

                let url = UrlState::new(request.query.clone(), request.page, request.filters.clone());
                self.renderer.replace_url(&url.to_query_string());

                info!(
                    seq = request.sequence,
                    total = response.total,
                    items = response.items.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Search applied"
                );
                SearchOutcome::Applied
            }
            Err(e) => {
                warn!(seq = request.sequence, api = self.api.name(), error = %e, "Search failed");
                self.renderer.render_error(GENERIC_ERROR_MESSAGE);
                SearchOutcome::Failed(SearchError::Transport(e))
            }
        }
    }

    fn record_history(&self, query: &Query) {
        self.suggestions
            .history()
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .add(query.as_str());
    }

    async fn show_suggestions(&self, partial: String) {
        let limit = self.settings.suggestion_limit;
        let suggestions = if self.settings.remote_suggestions {
            match self.api.suggestions(&partial).await {
                Ok(mut remote) => {
                    remote.truncate(limit);
                    remote
                }
                Err(e) => {
                    warn!(error = %e, "Failed to fetch suggestions");
                    Vec::new()
                }
            }
        } else {
            self.suggestions.suggest(&partial, limit)
        };

        if suggestions.is_empty() {
            self.hide_suggestions();
            return;
        }

        let mut state = self.lock_state();
        state.suggestions_visible = true;
        self.renderer.render_suggestions(&suggestions);
    }

    fn hide_suggestions(&self) {
        let mut state = self.lock_state();
        if state.suggestions_visible {
            state.suggestions_visible = false;
            self.renderer.clear_suggestions();
        }
    }
}

/// Ends the loading indicator when a search task finishes, panics or is aborted.
struct LoadingGuard<'a>(&'a dyn Renderer);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.render_loading_end();
    }
}

/// Assembles a controller from a config. Without an explicit provider, the
/// recent-query history is loaded from `storage` (or `config.storage.data_dir`).
pub struct SearchControllerBuilder {
    api: Arc<dyn SearchApi>,
    renderer: Arc<dyn Renderer>,
    config: Config,
    storage: Option<Arc<dyn KeyValueStore>>,
    suggestions: Option<Arc<SuggestionProvider>>,
}

impl SearchControllerBuilder {
    pub fn new(api: Arc<dyn SearchApi>, renderer: Arc<dyn Renderer>) -> Self {
        Self {
            api,
            renderer,
            config: Config::default(),
            storage: None,
            suggestions: None,
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn with_storage(mut self, storage: Arc<dyn KeyValueStore>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn with_suggestions(mut self, suggestions: Arc<SuggestionProvider>) -> Self {
        self.suggestions = Some(suggestions);
        self
    }

    /// Fails when the config does not pass [`Config::validate`].
    pub fn build(self) -> ConfigResult<SearchController> {
        let config = self.config;
        config.validate()?;

        let suggestions = match self.suggestions {
            Some(provider) => provider,
            None => {
                let storage = self.storage.unwrap_or_else(|| {
                    Arc::new(FileStore::new(config.storage.data_dir.clone())) as Arc<dyn KeyValueStore>
                });
                let history = RecentQueryStore::load(storage, config.storage.history_capacity);
                Arc::new(SuggestionProvider::new(history.into_shared()))
            }
        };

        Ok(SearchController {
            inner: Arc::new(Inner {
                api: self.api,
                renderer: self.renderer,
                suggestions,
                debouncer: Debouncer::new(config.search.debounce()),
                settings: ControllerSettings::from(&config),
                state: Mutex::new(ControllerState::default()),
            }),
        })
    }
}
