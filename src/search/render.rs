//! Render callbacks driven by the controller.
//! The controller never touches a display directly; hosts implement this trait.

use super::pagination::Pagination;
use super::result::SearchResponse;

/// Callbacks invoked by [`SearchController`](super::SearchController).
///
/// Implementations must not call back into the controller synchronously:
/// completions are rendered while the controller's state lock is held.
pub trait Renderer: Send + Sync {
    fn render_suggestions(&self, suggestions: &[String]);

    fn clear_suggestions(&self);

    fn render_results(&self, response: &SearchResponse);

    fn render_stats(&self, response: &SearchResponse, page: u32);

    fn render_pagination(&self, _pagination: &Pagination) {}

    /// Shown in place of results; previously rendered results are otherwise untouched.
    fn render_error(&self, message: &str);

    fn render_loading_start(&self);

    fn render_loading_end(&self);

    /// Replace (not push) the visible URL's query string.
    fn replace_url(&self, _query_string: &str) {}
}

/// Renderer that discards everything. Useful for headless hosts.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render_suggestions(&self, _suggestions: &[String]) {}
    fn clear_suggestions(&self) {}
    fn render_results(&self, _response: &SearchResponse) {}
    fn render_stats(&self, _response: &SearchResponse, _page: u32) {}
    fn render_error(&self, _message: &str) {}
    fn render_loading_start(&self) {}
    fn render_loading_end(&self) {}
}
