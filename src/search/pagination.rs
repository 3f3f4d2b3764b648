//! Page-window computation for the pagination control.

use serde::Serialize;

/// Pages shown on each side of the current page.
const WINDOW_RADIUS: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total: u64,
    pub page_size: u32,
}

impl Pagination {
    pub fn new(current_page: u32, total: u64, page_size: u32) -> Self {
        let page_size = page_size.max(1);
        let total_pages = total.div_ceil(u64::from(page_size));
        Self {
            current_page: current_page.max(1),
            total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX),
            total,
            page_size,
        }
    }

    /// No control renders for a single page of results.
    pub fn is_visible(&self) -> bool {
        self.total_pages > 1
    }

    /// Page numbers to render, empty when the control is hidden.
    pub fn window(&self) -> Vec<u32> {
        if !self.is_visible() {
            return Vec::new();
        }
        let start = self.current_page.saturating_sub(WINDOW_RADIUS).max(1);
        let end = self
            .current_page
            .saturating_add(WINDOW_RADIUS)
            .min(self.total_pages);
        (start..=end).collect()
    }

    pub fn previous(&self) -> Option<u32> {
        (self.is_visible() && self.current_page > 1).then(|| self.current_page - 1)
    }

    pub fn next(&self) -> Option<u32> {
        (self.is_visible() && self.current_page < self.total_pages).then(|| self.current_page + 1)
    }
}
