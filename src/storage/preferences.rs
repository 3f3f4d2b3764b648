//! Persisted grid/list view flag.

use super::{read_json, write_json, KeyValueStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

pub const VIEW_MODE_KEY: &str = "grid_view";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    List,
    Grid,
}

impl ViewMode {
    pub fn is_grid(self) -> bool {
        self == ViewMode::Grid
    }

    pub fn toggled(self) -> Self {
        match self {
            ViewMode::List => ViewMode::Grid,
            ViewMode::Grid => ViewMode::List,
        }
    }
}

pub struct ViewPreference {
    mode: ViewMode,
    store: Arc<dyn KeyValueStore>,
}

impl ViewPreference {
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let mode = match read_json::<bool>(store.as_ref(), VIEW_MODE_KEY) {
            Ok(Some(true)) => ViewMode::Grid,
            Ok(Some(false)) | Ok(None) => ViewMode::List,
            Err(e) => {
                warn!(error = %e, "Failed to load view preference, using list view");
                ViewMode::List
            }
        };
        Self { mode, store }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn toggle(&mut self) -> ViewMode {
        self.set(self.mode.toggled());
        self.mode
    }

    pub fn set(&mut self, mode: ViewMode) {
        self.mode = mode;
        match write_json(self.store.as_ref(), VIEW_MODE_KEY, &mode.is_grid()) {
            Ok(()) => debug!(mode = ?mode, "View preference saved"),
            Err(e) => warn!(error = %e, "Failed to save view preference"),
        }
    }
}
