//! Search response and faculty record as returned by the backend.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacultyRecord {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub department: String,
    /// Relevance in [0, 1].
    #[serde(default)]
    pub score: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub research_areas: Option<String>,
    #[serde(default)]
    pub programs: Vec<String>,
}

impl FacultyRecord {
    /// Score as a whole percentage, e.g. `0.876` -> `88`.
    pub fn match_percent(&self) -> u8 {
        (self.score.clamp(0.0, 1.0) * 100.0).round() as u8
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "results", default)]
    pub items: Vec<FacultyRecord>,
    #[serde(default)]
    pub total: u64,
    #[serde(rename = "per_page", default)]
    pub page_size: u32,
    #[serde(rename = "search_time", default, skip_serializing_if = "Option::is_none")]
    pub elapsed_millis: Option<f64>,
}

impl SearchResponse {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
