//! Choices for the department and program filter controls.

use super::api::{ApiResult, SearchApi};
use futures::future::join;
use serde::Serialize;
use tracing::{instrument, warn};

pub const DEPARTMENT_FILTER: &str = "department";
pub const PROGRAM_FILTER: &str = "program";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub departments: Vec<String>,
    pub programs: Vec<String>,
}

impl FilterOptions {
    /// Fetches both lists concurrently. A failed list is logged and left empty.
    #[instrument(skip_all, fields(api = api.name()))]
    pub async fn load(api: &dyn SearchApi) -> Self {
        let (departments, programs) = join(api.departments(), api.programs()).await;
        Self {
            departments: or_empty(departments, DEPARTMENT_FILTER),
            programs: or_empty(programs, PROGRAM_FILTER),
        }
    }
}

fn or_empty(result: ApiResult<Vec<String>>, list: &'static str) -> Vec<String> {
    result.unwrap_or_else(|e| {
        warn!(list = list, error = %e, "Failed to load filter options");
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::fake::FakeApi;

    #[tokio::test]
    async fn test_loads_both_lists() {
        let api = FakeApi::new();
        api.set_lists(Some(vec!["Law", "Medicine"]), Some(vec!["S1 Hukum"]));

        let options = FilterOptions::load(&api).await;
        assert_eq!(options.departments, vec!["Law", "Medicine"]);
        assert_eq!(options.programs, vec!["S1 Hukum"]);
    }

    #[tokio::test]
    async fn test_one_failed_list_does_not_block_the_other() {
        let api = FakeApi::new();
        api.set_lists(None, Some(vec!["S2 Ekonomi"]));

        let options = FilterOptions::load(&api).await;
        assert!(options.departments.is_empty());
        assert_eq!(options.programs, vec!["S2 Ekonomi"]);
    }
}
