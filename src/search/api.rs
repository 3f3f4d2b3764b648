//! Backend collaborators: search, suggestions and filter-choice lists.

use super::query::SearchRequest;
use super::result::SearchResponse;
use crate::config::ApiConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};
use url::Url;

const SEARCH_PATH: &str = "api/search";
const COMMON_SUGGESTIONS_PATH: &str = "api/suggestions/common";
const SUGGESTIONS_PATH: &str = "api/suggestions";
const DEPARTMENTS_PATH: &str = "api/departments";
const PROGRAMS_PATH: &str = "api/programs";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("API request failed: {0}")]
    RequestFailed(String),
    #[error("Request timed out")]
    Timeout,
    #[error("Backend returned HTTP {status}")]
    Status { status: u16 },
    #[error("Failed to decode response: {0}")]
    Decode(String),
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Contract of the faculty search backend. Calls are idempotent reads.
#[async_trait]
pub trait SearchApi: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &'static str;

    async fn search(&self, request: &SearchRequest) -> ApiResult<SearchResponse>;

    /// Bulk list of popular terms, fetched once at startup.
    async fn common_suggestions(&self) -> ApiResult<Vec<String>>;

    /// Per-keystroke completions for `prefix`.
    async fn suggestions(&self, prefix: &str) -> ApiResult<Vec<String>>;

    async fn departments(&self) -> ApiResult<Vec<String>>;

    async fn programs(&self) -> ApiResult<Vec<String>>;
}

#[derive(Deserialize)]
struct SuggestionsBody {
    #[serde(default)]
    suggestions: Vec<String>,
}

#[derive(Deserialize)]
struct DepartmentsBody {
    #[serde(default)]
    departments: Vec<String>,
}

#[derive(Deserialize)]
struct ProgramsBody {
    #[serde(default)]
    programs: Vec<String>,
}

/// `SearchApi` over HTTP GET with query-string parameters.
pub struct HttpSearchApi {
    client: Client,
    base_url: Url,
}

impl HttpSearchApi {
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: normalize_base(&config.base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute endpoint URL with the given query parameters appended.
    pub fn endpoint<'a, I>(&self, path: &str, params: I) -> ApiResult<Url>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut url = self.base_url.join(path)?;
        {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in params {
                pairs.append_pair(name, value);
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> ApiResult<T> {
        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout
            } else if e.is_connect() {
                ApiError::RequestFailed("Network unavailable".into())
            } else {
                ApiError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "Backend returned an error status");
            return Err(ApiError::Status {
                status: status.as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl SearchApi for HttpSearchApi {
    fn name(&self) -> &'static str {
        "http"
    }

    #[instrument(skip(self, request), fields(seq = request.sequence, page = request.page))]
    async fn search(&self, request: &SearchRequest) -> ApiResult<SearchResponse> {
        let params = request.params();
        let url = self.endpoint(
            SEARCH_PATH,
            params.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        )?;
        let response: SearchResponse = self.get_json(url).await?;
        debug!(
            items = response.items.len(),
            total = response.total,
            "Search response received"
        );
        Ok(response)
    }

    async fn common_suggestions(&self) -> ApiResult<Vec<String>> {
        let url = self.endpoint(COMMON_SUGGESTIONS_PATH, [])?;
        let body: SuggestionsBody = self.get_json(url).await?;
        Ok(body.suggestions)
    }

    async fn suggestions(&self, prefix: &str) -> ApiResult<Vec<String>> {
        let url = self.endpoint(SUGGESTIONS_PATH, [("q", prefix)])?;
        let body: SuggestionsBody = self.get_json(url).await?;
        Ok(body.suggestions)
    }

    async fn departments(&self) -> ApiResult<Vec<String>> {
        let url = self.endpoint(DEPARTMENTS_PATH, [])?;
        let body: DepartmentsBody = self.get_json(url).await?;
        Ok(body.departments)
    }

    async fn programs(&self) -> ApiResult<Vec<String>> {
        let url = self.endpoint(PROGRAMS_PATH, [])?;
        let body: ProgramsBody = self.get_json(url).await?;
        Ok(body.programs)
    }
}

/// Ensures a trailing slash so `join` appends instead of replacing the last segment.
fn normalize_base(raw: &str) -> ApiResult<Url> {
    let mut url = Url::parse(raw)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
