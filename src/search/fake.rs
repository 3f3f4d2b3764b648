//! Scriptable in-process `SearchApi` for tests.

use super::api::{ApiError, ApiResult, SearchApi};
use super::query::SearchRequest;
use super::result::{FacultyRecord, SearchResponse};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::oneshot;

/// Scripted result: a response or a failing HTTP status.
pub(crate) type Scripted = Result<SearchResponse, u16>;

#[derive(Default)]
pub(crate) struct FakeApi {
    responses: Mutex<HashMap<String, Scripted>>,
    gates: Mutex<HashMap<String, oneshot::Receiver<Scripted>>>,
    panics: Mutex<HashSet<String>>,
    common: Mutex<Option<Vec<String>>>,
    remote: Mutex<Option<Vec<String>>>,
    departments: Mutex<Option<Vec<String>>>,
    programs: Mutex<Option<Vec<String>>>,
    requests: Mutex<Vec<SearchRequest>>,
    suggestion_calls: AtomicUsize,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers searches for `query` immediately.
    pub fn respond(&self, query: &str, response: SearchResponse) {
        self.responses
            .lock()
            .unwrap()
            .insert(query.to_string(), Ok(response));
    }

    pub fn fail(&self, query: &str, status: u16) {
        self.responses
            .lock()
            .unwrap()
            .insert(query.to_string(), Err(status));
    }

    /// Holds the next search for `query` until the returned sender fires.
    pub fn gate(&self, query: &str) -> oneshot::Sender<Scripted> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(query.to_string(), rx);
        tx
    }

    /// Searches for `query` panic inside the API call.
    pub fn panic_on(&self, query: &str) {
        self.panics.lock().unwrap().insert(query.to_string());
    }

    pub fn set_common(&self, terms: Option<Vec<&str>>) {
        *self.common.lock().unwrap() = terms.map(owned);
    }

    pub fn set_remote(&self, terms: Option<Vec<&str>>) {
        *self.remote.lock().unwrap() = terms.map(owned);
    }

    pub fn set_lists(&self, departments: Option<Vec<&str>>, programs: Option<Vec<&str>>) {
        *self.departments.lock().unwrap() = departments.map(owned);
        *self.programs.lock().unwrap() = programs.map(owned);
    }

    pub fn requests(&self) -> Vec<SearchRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn suggestion_calls(&self) -> usize {
        self.suggestion_calls.load(Ordering::SeqCst)
    }

    fn scripted(&self, query: &str) -> Scripted {
        let responses = self.responses.lock().unwrap();
        responses
            .get(query)
            .cloned()
            .unwrap_or_else(|| Ok(response(&[], 0, 10)))
    }
}

fn owned(terms: Vec<&str>) -> Vec<String> {
    terms.into_iter().map(str::to_string).collect()
}

fn list(source: &Mutex<Option<Vec<String>>>) -> ApiResult<Vec<String>> {
    source
        .lock()
        .unwrap()
        .clone()
        .ok_or(ApiError::Status { status: 503 })
}

#[async_trait]
impl SearchApi for FakeApi {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn search(&self, request: &SearchRequest) -> ApiResult<SearchResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let key = request.query.as_str();
        if self.panics.lock().unwrap().contains(key) {
            panic!("scripted panic for {key:?}");
        }

        let gate = self.gates.lock().unwrap().remove(key);
        let scripted = match gate {
            Some(rx) => rx
                .await
                .map_err(|_| ApiError::RequestFailed("gate dropped".into()))?,
            None => self.scripted(key),
        };

        scripted.map_err(|status| ApiError::Status { status })
    }

    async fn common_suggestions(&self) -> ApiResult<Vec<String>> {
        list(&self.common)
    }

    async fn suggestions(&self, _prefix: &str) -> ApiResult<Vec<String>> {
        self.suggestion_calls.fetch_add(1, Ordering::SeqCst);
        list(&self.remote)
    }

    async fn departments(&self) -> ApiResult<Vec<String>> {
        list(&self.departments)
    }

    async fn programs(&self) -> ApiResult<Vec<String>> {
        list(&self.programs)
    }
}

pub(crate) fn record(id: u64) -> FacultyRecord {
    FacultyRecord {
        id,
        name: format!("Faculty member {id}"),
        department: "Computer Science".to_string(),
        score: 0.5,
        email: None,
        phone: None,
        research_areas: None,
        programs: Vec::new(),
    }
}

pub(crate) fn response(ids: &[u64], total: u64, per_page: u32) -> SearchResponse {
    SearchResponse {
        items: ids.iter().copied().map(record).collect(),
        total,
        page_size: per_page,
        elapsed_millis: Some(3.0),
    }
}
