//! In-memory transport for unit and behavioural tests.
//!
//! [`FakeTransport`] serves canned JSON per `(method, route)` and records
//! every request it receives, so tests can assert on the exact sequence of
//! pages a stream asked for.
//!
//! # Examples
//!
//! ```
//! use octostore::github::test_support::FakeTransport;
//! use serde_json::json;
//!
//! let transport = FakeTransport::new();
//! transport.paged("/repos/octo/repo/issues", (1..=5).map(|id| json!({ "id": id })).collect());
//! assert!(transport.requests().is_empty());
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use http::Method;
use serde_json::Value;

use super::error::ModelError;
use super::transport::{GitHubClient, Transport};

/// A request observed by [`FakeTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: Method,
    /// Route relative to the API base.
    pub route: String,
    /// Query pairs as sent.
    pub query: Vec<(String, String)>,
    /// JSON body, if any.
    pub body: Option<Value>,
}

impl RecordedRequest {
    /// Returns the value of query parameter `key`, if sent.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    fn numeric_param(&self, key: &str) -> Option<usize> {
        self.param(key).and_then(|value| value.parse().ok())
    }
}

type Handler = Arc<dyn Fn(&RecordedRequest) -> Result<Value, ModelError> + Send + Sync>;

#[derive(Default)]
struct FakeState {
    handlers: HashMap<(Method, String), Handler>,
    log: Vec<RecordedRequest>,
    in_flight: usize,
    max_in_flight: usize,
}

/// Scripted [`Transport`] backed by per-route handlers.
///
/// Clones share handlers and the request log. Unregistered routes answer
/// with [`ModelError::NotFound`].
#[derive(Clone, Default)]
pub struct FakeTransport {
    state: Arc<Mutex<FakeState>>,
}

impl FakeTransport {
    /// Creates a transport with no routes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a client that shares this transport.
    #[must_use]
    pub fn client(&self) -> GitHubClient {
        GitHubClient::new(Arc::new(self.clone()))
    }

    /// Registers a handler for `method` on `route`, replacing any earlier one.
    pub fn on(
        &self,
        method: Method,
        route: &str,
        handler: impl Fn(&RecordedRequest) -> Result<Value, ModelError> + Send + Sync + 'static,
    ) {
        self.lock()
            .handlers
            .insert((method, route.to_owned()), Arc::new(handler));
    }

    /// Answers `GET route` with a fixed body.
    pub fn respond(&self, route: &str, body: Value) {
        self.on(Method::GET, route, move |_| Ok(body.clone()));
    }

    /// Answers `method route` with a fixed error.
    pub fn fail(&self, method: Method, route: &str, error: ModelError) {
        self.on(method, route, move |_| Err(error.clone()));
    }

    /// Serves `records` as a 1-based `page`/`per_page` listing on `GET route`.
    pub fn paged(&self, route: &str, records: Vec<Value>) {
        self.paged_from(route, records, 1);
    }

    /// Serves `records` as a `page`/`per_page` listing whose first page has
    /// index `first_page`.
    pub fn paged_from(&self, route: &str, records: Vec<Value>, first_page: usize) {
        self.on(Method::GET, route, move |request| {
            let per_page = request.numeric_param("per_page").unwrap_or(30);
            let page = request.numeric_param("page").unwrap_or(first_page);
            let start = page.saturating_sub(first_page).saturating_mul(per_page);
            let slice = records
                .iter()
                .skip(start)
                .take(per_page)
                .cloned()
                .collect();
            Ok(Value::Array(slice))
        });
    }

    /// Serves `records` on `GET route` by `since` watermark: each response
    /// holds the first `per_page` records whose `id` exceeds `since`.
    pub fn watermarked(&self, route: &str, records: Vec<Value>) {
        self.on(Method::GET, route, move |request| {
            let per_page = request.numeric_param("per_page").unwrap_or(30);
            let since = request
                .param("since")
                .and_then(|value| value.parse::<u64>().ok())
                .unwrap_or(0);
            let slice = records
                .iter()
                .filter(|record| {
                    record
                        .get("id")
                        .and_then(Value::as_u64)
                        .is_some_and(|id| id > since)
                })
                .take(per_page)
                .cloned()
                .collect();
            Ok(Value::Array(slice))
        });
    }

    /// Every request received so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().log.clone()
    }

    /// Requests received for `route`, in arrival order.
    #[must_use]
    pub fn requests_to(&self, route: &str) -> Vec<RecordedRequest> {
        self.lock()
            .log
            .iter()
            .filter(|request| request.route == route)
            .cloned()
            .collect()
    }

    /// Highest number of requests that were ever in flight at once.
    #[must_use]
    pub fn max_in_flight(&self) -> usize {
        self.lock().max_in_flight
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn request(
        &self,
        method: Method,
        route: &str,
        query: &[(String, String)],
        body: Option<Value>,
    ) -> Result<Value, ModelError> {
        let request = RecordedRequest {
            method,
            route: route.to_owned(),
            query: query.to_vec(),
            body,
        };

        let handler = {
            let mut state = self.lock();
            state.log.push(request.clone());
            state.in_flight += 1;
            state.max_in_flight = state.max_in_flight.max(state.in_flight);
            state
                .handlers
                .get(&(request.method.clone(), request.route.clone()))
                .cloned()
        };

        // Give sibling tasks a chance to overlap with this request.
        tokio::task::yield_now().await;

        let response = handler.map_or_else(
            || {
                Err(ModelError::NotFound {
                    message: format!("{} {}: no fake route", request.method, request.route),
                })
            },
            |respond| respond(&request),
        );

        self.lock().in_flight -= 1;
        response
    }
}
