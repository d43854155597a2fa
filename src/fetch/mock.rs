/*!
 * Mock fetcher for testing.
 *
 * Serves canned responses keyed by exact URL and records every request it
 * receives, so tests can assert on both the output of an operation and the
 * calls it made:
 * - `MockFetcher::new().with_page(url, html)` - serve an HTML page
 * - `MockFetcher::new().with_json(url, &value)` - serve a JSON body
 * - `MockFetcher::new().with_failure(url, error)` - fail the fetch itself
 *
 * Unknown URLs answer with HTTP 404.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::FetchError;
use crate::fetch::{FetchRequest, FetchResponse, PageFetcher};

/// What the mock does when a URL is requested
#[derive(Debug, Clone, PartialEq)]
pub enum MockRoute {
    /// Answer with the given status and body
    Respond { status: u16, body: String },
    /// Fail the fetch with the given error
    Fail(FetchError),
}

/// Mock fetcher with canned routes
#[derive(Debug, Default)]
pub struct MockFetcher {
    /// Canned routes by exact URL
    routes: HashMap<String, MockRoute>,
    /// Every request received, in order
    requests: Arc<Mutex<Vec<FetchRequest>>>,
    /// Request counter
    request_count: Arc<AtomicUsize>,
}

impl MockFetcher {
    /// Create a mock with no routes
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route
    pub fn with_route(mut self, url: impl Into<String>, route: MockRoute) -> Self {
        self.routes.insert(url.into(), route);
        self
    }

    /// Serve a 200 response with the given body
    pub fn with_page(self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.with_status(url, 200, body)
    }

    /// Serve a response with an explicit status
    pub fn with_status(self, url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        self.with_route(
            url,
            MockRoute::Respond {
                status,
                body: body.into(),
            },
        )
    }

    /// Serve a value serialized as JSON
    pub fn with_json<T: Serialize>(self, url: impl Into<String>, value: &T) -> Self {
        let body = serde_json::to_string(value).unwrap_or_default();
        self.with_page(url, body)
    }

    /// Fail every fetch of the URL
    pub fn with_failure(self, url: impl Into<String>, error: FetchError) -> Self {
        self.with_route(url, MockRoute::Fail(error))
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Snapshot of all requests received so far
    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().clone()
    }

    /// Requests whose URL starts with the given prefix
    pub fn requests_to(&self, prefix: &str) -> Vec<FetchRequest> {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.url.starts_with(prefix))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, FetchError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());

        match self.routes.get(&request.url) {
            Some(MockRoute::Respond { status, body }) => {
                Ok(FetchResponse::new(request.url, *status, body.clone()))
            }
            Some(MockRoute::Fail(error)) => Err(error.clone()),
            None => Ok(FetchResponse::new(request.url, 404, "Not Found")),
        }
    }
}
