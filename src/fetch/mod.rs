/*!
 * Fetch boundary for catalog pages and subtitle index calls.
 *
 * The rest of the crate never talks to the network directly; it goes through
 * the `PageFetcher` trait so that the transport can be swapped:
 * - `http`: reqwest-backed implementation used in production
 * - `mock`: canned-route implementation used by tests and benches
 */

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::fmt::Debug;

use crate::errors::FetchError;

/// A GET request with optional extra headers
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    /// Absolute URL to fetch
    pub url: String,
    /// Extra request headers, in insertion order
    pub headers: Vec<(String, String)>,
}

impl FetchRequest {
    /// Create a plain GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
        }
    }

    /// Add a header to the request
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Look up a header value by case-insensitive name
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A fully buffered response
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResponse {
    /// URL the response belongs to
    pub url: String,
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl FetchResponse {
    pub fn new(url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-success status into a `FetchError::Status`
    pub fn error_for_status(self) -> Result<Self, FetchError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(FetchError::Status {
                status_code: self.status,
                url: self.url,
            })
        }
    }

    /// Borrow the body as text
    pub fn text(&self) -> &str {
        &self.body
    }

    /// Parse the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        serde_json::from_str(&self.body)
            .map_err(|e| FetchError::ParseError(format!("{} ({})", e, self.url)))
    }
}

/// Common trait for all fetch implementations
///
/// Implementations must not retry on their own; a failed fetch is reported
/// once and the caller decides what it means. Deadlines are the
/// implementation's job and surface as `FetchError::Timeout`.
#[async_trait]
pub trait PageFetcher: Send + Sync + Debug {
    /// Perform the request and buffer the whole response
    ///
    /// Non-success statuses are returned as responses, not errors.
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, FetchError>;
}

pub mod http;
pub mod mock;

pub use self::http::HttpFetcher;
pub use self::mock::{MockFetcher, MockRoute};
