/*!
 * Error types for the subsieve library.
 *
 * Each layer has its own error enum so that every stage's failure mode is
 * visible in its signature. The public pipeline operations never return
 * these; they log them and fall back to their degraded value instead.
 */

use thiserror::Error;

/// Errors that can occur at the fetch boundary
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// The request could not be sent or the body could not be read
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The fetch collaborator gave up waiting for a response
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The remote answered with a non-success status
    #[error("Request to {url} responded with HTTP {status_code}")]
    Status {
        /// HTTP status code
        status_code: u16,
        /// Requested URL
        url: String,
    },

    /// The body was not the JSON shape we asked for
    #[error("Failed to parse response body: {0}")]
    ParseError(String),
}

/// Errors that can occur when talking to the subtitle index
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndexError {
    /// Transport or status failure
    #[error("Subtitle index request failed: {0}")]
    Fetch(#[from] FetchError),

    /// The identifier handed to the client cannot be used for a lookup
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// The configured endpoint is not a usable base URL
    #[error("Invalid subtitle index endpoint: {0}")]
    InvalidEndpoint(String),

    /// The index answered, but not with what its API documents
    #[error("Malformed subtitle index response: {0}")]
    MalformedResponse(String),
}

/// Errors raised inside a reconciliation pipeline operation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// Fetching a catalog page failed
    #[error("Catalog fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// The subtitle index could not be queried
    #[error("Subtitle index error: {0}")]
    Index(#[from] IndexError),

    /// The page carried no readable embedded state
    #[error("No embedded state found in page {url}")]
    MissingState {
        /// Page that was fetched
        url: String,
    },

    /// A catalog URL could not be built
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),

    /// The embedded state lacked a field the operation needs
    #[error("Missing field in page state: {0}")]
    MissingField(&'static str),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a pipeline operation
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
