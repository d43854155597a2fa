/*!
 * # subsieve
 *
 * Cross-references an anime streaming catalog against a community subtitle
 * index so that only titles and episodes with subtitles are offered.
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `fetch`: The `PageFetcher` boundary and its HTTP and mock implementations
 * - `page_state`: Extraction of the JSON state embedded in catalog pages
 * - `catalog`: Source catalog records, page models, and URL layout
 * - `subtitles`: Subtitle index client and episode number inference:
 *   - `subtitles::client`: Index HTTP API client
 *   - `subtitles::episode_number`: Filename to episode number resolution
 * - `reconcile`: Pairing catalog records with index entries
 * - `pipeline`: The search, episode, stream, and details operations
 * - `external_id`: Lenient parsing of shared numeric identifiers
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod catalog;
pub mod errors;
pub mod external_id;
pub mod fetch;
pub mod page_state;
pub mod pipeline;
pub mod reconcile;
pub mod subtitles;

// Re-export main types for easier usage
pub use app_config::Config;
pub use catalog::{CatalogUrls, SourceRecord};
pub use errors::{AppError, FetchError, IndexError, PipelineError};
pub use fetch::{FetchRequest, FetchResponse, HttpFetcher, MockFetcher, PageFetcher};
pub use page_state::{extract_embedded_state, StateMarkers};
pub use pipeline::{ReconciledEpisode, ReconciliationPipeline, SearchResult, StreamResolution, TitleDetails};
pub use reconcile::{IdentifierMatcher, Reconciler};
pub use subtitles::{resolve_episode_number, ResolvedEpisode, SubtitleIndexClient, SubtitleIndexEntry};
