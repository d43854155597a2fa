/*!
 * Source catalog model.
 *
 * The catalog has no API; its pages embed their data model as JSON. This
 * module reads the parts the pipeline needs out of that state and knows how
 * the catalog lays out its URLs.
 */

pub mod models;
pub mod urls;

pub use self::models::{search_records, EpisodePage, SourceRecord, TitlePage};
pub use self::urls::CatalogUrls;
