/*!
 * Subtitle index integration.
 *
 * - `client`: HTTP client for the community subtitle index
 * - `models`: entries, files, and resolved episodes
 * - `episode_number`: episode number inference from filenames
 */

pub mod client;
pub mod episode_number;
pub mod models;

pub use self::client::{titles_with_subtitles, EntryLookup, SubtitleIndexClient};
pub use self::episode_number::{resolve_episode_number, resolve_files, EpisodePattern};
pub use self::models::{ResolvedEpisode, SubtitleFile, SubtitleIndexEntry};
