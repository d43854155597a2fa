use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use log::{debug, info, warn};
use serde_json::Value;
use url::Url;

use crate::app_config::SubtitleIndexConfig;
use crate::errors::IndexError;
use crate::external_id::ExternalId;
use crate::fetch::{FetchRequest, PageFetcher};
use crate::subtitles::episode_number::resolve_files;
use crate::subtitles::models::{
    RawEntry, RawFile, ResolvedEpisode, SubtitleFile, SubtitleIndexEntry,
};

/// How to find a title in the subtitle index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryLookup {
    /// Exact lookup by shared numeric identifier
    ExternalId(ExternalId),
    /// Free-text search, first result wins
    Title(String),
}

impl EntryLookup {
    /// Prefer the numeric identifier, fall back to the title
    ///
    /// Returns `None` when neither is usable.
    pub fn from_parts(external_id: Option<ExternalId>, title: &str) -> Option<Self> {
        match external_id {
            Some(id) => Some(Self::ExternalId(id)),
            None if !title.trim().is_empty() => Some(Self::Title(title.trim().to_string())),
            None => None,
        }
    }
}

impl fmt::Display for EntryLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExternalId(id) => write!(f, "external id {}", id),
            Self::Title(title) => write!(f, "title '{}'", title),
        }
    }
}

/// Client for the subtitle index HTTP API
///
/// Every request carries the configured key in the `Authorization` header.
/// The `fetch_*`/`search_*`/`resolve_*` methods report failures; the
/// `list_*` and `subtitle_for_episode` methods log them and return an empty
/// value, which callers read as "no subtitles available".
#[derive(Debug, Clone)]
pub struct SubtitleIndexClient {
    /// Transport
    fetcher: Arc<dyn PageFetcher>,
    /// API base URL, e.g. `https://jimaku.app/api`
    endpoint: String,
    /// Static credential sent with every request
    api_key: String,
}

impl SubtitleIndexClient {
    /// Create a new client
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    /// Create a client from the `subtitle_index` configuration section
    pub fn from_config(fetcher: Arc<dyn PageFetcher>, config: &SubtitleIndexConfig) -> Self {
        Self::new(fetcher, config.endpoint.clone(), config.api_key.clone())
    }

    fn endpoint_url(&self, segments: &[&str]) -> Result<Url, IndexError> {
        let mut url = Url::parse(&self.endpoint)
            .map_err(|e| IndexError::InvalidEndpoint(format!("{}: {}", self.endpoint, e)))?;
        url.path_segments_mut()
            .map_err(|_| IndexError::InvalidEndpoint(self.endpoint.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// URL of the entry search, optionally narrowed by a lookup
    pub fn search_url(&self, lookup: Option<&EntryLookup>) -> Result<String, IndexError> {
        let mut url = self.endpoint_url(&["entries", "search"])?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("anime", "true");
            match lookup {
                Some(EntryLookup::ExternalId(id)) => {
                    query.append_pair("anilist_id", &id.to_string());
                }
                Some(EntryLookup::Title(title)) => {
                    query.append_pair("query", title);
                }
                None => {}
            }
        }
        Ok(url.into())
    }

    /// URL of the file listing of an entry
    pub fn files_url(&self, entry_id: &str) -> Result<String, IndexError> {
        Ok(self.endpoint_url(&["entries", entry_id, "files"])?.into())
    }

    async fn get_array(&self, url: String) -> Result<Vec<Value>, IndexError> {
        let request = FetchRequest::get(url).header("Authorization", self.api_key.as_str());
        let response = self.fetcher.fetch(request).await?.error_for_status()?;

        match response.json::<Value>()? {
            Value::Array(items) => Ok(items),
            other => Err(IndexError::MalformedResponse(format!(
                "expected an array from {}, got {}",
                response.url,
                json_kind(&other)
            ))),
        }
    }

    async fn get_entries(&self, lookup: Option<&EntryLookup>) -> Result<Vec<SubtitleIndexEntry>, IndexError> {
        let items = self.get_array(self.search_url(lookup)?).await?;
        Ok(items
            .into_iter()
            .filter_map(|item| serde_json::from_value::<RawEntry>(item).ok())
            .map(SubtitleIndexEntry::from)
            .collect())
    }

    /// All anime entries of the index
    pub async fn fetch_entries(&self) -> Result<Vec<SubtitleIndexEntry>, IndexError> {
        let entries = self.get_entries(None).await?;
        debug!("Subtitle index lists {} anime entries", entries.len());
        Ok(entries)
    }

    /// Entries matching a lookup, in the index's response order
    pub async fn search_entries(&self, lookup: &EntryLookup) -> Result<Vec<SubtitleIndexEntry>, IndexError> {
        if let EntryLookup::Title(title) = lookup {
            if title.trim().is_empty() {
                return Err(IndexError::InvalidIdentifier("empty title query".to_string()));
            }
        }
        self.get_entries(Some(lookup)).await
    }

    /// First entry matching a lookup
    pub async fn find_entry(&self, lookup: &EntryLookup) -> Result<Option<SubtitleIndexEntry>, IndexError> {
        let Some(entry) = self.search_entries(lookup).await?.into_iter().next() else {
            debug!("No subtitle index entry for {}", lookup);
            return Ok(None);
        };

        if entry.entry_id.is_empty() {
            return Err(IndexError::MalformedResponse(format!(
                "entry for {} has no id",
                lookup
            )));
        }
        Ok(Some(entry))
    }

    /// Subtitle files uploaded under an entry
    pub async fn fetch_files(&self, entry_id: &str) -> Result<Vec<SubtitleFile>, IndexError> {
        if entry_id.is_empty() {
            return Err(IndexError::InvalidIdentifier("empty entry id".to_string()));
        }

        let items = self.get_array(self.files_url(entry_id)?).await?;
        let total = items.len();
        let files: Vec<SubtitleFile> = items
            .into_iter()
            .filter_map(|item| serde_json::from_value::<RawFile>(item).ok())
            .filter_map(RawFile::into_file)
            .collect();

        if files.len() < total {
            debug!("Skipped {} incomplete file records for entry {}", total - files.len(), entry_id);
        }
        Ok(files)
    }

    /// Episodes with subtitles for an already matched entry
    pub async fn resolve_entry_episodes(&self, entry: &SubtitleIndexEntry) -> Result<Vec<ResolvedEpisode>, IndexError> {
        let files = self.fetch_files(&entry.entry_id).await?;
        let episodes = resolve_files(files);
        info!(
            "Entry {} ('{}') has subtitles for {} episodes",
            entry.entry_id,
            entry.name,
            episodes.len()
        );
        Ok(episodes)
    }

    /// Episodes with subtitles for a lookup; no matching entry is an empty list
    pub async fn resolve_episodes(&self, lookup: &EntryLookup) -> Result<Vec<ResolvedEpisode>, IndexError> {
        match self.find_entry(lookup).await? {
            Some(entry) => self.resolve_entry_episodes(&entry).await,
            None => Ok(Vec::new()),
        }
    }

    /// Identifiers of every title that has subtitles
    ///
    /// Failures are logged and yield an empty set.
    pub async fn list_titles_with_subtitles(&self) -> HashSet<ExternalId> {
        match self.fetch_entries().await {
            Ok(entries) => titles_with_subtitles(&entries),
            Err(e) => {
                warn!("Could not list titles with subtitles: {}", e);
                HashSet::new()
            }
        }
    }

    /// Episodes with subtitles for a lookup
    ///
    /// Failures are logged and yield an empty list.
    pub async fn list_episodes(&self, lookup: &EntryLookup) -> Vec<ResolvedEpisode> {
        self.resolve_episodes(lookup).await.unwrap_or_else(|e| {
            warn!("Could not list subtitle episodes for {}: {}", lookup, e);
            Vec::new()
        })
    }

    /// Subtitle URL for one episode of a title
    pub async fn subtitle_for_episode(&self, lookup: &EntryLookup, episode: u32) -> Option<String> {
        let url = self
            .list_episodes(lookup)
            .await
            .into_iter()
            .find(|resolved| resolved.episode_number == episode)
            .map(|resolved| resolved.subtitle_url);

        if url.is_none() {
            debug!("No subtitle for episode {} of {}", episode, lookup);
        }
        url
    }
}

/// Deduplicated identifiers of entries that carry one
pub fn titles_with_subtitles(entries: &[SubtitleIndexEntry]) -> HashSet<ExternalId> {
    entries.iter().filter_map(|entry| entry.external_id).collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
