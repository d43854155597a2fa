use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::external_id::{deserialize_lenient, ExternalId};

/// One title in the subtitle index
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubtitleIndexEntry {
    /// Index-local identifier used to list files (may be empty if the index omitted it)
    pub entry_id: String,
    /// Native (usually romaji) name
    pub name: String,
    /// English name, when the index has one
    pub english_name: Option<String>,
    /// Shared numeric identifier, when the index has one
    pub external_id: Option<ExternalId>,
}

impl SubtitleIndexEntry {
    pub fn new(
        entry_id: impl Into<String>,
        name: impl Into<String>,
        english_name: Option<String>,
        external_id: Option<ExternalId>,
    ) -> Self {
        Self {
            entry_id: entry_id.into(),
            name: name.into(),
            english_name,
            external_id,
        }
    }

    /// All non-empty names of the entry, English first
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.english_name
            .as_deref()
            .into_iter()
            .chain(std::iter::once(self.name.as_str()))
            .filter(|name| !name.trim().is_empty())
    }
}

/// One subtitle file listed under an index entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubtitleFile {
    /// File name as uploaded
    pub filename: String,
    /// Download URL
    pub url: String,
}

impl SubtitleFile {
    pub fn new(filename: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            url: url.into(),
        }
    }
}

/// A subtitle file that was assigned an episode number
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedEpisode {
    /// Episode number inferred from the filename
    pub episode_number: u32,
    /// Download URL of the subtitle
    pub subtitle_url: String,
    /// File name the number was inferred from
    pub source_filename: String,
}

/// Entry as returned by `/entries/search`
#[derive(Debug, Deserialize)]
pub(crate) struct RawEntry {
    #[serde(default)]
    id: Value,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    english_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    anilist_id: Option<ExternalId>,
}

/// Non-string names read as absent instead of rejecting the whole entry
fn deserialize_lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(text)) => Ok(Some(text)),
        _ => Ok(None),
    }
}

impl From<RawEntry> for SubtitleIndexEntry {
    fn from(raw: RawEntry) -> Self {
        let entry_id = match raw.id {
            Value::String(id) => id,
            Value::Number(id) => id.to_string(),
            _ => String::new(),
        };
        Self {
            entry_id,
            name: raw.name.unwrap_or_default(),
            english_name: raw.english_name.filter(|name| !name.is_empty()),
            external_id: raw.anilist_id,
        }
    }
}

/// File as returned by `/entries/{id}/files`
#[derive(Debug, Deserialize)]
pub(crate) struct RawFile {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

impl RawFile {
    /// Files missing a name or URL are unusable
    pub(crate) fn into_file(self) -> Option<SubtitleFile> {
        match (self.name, self.url) {
            (Some(name), Some(url)) if !name.is_empty() && !url.is_empty() => {
                Some(SubtitleFile::new(name, url))
            }
            _ => None,
        }
    }
}
