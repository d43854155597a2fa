use log::debug;
use serde::Serialize;
use serde_json::Value;

use crate::errors::PipelineError;
use crate::external_id::{parse_external_id, ExternalId};

const DATA_POINTER: &str = "/props/pageProps/data";
const EPISODE_POINTER: &str = "/props/pageProps/episode";
const ANIME_DATA_POINTER: &str = "/props/pageProps/animeData";

/// One title of the source catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceRecord {
    /// Display title
    pub title: String,
    /// Poster image URL
    pub poster_image: String,
    /// Catalog slug of the title page
    pub catalog_link: String,
    /// Shared numeric identifier, when the catalog maps one
    pub external_id: Option<ExternalId>,
}

impl SourceRecord {
    pub fn new(
        title: impl Into<String>,
        poster_image: impl Into<String>,
        catalog_link: impl Into<String>,
        external_id: Option<ExternalId>,
    ) -> Self {
        Self {
            title: title.into(),
            poster_image: poster_image.into(),
            catalog_link: catalog_link.into(),
            external_id,
        }
    }

    /// Build a record from one search result of the page state
    ///
    /// Entries missing a title, poster, or link are rejected.
    pub fn from_search_entry(entry: &Value) -> Option<Self> {
        let title = non_empty_str(entry.get("title"))?;
        let poster_image = poster_url(entry.get("posterImage")?)?;
        let catalog_link = non_empty_str(entry.get("link"))?;
        Some(Self::new(title, poster_image, catalog_link, mapped_external_id(entry)))
    }

    /// Identity-only record for pages that describe a single title
    pub fn from_title_data(data: &Value) -> Option<Self> {
        let title = non_empty_str(data.get("title")).unwrap_or_default();
        let external_id = mapped_external_id(data);
        if title.is_empty() && external_id.is_none() {
            return None;
        }
        let poster_image = data.get("posterImage").and_then(poster_url).unwrap_or_default();
        let catalog_link = non_empty_str(data.get("link")).unwrap_or_default();
        Some(Self::new(title, poster_image, catalog_link, external_id))
    }
}

/// Records of a search page, in page order
///
/// A single object where an array is expected is treated as a one-element list.
pub fn search_records(state: &Value) -> Result<Vec<SourceRecord>, PipelineError> {
    let data = state
        .pointer(DATA_POINTER)
        .filter(|data| !data.is_null())
        .ok_or(PipelineError::MissingField("props.pageProps.data"))?;

    let entries = match data {
        Value::Array(entries) => entries.iter().collect(),
        other => vec![other],
    };

    Ok(entries
        .into_iter()
        .filter_map(|entry| {
            let record = SourceRecord::from_search_entry(entry);
            if record.is_none() {
                debug!("Skipping search entry missing title, poster, or link");
            }
            record
        })
        .collect())
}

/// Data of a title page
#[derive(Debug, Clone, PartialEq)]
pub struct TitlePage {
    /// Catalog-internal id, appended to watch URLs
    pub origin: Option<String>,
    /// The title this page describes
    pub record: Option<SourceRecord>,
    /// Episode slugs by position; `None` where the slot is unusable
    pub episode_slugs: Option<Vec<Option<String>>>,
    /// Synopsis text
    pub synopsis: Option<String>,
    /// Alternative titles
    pub synonyms: Vec<String>,
    /// Airing season name
    pub season: Option<String>,
    /// Airing year
    pub year: Option<String>,
}

impl TitlePage {
    /// Read a title page out of its embedded state
    pub fn from_state(state: &Value) -> Result<Self, PipelineError> {
        let data = state
            .pointer(DATA_POINTER)
            .filter(|data| data.is_object())
            .ok_or(PipelineError::MissingField("props.pageProps.data"))?;

        let episode_slugs = data.get("ep").and_then(Value::as_array).map(|slots| {
            slots.iter().map(slug).collect()
        });

        let synonyms = data
            .get("synonyms")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(|s| non_empty_str(Some(s))).collect())
            .unwrap_or_default();

        Ok(Self {
            origin: data.get("_id").and_then(slug),
            record: SourceRecord::from_title_data(data),
            episode_slugs,
            synopsis: non_empty_str(data.get("synopsys")),
            synonyms,
            season: non_empty_str(data.pointer("/animeSeason/season")),
            year: data.pointer("/animeSeason/year").and_then(scalar_text),
        })
    }
}

/// Data of an episode (watch) page
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodePage {
    /// Direct stream URL
    pub stream_link: Option<String>,
    /// 1-based episode number
    pub episode_number: Option<u32>,
    /// The title the episode belongs to
    pub anime: Option<SourceRecord>,
}

impl EpisodePage {
    /// Read an episode page out of its embedded state
    pub fn from_state(state: &Value) -> Self {
        let episode = state.pointer(EPISODE_POINTER);
        Self {
            stream_link: non_empty_str(episode.and_then(|e| e.get("streamLink"))),
            episode_number: episode
                .and_then(|e| e.get("number"))
                .and_then(parse_external_id)
                .filter(|number| *number > 0),
            anime: state
                .pointer(ANIME_DATA_POINTER)
                .and_then(SourceRecord::from_title_data),
        }
    }
}

fn mapped_external_id(data: &Value) -> Option<ExternalId> {
    data.pointer("/mappings/anilist").and_then(parse_external_id)
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn poster_url(value: &Value) -> Option<String> {
    match value {
        Value::Object(_) => non_empty_str(value.get("original")),
        other => non_empty_str(Some(other)),
    }
}

fn slug(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
