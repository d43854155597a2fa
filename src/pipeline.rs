/*!
 * Reconciliation pipeline.
 *
 * Joins the source catalog with the subtitle index. Each public operation
 * is a short linear pipeline (fetch, extract, reconcile, project) and is
 * isolated from the others: the `try_*` forms report the first failure,
 * the plain forms log it and return an empty or placeholder value.
 */

use std::sync::Arc;

use log::{debug, info, warn};
use serde::Serialize;
use serde_json::Value;

use crate::app_config::Config;
use crate::catalog::{search_records, CatalogUrls, EpisodePage, TitlePage};
use crate::errors::PipelineError;
use crate::fetch::{FetchRequest, PageFetcher};
use crate::page_state::{extract_embedded_state, StateMarkers};
use crate::reconcile::Reconciler;
use crate::subtitles::SubtitleIndexClient;

const MAX_ALIASES: usize = 5;

/// A catalog title that has subtitles
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub title: String,
    pub image: String,
    /// Title page URL
    pub href: String,
}

/// An episode that exists in the catalog and has subtitles
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciledEpisode {
    /// Watch page URL
    pub href: String,
    pub number: u32,
}

/// Stream and subtitle URL for one episode
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StreamResolution {
    pub stream: Option<String>,
    pub subtitles: Option<String>,
}

/// Descriptive text of a title
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleDetails {
    pub description: String,
    pub aliases: String,
    pub airdate: String,
}

impl TitleDetails {
    /// Placeholder returned when the title page cannot be read
    pub fn unavailable() -> Self {
        Self {
            description: "Error loading description".to_string(),
            aliases: "Duration: Unknown".to_string(),
            airdate: "Aired: Unknown".to_string(),
        }
    }

    fn from_page(page: &TitlePage) -> Self {
        let description = page
            .synopsis
            .clone()
            .unwrap_or_else(|| "No description available".to_string());

        let aliases = if page.synonyms.is_empty() {
            "No aliases available".to_string()
        } else {
            page.synonyms
                .iter()
                .take(MAX_ALIASES)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        };

        let season = page.season.as_deref().unwrap_or("Unknown");
        let airdate = format!("{} {}", season, page.year.as_deref().unwrap_or_default())
            .trim_end()
            .to_string();

        Self {
            description,
            aliases,
            airdate,
        }
    }
}

/// Catalog/subtitle index join
#[derive(Debug)]
pub struct ReconciliationPipeline {
    /// Transport for catalog pages
    fetcher: Arc<dyn PageFetcher>,
    /// Subtitle index client
    index: SubtitleIndexClient,
    /// Record/entry pairing rules
    reconciler: Reconciler,
    /// Catalog URL layout
    urls: CatalogUrls,
    /// Where catalog pages keep their state
    markers: StateMarkers,
}

impl ReconciliationPipeline {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        index: SubtitleIndexClient,
        reconciler: Reconciler,
        urls: CatalogUrls,
    ) -> Self {
        Self {
            fetcher,
            index,
            reconciler,
            urls,
            markers: StateMarkers::next_data(),
        }
    }

    /// Build the whole pipeline from configuration over one shared fetcher
    pub fn from_config(fetcher: Arc<dyn PageFetcher>, config: &Config) -> Self {
        let index = SubtitleIndexClient::from_config(fetcher.clone(), &config.subtitle_index);
        Self::new(
            fetcher,
            index,
            Reconciler::from_config(&config.matching),
            CatalogUrls::new(config.catalog.base_url.clone()),
        )
    }

    /// Read page state between other markers
    pub fn with_markers(mut self, markers: StateMarkers) -> Self {
        self.markers = markers;
        self
    }

    pub fn urls(&self) -> &CatalogUrls {
        &self.urls
    }

    async fn fetch_state(&self, url: &str) -> Result<Value, PipelineError> {
        let response = self
            .fetcher
            .fetch(FetchRequest::get(url))
            .await?
            .error_for_status()?;

        extract_embedded_state(response.text(), &self.markers).ok_or_else(|| {
            PipelineError::MissingState {
                url: url.to_string(),
            }
        })
    }

    /// Catalog titles matching a keyword that have subtitles
    ///
    /// The catalog page and the index entry list are fetched concurrently.
    pub async fn try_search(&self, keyword: &str) -> Result<Vec<SearchResult>, PipelineError> {
        let search_url = self.urls.search_url(keyword)?;
        let (state, entries) = futures::join!(self.fetch_state(&search_url), self.index.fetch_entries());
        let state = state?;
        let entries = entries?;

        let records = search_records(&state)?;
        let found = records.len();
        let results: Vec<SearchResult> = self
            .reconciler
            .retain_subtitled(records, &entries)
            .into_iter()
            .map(|record| SearchResult {
                href: self.urls.anime_url(&record.catalog_link),
                title: record.title,
                image: record.poster_image,
            })
            .collect();

        info!(
            "Search '{}': {} catalog results, {} with subtitles",
            keyword,
            found,
            results.len()
        );
        Ok(results)
    }

    /// Episodes of a title that exist in the catalog and have subtitles
    ///
    /// Episode `n` maps to the `n`-th slot of the title's episode list.
    /// Output is in ascending episode order.
    pub async fn try_list_episodes(&self, title_url: &str) -> Result<Vec<ReconciledEpisode>, PipelineError> {
        let state = self.fetch_state(title_url).await?;
        let page = TitlePage::from_state(&state)?;

        let origin = page
            .origin
            .ok_or(PipelineError::MissingField("props.pageProps.data._id"))?;
        let slugs = page
            .episode_slugs
            .ok_or(PipelineError::MissingField("props.pageProps.data.ep"))?;
        let record = page
            .record
            .ok_or(PipelineError::MissingField("props.pageProps.data.title"))?;

        let mut resolved = self.reconciler.resolve_episodes(&record, &self.index).await?;
        resolved.sort_by_key(|episode| episode.episode_number);

        let episodes: Vec<ReconciledEpisode> = resolved
            .into_iter()
            .filter_map(|episode| {
                let slot = usize::try_from(episode.episode_number).ok()?.checked_sub(1)?;
                let slug = slugs.get(slot)?.as_deref()?;
                Some(ReconciledEpisode {
                    href: self.urls.watch_url(slug, &origin),
                    number: episode.episode_number,
                })
            })
            .collect();

        info!(
            "'{}': {} catalog episodes, {} with subtitles",
            record.title,
            slugs.len(),
            episodes.len()
        );
        Ok(episodes)
    }

    /// Stream URL of an episode page plus its subtitle URL
    ///
    /// A failed or empty subtitle lookup keeps the stream and leaves
    /// `subtitles` empty.
    pub async fn try_resolve_stream(&self, episode_url: &str) -> Result<StreamResolution, PipelineError> {
        let state = self.fetch_state(episode_url).await?;
        let page = EpisodePage::from_state(&state);

        let stream = page
            .stream_link
            .ok_or(PipelineError::MissingField("props.pageProps.episode.streamLink"))?;
        let number = page
            .episode_number
            .ok_or(PipelineError::MissingField("props.pageProps.episode.number"))?;
        let anime = page
            .anime
            .ok_or(PipelineError::MissingField("props.pageProps.animeData"))?;

        let subtitles = match self.reconciler.resolve_episodes(&anime, &self.index).await {
            Ok(episodes) => episodes
                .into_iter()
                .find(|episode| episode.episode_number == number)
                .map(|episode| episode.subtitle_url),
            Err(e) => {
                warn!("Subtitle lookup for episode {} of '{}' failed: {}", number, anime.title, e);
                None
            }
        };

        if subtitles.is_none() {
            debug!("No subtitle for episode {} of '{}'", number, anime.title);
        }

        Ok(StreamResolution {
            stream: Some(stream),
            subtitles,
        })
    }

    /// Description, aliases, and airing season of a title
    pub async fn try_details(&self, title_url: &str) -> Result<TitleDetails, PipelineError> {
        let state = self.fetch_state(title_url).await?;
        let page = TitlePage::from_state(&state)?;
        Ok(TitleDetails::from_page(&page))
    }

    /// Same as `try_search`; failures yield an empty list
    pub async fn search(&self, keyword: &str) -> Vec<SearchResult> {
        self.try_search(keyword).await.unwrap_or_else(|e| {
            warn!("Search for '{}' failed: {}", keyword, e);
            Vec::new()
        })
    }

    /// Same as `try_list_episodes`; failures yield an empty list
    pub async fn list_episodes(&self, title_url: &str) -> Vec<ReconciledEpisode> {
        self.try_list_episodes(title_url).await.unwrap_or_else(|e| {
            warn!("Listing episodes of {} failed: {}", title_url, e);
            Vec::new()
        })
    }

    /// Same as `try_resolve_stream`; failures yield an empty resolution
    pub async fn resolve_stream(&self, episode_url: &str) -> StreamResolution {
        self.try_resolve_stream(episode_url).await.unwrap_or_else(|e| {
            warn!("Resolving stream of {} failed: {}", episode_url, e);
            StreamResolution::default()
        })
    }

    /// Same as `try_details`; failures yield placeholder text
    pub async fn details(&self, title_url: &str) -> TitleDetails {
        self.try_details(title_url).await.unwrap_or_else(|e| {
            warn!("Loading details of {} failed: {}", title_url, e);
            TitleDetails::unavailable()
        })
    }
}
