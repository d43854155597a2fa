use url::Url;

use crate::errors::PipelineError;

/// URL conventions of the source catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogUrls {
    /// Site root without trailing slash, e.g. `https://www.animeparadise.moe`
    base_url: String,
}

impl CatalogUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Search page for a keyword, keyword percent-encoded
    pub fn search_url(&self, keyword: &str) -> Result<String, PipelineError> {
        let mut url = Url::parse(&format!("{}/search", self.base_url))
            .map_err(|e| PipelineError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        url.query_pairs_mut().append_pair("q", keyword);
        Ok(url.into())
    }

    /// Title page for a catalog slug
    pub fn anime_url(&self, link: &str) -> String {
        format!("{}/anime/{}", self.base_url, link.trim_start_matches('/'))
    }

    /// Watch page for an episode slug of the title with the given origin id
    pub fn watch_url(&self, episode_slug: &str, origin: &str) -> String {
        format!(
            "{}/watch/{}?origin={}",
            self.base_url,
            episode_slug.trim_start_matches('/'),
            origin
        )
    }
}
