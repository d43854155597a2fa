use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use url::Url;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    /// Source catalog settings
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Subtitle index settings
    #[serde(default)]
    pub subtitle_index: SubtitleIndexConfig,

    /// HTTP transport settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Record/entry matching settings
    #[serde(default)]
    pub matching: MatchingConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Source catalog configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CatalogConfig {
    // @field: Site root, without trailing slash
    #[serde(default = "default_catalog_base_url")]
    pub base_url: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_catalog_base_url(),
        }
    }
}

/// Subtitle index configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SubtitleIndexConfig {
    // @field: API base URL
    #[serde(default = "default_subtitle_index_endpoint")]
    pub endpoint: String,

    // @field: API key sent in the Authorization header
    #[serde(default = "String::new")]
    pub api_key: String,
}

impl Default for SubtitleIndexConfig {
    fn default() -> Self {
        Self {
            endpoint: default_subtitle_index_endpoint(),
            api_key: String::new(),
        }
    }
}

/// HTTP transport configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HttpConfig {
    // @field: Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: User-Agent header
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// Matching configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MatchingConfig {
    // @field: Match records without an identifier by title
    #[serde(default = "default_true")]
    pub title_fallback: bool,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            title_fallback: default_true(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_catalog_base_url() -> String {
    "https://www.animeparadise.moe".to_string()
}

fn default_subtitle_index_endpoint() -> String {
    "https://jimaku.app/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("subsieve/{}", env!("CARGO_PKG_VERSION"))
}

fn default_true() -> bool {
    true
}

fn require_http_url(name: &str, value: &str) -> Result<()> {
    let url = Url::parse(value).map_err(|e| anyhow!("Invalid {} '{}': {}", name, value, e))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(anyhow!("Invalid {} '{}': unsupported scheme {}", name, value, scheme)),
    }
}

impl Config {
    /// Load a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Failed to create config file: {}", path.display()))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        require_http_url("catalog base URL", &self.catalog.base_url)?;
        require_http_url("subtitle index endpoint", &self.subtitle_index.endpoint)?;

        if self.subtitle_index.api_key.trim().is_empty() {
            return Err(anyhow!(
                "Subtitle index API key is required (set subtitle_index.api_key or SUBSIEVE_API_KEY)"
            ));
        }

        if self.http.timeout_secs == 0 {
            return Err(anyhow!("HTTP timeout must be greater than zero"));
        }

        Ok(())
    }
}
