use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;

use crate::app_config::HttpConfig;
use crate::errors::FetchError;
use crate::fetch::{FetchRequest, FetchResponse, PageFetcher};

/// reqwest-backed fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    /// HTTP client for all requests
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher with the given timeout and user agent
    pub fn new(timeout_secs: u64, user_agent: &str) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .user_agent(user_agent)
                .pool_idle_timeout(Duration::from_secs(90))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Create a fetcher from the `http` section of the configuration
    pub fn from_config(config: &HttpConfig) -> Self {
        Self::new(config.timeout_secs, &config.user_agent)
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, FetchError> {
        debug!("GET {}", request.url);

        let mut builder = self.client.get(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(request.url.clone())
            } else {
                FetchError::RequestFailed(format!("{}: {}", request.url, e))
            }
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read response body from {}: {}", request.url, e);
            FetchError::RequestFailed(format!("{}: {}", request.url, e))
        })?;

        debug!("GET {} -> {} ({} bytes)", request.url, status, body.len());
        Ok(FetchResponse::new(request.url, status, body))
    }
}
