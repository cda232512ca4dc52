use crate::config::AppConfig;
use crate::error::ItineraryError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const MAX_RESULTS: u32 = 5;
const SEARCH_DEPTH: &str = "basic";

#[derive(Debug, Serialize)]
pub struct TavilySearchRequest {
    pub api_key: String,
    pub query: String,
    pub max_results: u32,
    pub search_depth: String,
}

#[derive(Debug, Deserialize)]
pub struct TavilySearchResponse {
    #[serde(default)]
    pub results: Vec<SearchHit>,
}

/// One web search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub content: String,
}

impl SearchHit {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            content: String::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Response error: {0}")]
    Response(String),
}

#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Ordered hits for a free-text query.
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError>;
}

#[derive(Clone)]
pub struct TavilyClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl TavilyClient {
    pub fn new(config: &AppConfig) -> Result<Self, ItineraryError> {
        let api_key = config
            .tavily_api_key
            .clone()
            .ok_or_else(|| ItineraryError::config("Tavily API key not configured"))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.search_timeout_secs))
            .build()
            .map_err(|e| ItineraryError::config(format!("Failed to build search HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.tavily_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn build_request(&self, query: &str) -> TavilySearchRequest {
        TavilySearchRequest {
            api_key: self.api_key.clone(),
            query: query.to_string(),
            max_results: MAX_RESULTS,
            search_depth: SEARCH_DEPTH.to_string(),
        }
    }
}

#[async_trait]
impl SearchClient for TavilyClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        log::debug!("Tavily search query: '{}'", query);
        let url = format!("{}/search", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&self.build_request(query))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SearchError::Response(format!(
                "Search request failed with status {}: {}",
                status, error_text
            )));
        }

        let search_response: TavilySearchResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Response(format!("Failed to parse response: {}", e)))?;

        Ok(search_response.results)
    }
}
