use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::{SearchHit, Show, TvMazeApi};
use crate::error::ProviderError;

const TVMAZE_BASE: &str = "https://api.tvmaze.com";

/// Keyless client for the show directory.
#[derive(Debug, Clone)]
pub struct TvMazeClient {
    client: Client,
}

impl TvMazeClient {
    pub fn new() -> Result<Self> {
        let user_agent = format!("cinescout/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .build()
            .context("Failed to build TVMaze HTTP client")?;
        Ok(Self { client })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ProviderError> {
        let res = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ProviderError::Transport {
                url: url.to_string(),
                source,
            })?;
        let status = res.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound);
        }
        let text = res
            .text()
            .await
            .map_err(|source| ProviderError::Transport {
                url: url.to_string(),
                source,
            })?;
        if !status.is_success() {
            return Err(ProviderError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        serde_json::from_str(&text).map_err(|source| ProviderError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl TvMazeApi for TvMazeClient {
    async fn fetch_shows(&self) -> Result<Vec<Show>, ProviderError> {
        let url = format!("{TVMAZE_BASE}/shows");
        self.get_json(&url).await
    }

    async fn fetch_show(&self, id: i64) -> Result<Show, ProviderError> {
        let url = format!("{TVMAZE_BASE}/shows/{id}");
        self.get_json(&url).await
    }

    async fn search_shows(&self, query: &str) -> Result<Vec<SearchHit>, ProviderError> {
        let url = format!(
            "{TVMAZE_BASE}/search/shows?q={}",
            urlencoding::encode(query)
        );
        self.get_json(&url).await
    }
}
