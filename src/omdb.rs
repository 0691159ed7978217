use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::env;
use std::time::Duration;
use tracing::debug;

use crate::error::ProviderError;
use crate::genres;
use crate::models::{Movie, NO_OVERVIEW};

const OMDB_BASE: &str = "https://www.omdbapi.com";
// Public free-tier key (1000 requests/day); OMDB_API_KEY overrides it.
const DEFAULT_API_KEY: &str = "b9a5c5a4";

/// Search-only client for the movie lookup service, used as a fallback when
/// the primary directory returns too few results.
#[derive(Debug, Clone)]
pub struct OmdbClient {
    client: Client,
    api_key: String,
}

#[async_trait]
pub trait OmdbApi: Send + Sync {
    async fn search(&self, query: &str, page: u32) -> Result<Vec<OmdbSearchItem>, ProviderError>;
}

/// One entry of the search response. `Plot`, `imdbRating` and `Genre` only
/// appear on by-title lookups; the search endpoint omits them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OmdbSearchItem {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Poster")]
    pub poster: Option<String>,
    #[serde(rename = "Plot")]
    pub plot: Option<String>,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<String>,
    #[serde(rename = "Genre")]
    pub genre: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Search", default)]
    search: Vec<OmdbSearchItem>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

impl OmdbClient {
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("OMDB_API_KEY").unwrap_or_else(|_| DEFAULT_API_KEY.to_string());
        let user_agent = format!("cinescout/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .build()
            .context("Failed to build OMDb HTTP client")?;
        Ok(Self { client, api_key })
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
impl OmdbApi for OmdbClient {
    async fn search(&self, query: &str, page: u32) -> Result<Vec<OmdbSearchItem>, ProviderError> {
        let url = format!(
            "{OMDB_BASE}/?apikey={}&s={}&page={}&type=movie",
            self.api_key,
            urlencoding::encode(query),
            page
        );
        let envelope: SearchEnvelope = self.get_json(&url).await?;
        // A "False" envelope ("Movie not found!") is an empty result, not an
        // error.
        if envelope.response != "True" {
            debug!(
                "OMDb returned no results for '{}': {}",
                query,
                envelope.error.as_deref().unwrap_or("no reason given")
            );
            return Ok(Vec::new());
        }
        Ok(envelope.search)
    }
}

/// Strip the 2-character alphabetic prefix off an external id ("tt0083658")
/// and parse the remainder as a number.
pub(crate) fn parse_external_numeric(id: &str) -> Option<i64> {
    let id = id.trim();
    let prefix = id.get(..2)?;
    if !prefix.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    id[2..].parse().ok()
}

/// Normalize one search item into the canonical shape, or fail with a
/// structured record error; a partially-filled Movie is never produced.
pub(crate) fn movie_from_search_item(item: &OmdbSearchItem) -> Result<Movie, ProviderError> {
    let id = parse_external_numeric(&item.imdb_id).ok_or_else(|| {
        ProviderError::Record(format!("unparseable external id '{}'", item.imdb_id))
    })?;

    let poster = non_sentinel(item.poster.as_deref()).unwrap_or_default();
    let overview = non_sentinel(item.plot.as_deref())
        .unwrap_or_else(|| NO_OVERVIEW.to_string());
    let vote_average = non_sentinel(item.imdb_rating.as_deref())
        .and_then(|r| r.parse::<f64>().ok())
        .unwrap_or(0.0);
    let genre_ids = non_sentinel(item.genre.as_deref())
        .map(|g| {
            let tags: Vec<&str> = g.split(", ").collect();
            genres::ids_for_tags(&tags)
        })
        .unwrap_or_default();

    Ok(Movie {
        id,
        title: item.title.clone(),
        original_title: item.title.clone(),
        overview,
        poster_path: poster.clone(),
        backdrop_path: poster,
        release_date: item.year.clone(),
        vote_average,
        vote_count: 0,
        genre_ids,
        original_language: "en".to_string(),
        popularity: 0.0,
        adult: false,
        video: false,
    })
}

// OMDb encodes absent fields as the literal string "N/A".
fn non_sentinel(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.is_empty() && *v != "N/A")
        .map(str::to_string)
}
