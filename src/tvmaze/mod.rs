use async_trait::async_trait;
use serde::Deserialize;

use crate::error::ProviderError;

mod client;
mod map;
mod text;

pub use client::TvMazeClient;
pub(crate) use map::{details_from_show, movie_from_show};

/// Read seam over the primary show directory. The catalog and the HTTP layer
/// only ever see this trait, so tests run against fakes.
#[async_trait]
pub trait TvMazeApi: Send + Sync {
    /// The provider's full catalog in a single call; paging is synthesized on
    /// our side.
    async fn fetch_shows(&self) -> Result<Vec<Show>, ProviderError>;
    async fn fetch_show(&self, id: i64) -> Result<Show, ProviderError>;
    async fn search_shows(&self, query: &str) -> Result<Vec<SearchHit>, ProviderError>;
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Show {
    pub id: i64,
    pub name: String,
    pub summary: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub premiered: Option<String>,
    pub status: Option<String>,
    pub runtime: Option<i64>,
    #[serde(rename = "officialSite")]
    pub official_site: Option<String>,
    pub weight: Option<f64>,
    pub rating: Option<ShowRating>,
    pub image: Option<ShowImage>,
    pub network: Option<Network>,
    pub externals: Option<Externals>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShowRating {
    pub average: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShowImage {
    pub medium: Option<String>,
    pub original: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Network {
    pub name: String,
    pub country: Option<CountryRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CountryRef {
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Externals {
    pub imdb: Option<String>,
}

/// One entry of the `/search/shows` response.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    pub score: Option<f64>,
    pub show: Show,
}
