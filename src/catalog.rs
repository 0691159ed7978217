use chrono::NaiveDate;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::warn;

use crate::error::ProviderError;
use crate::genres;
use crate::models::{Movie, MovieDetails, MoviePage};
use crate::omdb::{self, OmdbApi};
use crate::tvmaze::{self, Show, TvMazeApi};

pub const PAGE_SIZE: usize = 20;
// Below this many primary results, search also consults the fallback lookup.
const SEARCH_FALLBACK_THRESHOLD: usize = 10;

pub const PLACEHOLDER_IMAGE: &str =
    "https://via.placeholder.com/500x750/1f2937/9ca3af?text=No+Image";

/// One read interface over both providers. Holds trait objects so every
/// operation is testable against fakes.
#[derive(Clone)]
pub struct Catalog {
    tvmaze: Arc<dyn TvMazeApi>,
    omdb: Arc<dyn OmdbApi>,
}

impl Catalog {
    pub fn new(tvmaze: Arc<dyn TvMazeApi>, omdb: Arc<dyn OmdbApi>) -> Self {
        Self { tvmaze, omdb }
    }

    /// Catalog order, windowed into 20-item pages.
    pub async fn popular(&self, page: u32) -> Result<MoviePage, ProviderError> {
        let shows = self.tvmaze.fetch_shows().await?;
        Ok(paged(&shows, page))
    }

    /// Unrated entries excluded, then a stable sort descending by rating so
    /// ties keep the provider's order.
    pub async fn top_rated(&self, page: u32) -> Result<MoviePage, ProviderError> {
        let mut shows = self.tvmaze.fetch_shows().await?;
        shows.retain(|s| s.rating.as_ref().and_then(|r| r.average).is_some());
        shows.sort_by(|a, b| {
            let ra = a.rating.as_ref().and_then(|r| r.average).unwrap_or(0.0);
            let rb = b.rating.as_ref().and_then(|r| r.average).unwrap_or(0.0);
            rb.partial_cmp(&ra).unwrap_or(Ordering::Equal)
        });
        Ok(paged(&shows, page))
    }

    /// Entries without a parseable premiere date excluded, newest first.
    pub async fn now_playing(&self, page: u32) -> Result<MoviePage, ProviderError> {
        let shows = self.tvmaze.fetch_shows().await?;
        let mut dated: Vec<(NaiveDate, Show)> = shows
            .into_iter()
            .filter_map(|s| {
                let date = s
                    .premiered
                    .as_deref()
                    .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())?;
                Some((date, s))
            })
            .collect();
        dated.sort_by(|a, b| b.0.cmp(&a.0));
        let shows: Vec<Show> = dated.into_iter().map(|(_, s)| s).collect();
        Ok(paged(&shows, page))
    }

    /// Primary search first; below the threshold the fallback provider's
    /// results are appended. Fallback failures never break primary results,
    /// and individual fallback records that fail validation are skipped.
    /// Totals are derived from the concatenated, non-deduplicated list.
    pub async fn search(&self, query: &str, page: u32) -> Result<MoviePage, ProviderError> {
        let hits = self.tvmaze.search_shows(query).await?;
        let mut movies: Vec<Movie> = hits
            .iter()
            .map(|h| tvmaze::movie_from_show(&h.show))
            .collect();

        if movies.len() < SEARCH_FALLBACK_THRESHOLD {
            match self.omdb.search(query, page).await {
                Ok(items) => {
                    for item in &items {
                        match omdb::movie_from_search_item(item) {
                            Ok(movie) => movies.push(movie),
                            Err(e) => warn!("Skipping OMDb record for '{}': {}", item.title, e),
                        }
                    }
                }
                Err(e) => warn!("OMDb search failed for '{}': {}", query, e),
            }
        }

        let total = movies.len();
        movies.truncate(PAGE_SIZE);
        Ok(MoviePage {
            page,
            results: movies,
            total_pages: total_pages_for(total),
            total_results: total as u64,
        })
    }

    /// Single-item lookup on the primary provider; not-found propagates so
    /// the caller can render a distinct state.
    pub async fn details(&self, id: i64) -> Result<MovieDetails, ProviderError> {
        let show = self.tvmaze.fetch_show(id).await?;
        Ok(tvmaze::details_from_show(&show))
    }

    /// Requested ids map through the genre table to names; shows whose
    /// free-text tags case-insensitively contain any target name as a
    /// substring are retained. A heuristic, and documented as such.
    pub async fn by_genres(&self, genre_ids: &[i64], page: u32) -> Result<MoviePage, ProviderError> {
        let targets: Vec<String> = genre_ids
            .iter()
            .filter_map(|id| genres::name_of(*id))
            .map(str::to_ascii_lowercase)
            .collect();

        let mut shows = self.tvmaze.fetch_shows().await?;
        shows.retain(|show| {
            show.genres.iter().any(|tag| {
                let tag = tag.to_ascii_lowercase();
                targets.iter().any(|target| tag.contains(target.as_str()))
            })
        });
        Ok(paged(&shows, page))
    }
}

/// Window `[(page-1)*20, page*20)` over the full batch, with derived totals.
fn paged(shows: &[Show], page: u32) -> MoviePage {
    let start = (page.max(1) as usize - 1).saturating_mul(PAGE_SIZE);
    let results: Vec<Movie> = shows
        .iter()
        .skip(start)
        .take(PAGE_SIZE)
        .map(tvmaze::movie_from_show)
        .collect();
    MoviePage {
        page,
        results,
        total_pages: total_pages_for(shows.len()),
        total_results: shows.len() as u64,
    }
}

fn total_pages_for(total: usize) -> u32 {
    total.div_ceil(PAGE_SIZE) as u32
}

/// Absolute URLs pass through; anything else resolves to the placeholder.
/// The size parameter is accepted for interface compatibility but has no
/// effect, since neither provider serves size-variant URLs.
pub fn image_url(path: &str, _size: &str) -> String {
    if path.starts_with("http") {
        path.to_string()
    } else {
        PLACEHOLDER_IMAGE.to_string()
    }
}
