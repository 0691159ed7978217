use serde::{Deserialize, Serialize};

/// Placeholder overview used when a provider has no usable summary text.
pub const NO_OVERVIEW: &str = "No overview available.";

/// Canonical summary record both providers normalize into.
///
/// `vote_average` stays on the provider-native 0-10 scale; display scaling is
/// a presentation concern. `adult` and `video` are carried for shape
/// compatibility and never populated by either provider.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub original_title: String,
    pub overview: String,
    pub poster_path: String,
    pub backdrop_path: String,
    pub release_date: String,
    pub vote_average: f64,
    pub vote_count: i64,
    pub genre_ids: Vec<i64>,
    pub original_language: String,
    pub popularity: f64,
    pub adult: bool,
    pub video: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProductionCompany {
    pub id: i64,
    pub name: String,
    pub logo_path: Option<String>,
    pub origin_country: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProductionCountry {
    pub iso_3166_1: String,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SpokenLanguage {
    pub iso_639_1: String,
    pub name: String,
}

/// Full record for the detail view. Budget and revenue are always zero;
/// neither provider supplies financial data.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MovieDetails {
    #[serde(flatten)]
    pub movie: Movie,
    pub genres: Vec<Genre>,
    pub runtime: i64,
    pub budget: i64,
    pub revenue: i64,
    pub production_companies: Vec<ProductionCompany>,
    pub production_countries: Vec<ProductionCountry>,
    pub spoken_languages: Vec<SpokenLanguage>,
    pub status: String,
    pub tagline: String,
    pub homepage: String,
    pub imdb_id: String,
}

/// A 20-item window over whatever single unpaged batch the provider returned.
/// Totals are derived client-side, not authoritative server counts.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MoviePage {
    pub page: u32,
    pub results: Vec<Movie>,
    pub total_pages: u32,
    pub total_results: u64,
}
