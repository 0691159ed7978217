use super::text::clean_summary;
use super::Show;
use crate::genres;
use crate::models::{
    Movie, MovieDetails, ProductionCompany, ProductionCountry, SpokenLanguage, NO_OVERVIEW,
};

const TAGLINE_MAX_CHARS: usize = 100;

pub(crate) fn movie_from_show(show: &Show) -> Movie {
    let overview = show
        .summary
        .as_deref()
        .map(clean_summary)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| NO_OVERVIEW.to_string());
    let language = show.language.clone().unwrap_or_else(|| "en".to_string());

    Movie {
        id: show.id,
        title: show.name.clone(),
        original_title: show.name.clone(),
        overview,
        poster_path: show
            .image
            .as_ref()
            .and_then(|i| i.medium.clone())
            .unwrap_or_default(),
        backdrop_path: show
            .image
            .as_ref()
            .and_then(|i| i.original.clone())
            .unwrap_or_default(),
        release_date: show.premiered.clone().unwrap_or_default(),
        vote_average: show.rating.as_ref().and_then(|r| r.average).unwrap_or(0.0),
        vote_count: 0,
        genre_ids: genres::ids_for_tags(&show.genres),
        original_language: language,
        popularity: show.weight.unwrap_or(0.0),
        adult: false,
        video: false,
    }
}

pub(crate) fn details_from_show(show: &Show) -> MovieDetails {
    let movie = movie_from_show(show);
    let resolved = genres::resolve(&movie.genre_ids);
    let language = movie.original_language.clone();

    let production_companies = show
        .network
        .as_ref()
        .map(|n| {
            vec![ProductionCompany {
                id: 1,
                name: n.name.clone(),
                logo_path: None,
                origin_country: n
                    .country
                    .as_ref()
                    .map(|c| c.code.clone())
                    .unwrap_or_else(|| "US".to_string()),
            }]
        })
        .unwrap_or_default();

    let production_countries = show
        .network
        .as_ref()
        .and_then(|n| n.country.as_ref())
        .map(|c| {
            vec![ProductionCountry {
                iso_3166_1: c.code.clone(),
                name: c.name.clone(),
            }]
        })
        .unwrap_or_default();

    let tagline = show
        .summary
        .as_deref()
        .map(clean_summary)
        .filter(|s| !s.is_empty())
        .map(|s| truncate_chars(&s, TAGLINE_MAX_CHARS))
        .unwrap_or_default();

    MovieDetails {
        genres: resolved,
        runtime: show.runtime.unwrap_or(0),
        budget: 0,
        revenue: 0,
        production_companies,
        production_countries,
        spoken_languages: vec![SpokenLanguage {
            iso_639_1: language.clone(),
            name: language,
        }],
        status: show.status.clone().unwrap_or_else(|| "Unknown".to_string()),
        tagline,
        homepage: show.official_site.clone().unwrap_or_default(),
        imdb_id: show
            .externals
            .as_ref()
            .and_then(|e| e.imdb.clone())
            .unwrap_or_default(),
        movie,
    }
}

fn truncate_chars(input: &str, max: usize) -> String {
    if input.chars().count() <= max {
        return input.to_string();
    }
    let mut out: String = input.chars().take(max).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tvmaze::{CountryRef, Externals, Network, Show, ShowImage, ShowRating};

    fn sample_show() -> Show {
        Show {
            id: 42,
            name: "Night Watch".to_string(),
            summary: Some("<p>A <b>cop</b> drama.</p>".to_string()),
            language: Some("English".to_string()),
            genres: vec!["Drama".to_string(), "Crime".to_string(), "Telenovela".to_string()],
            premiered: Some("2019-03-01".to_string()),
            status: Some("Running".to_string()),
            runtime: Some(55),
            official_site: Some("https://example.com/nw".to_string()),
            weight: Some(97.0),
            rating: Some(ShowRating { average: Some(8.4) }),
            image: Some(ShowImage {
                medium: Some("https://img.example/m.jpg".to_string()),
                original: Some("https://img.example/o.jpg".to_string()),
            }),
            network: Some(Network {
                name: "HBC".to_string(),
                country: Some(CountryRef {
                    name: "United States".to_string(),
                    code: "US".to_string(),
                }),
            }),
            externals: Some(Externals {
                imdb: Some("tt7654321".to_string()),
            }),
        }
    }

    #[test]
    fn summary_html_is_stripped_from_overview() {
        let movie = movie_from_show(&sample_show());
        assert_eq!(movie.overview, "A cop drama.");
    }

    #[test]
    fn unknown_genre_tags_are_dropped() {
        let movie = movie_from_show(&sample_show());
        assert_eq!(movie.genre_ids, vec![1, 6]);
    }

    #[test]
    fn missing_summary_gets_placeholder_overview() {
        let show = Show {
            summary: None,
            ..sample_show()
        };
        assert_eq!(movie_from_show(&show).overview, "No overview available.");
    }

    #[test]
    fn rating_and_image_defaults() {
        let show = Show {
            rating: None,
            image: None,
            ..sample_show()
        };
        let movie = movie_from_show(&show);
        assert_eq!(movie.vote_average, 0.0);
        assert_eq!(movie.poster_path, "");
        assert_eq!(movie.backdrop_path, "");
    }

    #[test]
    fn details_resolve_genres_through_the_table() {
        let details = details_from_show(&sample_show());
        let names: Vec<&str> = details.genres.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Drama", "Crime"]);
        assert_eq!(details.runtime, 55);
        assert_eq!(details.budget, 0);
        assert_eq!(details.revenue, 0);
        assert_eq!(details.imdb_id, "tt7654321");
        assert_eq!(details.production_companies[0].name, "HBC");
        assert_eq!(details.production_countries[0].iso_3166_1, "US");
    }

    #[test]
    fn long_summaries_become_truncated_taglines() {
        let show = Show {
            summary: Some(format!("<p>{}</p>", "x".repeat(150))),
            ..sample_show()
        };
        let details = details_from_show(&show);
        assert_eq!(details.tagline.chars().count(), 103);
        assert!(details.tagline.ends_with("..."));
    }
}
