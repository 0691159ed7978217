use serde::Serialize;

use crate::genres;

/// Static mood -> genre mapping driving recommendation browsing. Not
/// user-editable; genre ids come from the shared table in [`genres`].
#[derive(Debug, Serialize, Clone, Copy)]
pub struct MoodFilter {
    pub mood: &'static str,
    pub label: &'static str,
    pub emoji: &'static str,
    pub genre_ids: &'static [i64],
}

pub const MOOD_FILTERS: &[MoodFilter] = &[
    MoodFilter {
        mood: "action",
        label: "Action & Adventure",
        emoji: "\u{1f4a5}",
        genre_ids: &[3, 4],
    },
    MoodFilter {
        mood: "comedy",
        label: "Comedy & Fun",
        emoji: "\u{1f602}",
        genre_ids: &[2],
    },
    MoodFilter {
        mood: "drama",
        label: "Drama & Emotion",
        emoji: "\u{1f3ad}",
        genre_ids: &[1],
    },
    MoodFilter {
        mood: "horror",
        label: "Horror & Thriller",
        emoji: "\u{1f631}",
        genre_ids: &[7],
    },
    MoodFilter {
        mood: "romance",
        label: "Romance & Love",
        emoji: "\u{1f495}",
        genre_ids: &[8],
    },
    MoodFilter {
        mood: "sci-fi",
        label: "Sci-Fi & Fantasy",
        emoji: "\u{1f680}",
        genre_ids: &[9, 10],
    },
    MoodFilter {
        mood: "thriller",
        label: "Thriller & Crime",
        emoji: "\u{1f50d}",
        genre_ids: &[5, 6],
    },
    MoodFilter {
        mood: "family",
        label: "Family & Animation",
        emoji: "\u{1f468}\u{200d}\u{1f469}\u{200d}\u{1f467}\u{200d}\u{1f466}",
        genre_ids: &[11, 12],
    },
];

pub fn find(slug: &str) -> Option<&'static MoodFilter> {
    MOOD_FILTERS
        .iter()
        .find(|m| m.mood.eq_ignore_ascii_case(slug.trim()))
}
