use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::models::Genre;

/// The one genre table shared by normalization (tag -> id) and filtering
/// (id -> name). Both providers tag titles with free-text genre names; ids
/// exist only on our side of the boundary.
pub const GENRES: &[(i64, &str)] = &[
    (1, "Drama"),
    (2, "Comedy"),
    (3, "Action"),
    (4, "Adventure"),
    (5, "Thriller"),
    (6, "Crime"),
    (7, "Horror"),
    (8, "Romance"),
    (9, "Science-Fiction"),
    (10, "Fantasy"),
    (11, "Family"),
    (12, "Animation"),
    (13, "Mystery"),
    (14, "Supernatural"),
    (15, "War"),
    (16, "Western"),
];

// Provider spellings that differ from the table name.
const ALIASES: &[(&str, i64)] = &[
    ("anime", 12),
    ("sci-fi", 9),
    ("science fiction", 9),
];

static BY_NAME: Lazy<HashMap<String, i64>> = Lazy::new(|| {
    let mut index = HashMap::new();
    for (id, name) in GENRES {
        index.insert(name.to_ascii_lowercase(), *id);
    }
    for (alias, id) in ALIASES {
        index.insert((*alias).to_string(), *id);
    }
    index
});

pub fn all() -> Vec<Genre> {
    GENRES
        .iter()
        .map(|(id, name)| Genre {
            id: *id,
            name: (*name).to_string(),
        })
        .collect()
}

pub fn name_of(id: i64) -> Option<&'static str> {
    GENRES
        .iter()
        .find(|(gid, _)| *gid == id)
        .map(|(_, name)| *name)
}

pub fn id_of(name: &str) -> Option<i64> {
    BY_NAME.get(&name.trim().to_ascii_lowercase()).copied()
}

/// Map a provider's free-text genre tags into table ids, dropping tags the
/// table doesn't know. Order follows the provider's tag order.
pub fn ids_for_tags<S: AsRef<str>>(tags: &[S]) -> Vec<i64> {
    let mut ids = Vec::with_capacity(tags.len());
    for tag in tags {
        if let Some(id) = id_of(tag.as_ref()) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
    ids
}

/// Resolve genre ids into `Genre` records, skipping unknown ids.
pub fn resolve(ids: &[i64]) -> Vec<Genre> {
    ids.iter()
        .filter_map(|id| {
            name_of(*id).map(|name| Genre {
                id: *id,
                name: name.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(id_of("drama"), Some(1));
        assert_eq!(id_of("DRAMA"), Some(1));
        assert_eq!(id_of(" Science-Fiction "), Some(9));
        assert_eq!(id_of("Telenovela"), None);
    }

    #[test]
    fn aliases_map_to_table_ids() {
        assert_eq!(id_of("Anime"), Some(12));
        assert_eq!(id_of("Sci-Fi"), Some(9));
        assert_eq!(id_of("Science Fiction"), Some(9));
    }

    #[test]
    fn tags_map_in_order_without_duplicates() {
        let tags = ["Drama", "Anime", "Animation", "Unknown Genre"];
        assert_eq!(ids_for_tags(&tags), vec![1, 12]);
    }

    #[test]
    fn resolve_skips_unknown_ids() {
        let genres = resolve(&[3, 999, 4]);
        let names: Vec<&str> = genres.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Action", "Adventure"]);
    }
}
