use models::{Catalog, CatalogItem, MovieId, NO_GENRES_SENTINEL};
use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use std::sync::LazyLock;

mod table;

pub use table::{
    read_processed, read_processed_from, read_raw_movies, read_raw_movies_from, write_processed,
    write_processed_to,
};

static TITLE_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([0-9]{4})\)\s*$").expect("title year regex"));

/// One row of the raw movies table. Columns other than these are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawMovie {
    #[serde(rename = "movieId", default)]
    pub movie_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub genres: Option<String>,
}

impl RawMovie {
    pub fn new(movie_id: &str, title: &str, genres: Option<&str>) -> Self {
        Self {
            movie_id: Some(movie_id.to_string()),
            title: Some(title.to_string()),
            genres: genres.map(str::to_string),
        }
    }
}

/// Normalizes raw rows into a catalog.
///
/// Titles are deduplicated keeping the first occurrence. Malformed fields
/// never fail the build: a title without a `(YYYY)` suffix has no year and a
/// missing genre field yields an empty genre set.
pub fn build<I>(raw_movies: I) -> Catalog
where
    I: IntoIterator<Item = RawMovie>,
{
    let mut seen_titles = HashSet::new();
    let mut kept = Vec::new();
    let mut duplicates = 0usize;

    for (row, raw) in raw_movies.into_iter().enumerate() {
        let title = raw.title.clone().unwrap_or_default();
        if !seen_titles.insert(title.clone()) {
            duplicates += 1;
            continue;
        }
        kept.push((row, title, raw));
    }

    let ids = fill_missing_ids(
        kept.iter()
            .map(|(row, _, raw)| (*row, raw.movie_id.as_deref().map(str::trim)))
            .collect(),
    );

    let mut items = Vec::with_capacity(kept.len());
    for ((_, title, raw), id) in kept.into_iter().zip(ids) {
        let year = extract_year(&title);
        if year.is_none() {
            tracing::debug!("no year suffix in title {:?}", title);
        }

        let genres = match raw.genres.as_deref() {
            Some(field) => split_genres(field),
            None => {
                tracing::debug!("missing genre field for {:?}", title);
                BTreeSet::new()
            }
        };

        items.push(CatalogItem {
            id,
            title,
            year,
            raw_genres: raw.genres,
            genres,
        });
    }

    let catalog = Catalog::from_items(items);
    tracing::debug!(
        "built catalog: {} movies, {} duplicate titles dropped, {} genres",
        catalog.len(),
        duplicates,
        catalog.vocabulary().len()
    );
    catalog
}

/// Gives every row an id. A row without one gets its 1-based row number,
/// suffixed with `-N` when that is already some other row's id.
pub(crate) fn fill_missing_ids(rows: Vec<(usize, Option<&str>)>) -> Vec<MovieId> {
    let rows: Vec<(usize, Option<&str>)> = rows
        .into_iter()
        .map(|(row, id)| (row, id.filter(|id| !id.is_empty())))
        .collect();
    let mut taken: HashSet<String> = rows
        .iter()
        .filter_map(|(_, id)| id.map(str::to_string))
        .collect();

    rows.into_iter()
        .map(|(row, id)| match id {
            Some(id) => MovieId::from(id),
            None => {
                let base = (row + 1).to_string();
                let mut candidate = base.clone();
                let mut n = 0usize;
                while taken.contains(&candidate) {
                    n += 1;
                    candidate = format!("{base}-{n}");
                }
                tracing::debug!("row {} has no movieId; using {}", row + 1, candidate);
                taken.insert(candidate.clone());
                MovieId(candidate)
            }
        })
        .collect()
}

/// True when `output` names the same file as `input`, including through
/// different spellings of an existing path.
pub fn same_file(input: &Path, output: &Path) -> bool {
    if input == output {
        return true;
    }
    match (input.canonicalize(), output.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Year from a trailing `(YYYY)`, e.g. `"Toy Story (1995)"` -> 1995.
pub fn extract_year(title: &str) -> Option<i32> {
    TITLE_YEAR
        .captures(title)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

pub fn split_genres(field: &str) -> BTreeSet<String> {
    field
        .split('|')
        .map(str::trim)
        .filter(|g| !g.is_empty() && *g != NO_GENRES_SENTINEL)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_trailing_parenthesized_year() {
        assert_eq!(extract_year("Toy Story (1995)"), Some(1995));
        assert_eq!(extract_year("Heat (1995)   "), Some(1995));
        assert_eq!(extract_year("Ashes (Reprise) (2003)"), Some(2003));
        assert_eq!(extract_year("Café"), None);
        assert_eq!(extract_year("Blade Runner 2049"), None);
        assert_eq!(extract_year("(1995) Prefix Only"), None);
        assert_eq!(extract_year("Short (95)"), None);
        assert_eq!(extract_year("Long (19955)"), None);
        assert_eq!(extract_year("Trailing (1995) text"), None);
        assert_eq!(extract_year(""), None);
    }

    #[test]
    fn splits_and_cleans_genres() {
        let genres = split_genres(" Action |Drama||Action| ");
        assert_eq!(
            genres.into_iter().collect::<Vec<_>>(),
            vec!["Action".to_string(), "Drama".to_string()]
        );
        assert!(split_genres(NO_GENRES_SENTINEL).is_empty());
        assert!(split_genres("").is_empty());
        assert!(split_genres("|  |").is_empty());
    }

    #[test]
    fn drops_duplicate_titles_keeping_first() {
        let catalog = build(vec![
            RawMovie::new("1", "Heat (1995)", Some("Action")),
            RawMovie::new("2", "Jumanji (1995)", Some("Adventure")),
            RawMovie::new("3", "Heat (1995)", Some("Drama")),
        ]);

        let titles: Vec<_> = catalog.items().iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Heat (1995)", "Jumanji (1995)"]);
        assert_eq!(catalog.items()[0].id, MovieId::from("1"));
        assert!(catalog.items()[0].has_genre("Action"));
        assert_eq!(catalog.vocabulary().names(), &["Action", "Adventure"]);
    }

    #[test]
    fn missing_and_sentinel_genres_are_both_empty() {
        let catalog = build(vec![
            RawMovie::new("1", "Missing", None),
            RawMovie::new("2", "Sentinel", Some(NO_GENRES_SENTINEL)),
        ]);

        assert!(catalog.items().iter().all(CatalogItem::has_no_genres));
        assert_eq!(catalog.items()[0].raw_genres, None);
        assert_eq!(
            catalog.items()[1].raw_genres.as_deref(),
            Some(NO_GENRES_SENTINEL)
        );
        assert!(catalog.vocabulary().is_empty());
    }

    #[test]
    fn falls_back_to_row_number_for_missing_ids() {
        let catalog = build(vec![
            RawMovie::new("10", "First", Some("Drama")),
            RawMovie {
                movie_id: None,
                title: Some("Second".to_string()),
                genres: None,
            },
            RawMovie {
                movie_id: Some("  ".to_string()),
                title: Some("Third".to_string()),
                genres: None,
            },
        ]);

        let ids: Vec<_> = catalog.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["10", "2", "3"]);
    }

    #[test]
    fn fallback_ids_skip_explicit_ones() {
        let unnamed = |title: &str| RawMovie {
            movie_id: None,
            title: Some(title.to_string()),
            genres: None,
        };
        let catalog = build(vec![
            RawMovie::new("2", "First", None),
            unnamed("Second"),
            RawMovie::new("2-1", "Third", None),
            unnamed("Fourth"),
        ]);

        let ids: Vec<_> = catalog.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "2-2", "2-1", "4"]);
    }

    #[test]
    fn same_file_sees_through_path_spellings() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("movies.csv");
        std::fs::write(&input, "movieId,title,genres\n").unwrap();

        assert!(same_file(&input, &input));
        assert!(same_file(&input, &dir.path().join(".").join("movies.csv")));
        let dir_name = dir.path().file_name().unwrap();
        let roundabout = dir.path().join("..").join(dir_name).join("movies.csv");
        assert!(same_file(&roundabout, &input));
        assert!(same_file(Path::new("data/missing.csv"), Path::new("data/missing.csv")));
        assert!(!same_file(&input, &dir.path().join("movies_processed.csv")));
    }

    #[test]
    fn build_is_idempotent() {
        let raw = vec![
            RawMovie::new("1", "Toy Story (1995)", Some("Adventure|Animation|Children")),
            RawMovie::new("2", "Toy Story (1995)", Some("Comedy")),
            RawMovie::new("3", "Untitled", Some(NO_GENRES_SENTINEL)),
        ];
        assert_eq!(build(raw.clone()), build(raw));
    }
}
