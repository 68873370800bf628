use models::{Catalog, CatalogItem};
use serde::Serialize;
use std::cmp::Reverse;

/// Sort key standing in for a missing year; below every real year.
const ABSENT_YEAR: i64 = i64::MIN;

/// Inclusive release-year bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct YearRange {
    pub start: Option<i32>,
    pub end: Option<i32>,
}

impl YearRange {
    pub fn new(start: Option<i32>, end: Option<i32>) -> Self {
        Self { start, end }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Movies without a year pass only when no bound is set.
    pub fn admits(&self, year: Option<i32>) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Some(year) = year else {
            return false;
        };
        self.start.map_or(true, |start| year >= start) && self.end.map_or(true, |end| year <= end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Match<'a> {
    pub item: &'a CatalogItem,
    pub match_count: usize,
}

/// Selects up to `top_k` movies for an already-resolved genre set.
///
/// With genres, movies are grouped by how many requested genres they carry
/// and buckets are drained from `genres.len()` down to 1; movies sharing
/// none of the genres are never returned. Without genres, only movies with
/// no genres at all are eligible. Within a bucket the newest movie comes
/// first and titles break ties.
pub fn bucketed_match<'a>(
    catalog: &'a Catalog,
    genres: &[String],
    years: YearRange,
    top_k: usize,
) -> Vec<Match<'a>> {
    let candidates = catalog.items().iter().filter(|item| years.admits(item.year));

    if genres.is_empty() {
        let mut genreless: Vec<&CatalogItem> =
            candidates.filter(|item| item.has_no_genres()).collect();
        genreless.sort_by_key(|&item| recency_key(item));
        return genreless
            .into_iter()
            .take(top_k)
            .map(|item| Match {
                item,
                match_count: 0,
            })
            .collect();
    }

    let n = genres.len();
    let mut buckets: Vec<Vec<&CatalogItem>> = vec![Vec::new(); n + 1];
    for item in candidates {
        let count = genres.iter().filter(|g| item.has_genre(g)).count();
        buckets[count].push(item);
    }

    let mut matches = Vec::with_capacity(top_k.min(catalog.len()));
    for match_count in (1..=n).rev() {
        let need = top_k - matches.len();
        if need == 0 {
            break;
        }
        let bucket = &mut buckets[match_count];
        if bucket.is_empty() {
            continue;
        }
        bucket.sort_by_key(|&item| recency_key(item));
        matches.extend(
            bucket
                .iter()
                .take(need)
                .map(|&item| Match { item, match_count }),
        );
    }
    matches
}

fn recency_key(item: &CatalogItem) -> (Reverse<i64>, &str) {
    let year = item.year.map_or(ABSENT_YEAR, i64::from);
    (Reverse(year), item.title.as_str())
}
