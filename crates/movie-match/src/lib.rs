use models::{Catalog, MatchMode, DEFAULT_TOP_K, MAX_REQUESTED_GENRES};
use serde::Serialize;

pub mod genres;
pub mod query;
pub mod ranking;

pub use genres::{resolve_genres, ResolvedGenres};
pub use query::{parse_query, split_genre_list, Query, QueryNotice, RawQueryInput};
pub use ranking::{bucketed_match, Match, YearRange};

/// Ranked matches for one query plus the genres that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation<'a> {
    pub mode: MatchMode,
    pub matches: Vec<Match<'a>>,
    pub unknown_genres: Vec<String>,
}

impl Recommendation<'_> {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }
}

/// Runs a query against a catalog. Never mutates the catalog; results
/// borrow its items.
///
/// Only the first `MAX_REQUESTED_GENRES` genres are considered and a
/// `top_k` of zero means `DEFAULT_TOP_K`.
pub fn recommend<'a>(catalog: &'a Catalog, query: &Query) -> Recommendation<'a> {
    let requested = &query.genres[..query.genres.len().min(MAX_REQUESTED_GENRES)];
    let top_k = if query.top_k == 0 {
        DEFAULT_TOP_K
    } else {
        query.top_k
    };

    let resolved = resolve_genres(catalog.vocabulary(), requested);
    if !resolved.unknown.is_empty() {
        tracing::debug!("unknown genres: {:?}", resolved.unknown);
    }

    let mode = if resolved.matched.is_empty() {
        MatchMode::NoGenre
    } else {
        MatchMode::Bucketed
    };

    let matches = bucketed_match(catalog, &resolved.matched, query.years, top_k);
    tracing::debug!(
        "query mode={} genres={:?} years={:?} k={} -> {} matches",
        mode,
        resolved.matched,
        query.years,
        top_k,
        matches.len()
    );

    Recommendation {
        mode,
        matches,
        unknown_genres: resolved.unknown,
    }
}
