use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use strum::{Display, EnumString};

/// Number of recommendations returned when the caller gives no usable K.
pub const DEFAULT_TOP_K: usize = 10;

/// Requested genres beyond this count are dropped.
pub const MAX_REQUESTED_GENRES: usize = 18;

/// Raw genre token meaning "this movie has no genres".
pub const NO_GENRES_SENTINEL: &str = "(no genres listed)";

/// Prefix of the one-hot genre columns in the processed table.
pub const GENRE_COLUMN_PREFIX: &str = "genre_";

/// Column holding the normalized genre list in the processed table.
pub const GENRE_LIST_COLUMN: &str = "genre_list";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(pub String);

impl MovieId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MovieId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: MovieId,
    pub title: String,
    pub year: Option<i32>,
    /// Genre field exactly as it appeared in the raw table.
    pub raw_genres: Option<String>,
    /// Normalized genres. Empty means "no genres listed" (or a missing field).
    pub genres: BTreeSet<String>,
}

impl CatalogItem {
    pub fn has_no_genres(&self) -> bool {
        self.genres.is_empty()
    }

    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.contains(genre)
    }
}

/// Sorted set of every genre present in a catalog.
///
/// Lookups go through a lowercase index built once, so resolving a user's
/// genre costs a single hash lookup regardless of vocabulary size.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenreVocabulary {
    names: Vec<String>,
    by_lowercase: HashMap<String, usize>,
}

impl GenreVocabulary {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names
            .into_iter()
            .map(Into::into)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        // Case variants share a key; the last in sorted order wins.
        let by_lowercase: HashMap<String, usize> = names
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.to_lowercase(), idx))
            .collect();

        Self {
            names,
            by_lowercase,
        }
    }

    /// Case-insensitive exact lookup; returns the canonical spelling.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        let key = name.trim().to_lowercase();
        self.by_lowercase
            .get(&key)
            .map(|&idx| self.names[idx].as_str())
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Deduplicated, normalized movies plus the vocabulary derived from them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    items: Vec<CatalogItem>,
    vocabulary: GenreVocabulary,
}

impl Catalog {
    pub fn new(items: Vec<CatalogItem>, vocabulary: GenreVocabulary) -> Self {
        Self { items, vocabulary }
    }

    /// Derives the vocabulary from the union of the items' genres.
    pub fn from_items(items: Vec<CatalogItem>) -> Self {
        let vocabulary =
            GenreVocabulary::from_names(items.iter().flat_map(|item| item.genres.iter().cloned()));
        Self { items, vocabulary }
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn vocabulary(&self) -> &GenreVocabulary {
        &self.vocabulary
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
pub enum MatchMode {
    /// At least one requested genre is known; results ranked by overlap.
    #[serde(rename = "bucketed")]
    #[strum(serialize = "bucketed")]
    Bucketed,
    /// No requested genre survived; only genre-less movies are returned.
    #[serde(rename = "no-genre")]
    #[strum(serialize = "no-genre")]
    NoGenre,
}
