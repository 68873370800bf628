use models::{DEFAULT_TOP_K, MAX_REQUESTED_GENRES};
use serde::Serialize;
use std::fmt;

use crate::ranking::YearRange;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Query {
    pub genres: Vec<String>,
    pub years: YearRange,
    pub top_k: usize,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            genres: Vec::new(),
            years: YearRange::unbounded(),
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl Query {
    pub fn with_genres<I, S>(genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            genres: genres.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn years(mut self, start: Option<i32>, end: Option<i32>) -> Self {
        self.years = YearRange::new(start, end);
        self
    }

    pub fn top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }
}

/// Free text as typed by the user, one field per prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawQueryInput {
    pub genres: String,
    pub start_year: String,
    pub end_year: String,
    pub top_k: String,
}

/// A query field was adjusted; the query still runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryNotice {
    GenresTruncated { max: usize },
    InvalidStartYear(String),
    InvalidEndYear(String),
    InvalidTopK(String),
    NonPositiveTopK(String),
}

impl fmt::Display for QueryNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GenresTruncated { max } => {
                write!(f, "Ignoring any genres beyond the first {max}.")
            }
            Self::InvalidStartYear(raw) => write!(f, "Invalid start year {raw:?} ignored."),
            Self::InvalidEndYear(raw) => write!(f, "Invalid end year {raw:?} ignored."),
            Self::InvalidTopK(raw) => {
                write!(f, "Invalid K {raw:?}; using default = {DEFAULT_TOP_K}.")
            }
            Self::NonPositiveTopK(raw) => {
                write!(f, "Non-positive K ({raw}) ignored; using default = {DEFAULT_TOP_K}.")
            }
        }
    }
}

/// Splits comma-separated genre text, dropping blank entries.
pub fn split_genre_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect()
}

/// Turns prompt text into a query, substituting defaults for anything
/// unusable and reporting each substitution.
pub fn parse_query(input: &RawQueryInput) -> (Query, Vec<QueryNotice>) {
    let mut notices = Vec::new();

    let mut genres = split_genre_list(&input.genres);
    if genres.len() > MAX_REQUESTED_GENRES {
        genres.truncate(MAX_REQUESTED_GENRES);
        notices.push(QueryNotice::GenresTruncated {
            max: MAX_REQUESTED_GENRES,
        });
    }

    let start = parse_year(&input.start_year, &mut notices, QueryNotice::InvalidStartYear);
    let end = parse_year(&input.end_year, &mut notices, QueryNotice::InvalidEndYear);

    let top_k_text = input.top_k.trim();
    let top_k = if top_k_text.is_empty() {
        DEFAULT_TOP_K
    } else {
        match parse_integer(top_k_text) {
            Some(k) if k > 0 => usize::try_from(k).unwrap_or(usize::MAX),
            Some(_) => {
                notices.push(QueryNotice::NonPositiveTopK(top_k_text.to_string()));
                DEFAULT_TOP_K
            }
            None => {
                notices.push(QueryNotice::InvalidTopK(top_k_text.to_string()));
                DEFAULT_TOP_K
            }
        }
    };

    let query = Query {
        genres,
        years: YearRange::new(start, end),
        top_k,
    };
    (query, notices)
}

fn parse_year(
    text: &str,
    notices: &mut Vec<QueryNotice>,
    notice: fn(String) -> QueryNotice,
) -> Option<i32> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    match parse_integer(text) {
        Some(year) => Some(year.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32),
        None => {
            notices.push(notice(text.to_string()));
            None
        }
    }
}

/// Parses an optionally signed run of digits. Values outside `i64`
/// saturate instead of failing.
fn parse_integer(text: &str) -> Option<i64> {
    if let Ok(value) = text.parse::<i64>() {
        return Some(value);
    }
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(if negative { i64::MIN } else { i64::MAX })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(genres: &str, start: &str, end: &str, top_k: &str) -> RawQueryInput {
        RawQueryInput {
            genres: genres.to_string(),
            start_year: start.to_string(),
            end_year: end.to_string(),
            top_k: top_k.to_string(),
        }
    }

    #[test]
    fn blank_input_uses_defaults() {
        let (query, notices) = parse_query(&RawQueryInput::default());
        assert_eq!(query, Query::default());
        assert!(notices.is_empty());
    }

    #[test]
    fn parses_all_fields() {
        let (query, notices) = parse_query(&input(" Action, drama ,,Sci-Fi", "1990", " 2000 ", "5"));
        assert_eq!(query.genres, vec!["Action", "drama", "Sci-Fi"]);
        assert_eq!(query.years, YearRange::new(Some(1990), Some(2000)));
        assert_eq!(query.top_k, 5);
        assert!(notices.is_empty());
    }

    #[test]
    fn truncates_genres_beyond_cap() {
        let text = (1..=20).map(|i| format!("g{i}")).collect::<Vec<_>>().join(",");
        let (query, notices) = parse_query(&input(&text, "", "", ""));
        assert_eq!(query.genres.len(), MAX_REQUESTED_GENRES);
        assert_eq!(query.genres.last().map(String::as_str), Some("g18"));
        assert_eq!(
            notices,
            vec![QueryNotice::GenresTruncated {
                max: MAX_REQUESTED_GENRES
            }]
        );
    }

    #[test]
    fn invalid_years_are_ignored_with_notice() {
        let (query, notices) = parse_query(&input("", "nineteen", "2000s", ""));
        assert_eq!(query.years, YearRange::unbounded());
        assert_eq!(
            notices,
            vec![
                QueryNotice::InvalidStartYear("nineteen".to_string()),
                QueryNotice::InvalidEndYear("2000s".to_string()),
            ]
        );
    }

    #[test]
    fn bad_top_k_falls_back_to_default() {
        let (query, notices) = parse_query(&input("", "", "", "0"));
        assert_eq!(query.top_k, DEFAULT_TOP_K);
        assert_eq!(notices, vec![QueryNotice::NonPositiveTopK("0".to_string())]);

        let (query, notices) = parse_query(&input("", "", "", "-3"));
        assert_eq!(query.top_k, DEFAULT_TOP_K);
        assert_eq!(notices, vec![QueryNotice::NonPositiveTopK("-3".to_string())]);

        let (query, notices) = parse_query(&input("", "", "", "ten"));
        assert_eq!(query.top_k, DEFAULT_TOP_K);
        assert_eq!(notices, vec![QueryNotice::InvalidTopK("ten".to_string())]);
    }

    #[test]
    fn oversized_integers_saturate() {
        let (query, notices) = parse_query(&input("", "", "", "99999999999999999999"));
        assert_eq!(query.top_k, usize::MAX);
        assert!(notices.is_empty());

        let (query, notices) =
            parse_query(&input("", "-99999999999999999999", "3000000000", "-99999999999999999999"));
        assert_eq!(query.years, YearRange::new(Some(i32::MIN), Some(i32::MAX)));
        assert_eq!(query.top_k, DEFAULT_TOP_K);
        assert_eq!(
            notices,
            vec![QueryNotice::NonPositiveTopK("-99999999999999999999".to_string())]
        );
    }

    #[test]
    fn notice_wording() {
        assert_eq!(
            QueryNotice::GenresTruncated { max: 18 }.to_string(),
            "Ignoring any genres beyond the first 18."
        );
        assert_eq!(
            QueryNotice::InvalidTopK("x".to_string()).to_string(),
            "Invalid K \"x\"; using default = 10."
        );
    }

    #[test]
    fn builder_helpers() {
        let query = Query::with_genres(["Drama"]).years(Some(1990), None).top_k(3);
        assert_eq!(query.genres, vec!["Drama"]);
        assert_eq!(query.years.start, Some(1990));
        assert_eq!(query.top_k, 3);
    }
}
