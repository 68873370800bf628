use eyre::{ContextCompat, WrapErr};
use models::{Catalog, CatalogItem, GenreVocabulary, GENRE_COLUMN_PREFIX, GENRE_LIST_COLUMN};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::{fill_missing_ids, RawMovie};

const ID_COLUMN: &str = "movieId";
const TITLE_COLUMN: &str = "title";
const YEAR_COLUMN: &str = "year";
const GENRES_COLUMN: &str = "genres";

pub fn read_raw_movies(path: &Path) -> eyre::Result<Vec<RawMovie>> {
    let file =
        File::open(path).wrap_err_with(|| format!("open raw movies: {}", path.display()))?;
    read_raw_movies_from(file).wrap_err_with(|| format!("parse raw movies: {}", path.display()))
}

pub fn read_raw_movies_from<R: Read>(reader: R) -> eyre::Result<Vec<RawMovie>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = reader.headers().wrap_err("read header row")?;
    if !headers.iter().any(|h| h == TITLE_COLUMN) {
        return Err(eyre::eyre!("missing required column: {TITLE_COLUMN}"));
    }

    let mut movies = Vec::new();
    for (idx, record) in reader.deserialize::<RawMovie>().enumerate() {
        let movie = record.wrap_err_with(|| format!("parse raw movie row {}", idx + 1))?;
        movies.push(movie);
    }
    Ok(movies)
}

pub fn write_processed(path: &Path, catalog: &Catalog) -> eyre::Result<()> {
    let file = File::create(path)
        .wrap_err_with(|| format!("create processed table: {}", path.display()))?;
    write_processed_to(file, catalog)
        .wrap_err_with(|| format!("write processed table: {}", path.display()))
}

/// Writes `movieId,title,year,genres,genre_list` followed by one 0/1 column
/// per vocabulary genre.
pub fn write_processed_to<W: Write>(writer: W, catalog: &Catalog) -> eyre::Result<()> {
    let vocabulary = catalog.vocabulary();
    let mut writer = csv::Writer::from_writer(writer);

    let mut header = vec![
        ID_COLUMN.to_string(),
        TITLE_COLUMN.to_string(),
        YEAR_COLUMN.to_string(),
        GENRES_COLUMN.to_string(),
        GENRE_LIST_COLUMN.to_string(),
    ];
    header.extend(vocabulary.iter().map(|g| format!("{GENRE_COLUMN_PREFIX}{g}")));
    writer.write_record(&header).wrap_err("write header row")?;

    for item in catalog.items() {
        let mut row = Vec::with_capacity(header.len());
        row.push(item.id.to_string());
        row.push(item.title.clone());
        row.push(item.year.map(|y| y.to_string()).unwrap_or_default());
        row.push(item.raw_genres.clone().unwrap_or_default());
        row.push(item.genres.iter().cloned().collect::<Vec<_>>().join("|"));
        row.extend(
            vocabulary
                .iter()
                .map(|g| String::from(if item.has_genre(g) { "1" } else { "0" })),
        );
        writer
            .write_record(&row)
            .wrap_err_with(|| format!("write row for {:?}", item.title))?;
    }

    writer.flush().wrap_err("flush processed table")?;
    Ok(())
}

pub fn read_processed(path: &Path) -> eyre::Result<Catalog> {
    let file = File::open(path)
        .wrap_err_with(|| format!("open processed table: {}", path.display()))?;
    read_processed_from(file)
        .wrap_err_with(|| format!("parse processed table: {}", path.display()))
}

/// Rebuilds a catalog from a processed table.
///
/// The vocabulary comes from the `genre_*` column names and each movie's
/// genres from its flag columns, so tables written by other tooling
/// (`1.0`/`0.0` flags, `1995.0` years) load as well.
pub fn read_processed_from<R: Read>(reader: R) -> eyre::Result<Catalog> {
    let mut reader = csv::ReaderBuilder::new().from_reader(reader);
    let headers = reader.headers().wrap_err("read header row")?.clone();

    let column = |name: &str| headers.iter().position(|h| h == name);
    let title_idx = column(TITLE_COLUMN)
        .wrap_err_with(|| format!("missing required column: {TITLE_COLUMN}"))?;
    let id_idx = column(ID_COLUMN);
    let year_idx = column(YEAR_COLUMN);
    let genres_idx = column(GENRES_COLUMN);

    let genre_columns: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| *h != GENRE_LIST_COLUMN)
        .filter_map(|(idx, h)| {
            h.strip_prefix(GENRE_COLUMN_PREFIX)
                .filter(|g| !g.is_empty())
                .map(|g| (idx, g.to_string()))
        })
        .collect();

    let mut ids = Vec::new();
    let mut rows = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.wrap_err_with(|| format!("read processed row {}", row + 1))?;
        let field = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .map(str::trim)
                .filter(|s| !s.is_empty())
        };

        ids.push((row, field(id_idx).map(str::to_string)));
        let title = record.get(title_idx).unwrap_or_default().to_string();
        let year = field(year_idx).and_then(parse_year);
        // Passed through untouched; only an empty cell means missing.
        let raw_genres = genres_idx
            .and_then(|i| record.get(i))
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let genres: BTreeSet<String> = genre_columns
            .iter()
            .filter(|(idx, _)| record.get(*idx).is_some_and(parse_flag))
            .map(|(_, g)| g.clone())
            .collect();

        rows.push((title, year, raw_genres, genres));
    }

    let ids = fill_missing_ids(ids.iter().map(|(row, id)| (*row, id.as_deref())).collect());
    let items: Vec<CatalogItem> = rows
        .into_iter()
        .zip(ids)
        .map(|((title, year, raw_genres, genres), id)| CatalogItem {
            id,
            title,
            year,
            raw_genres,
            genres,
        })
        .collect();

    let vocabulary = GenreVocabulary::from_names(genre_columns.into_iter().map(|(_, g)| g));
    tracing::debug!(
        "loaded processed catalog: {} movies, {} genres",
        items.len(),
        vocabulary.len()
    );
    Ok(Catalog::new(items, vocabulary))
}

fn parse_year(s: &str) -> Option<i32> {
    if let Ok(year) = s.parse::<i32>() {
        return Some(year);
    }
    let value = s.parse::<f64>().ok()?;
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= i32::MAX as f64 {
        Some(value as i32)
    } else {
        None
    }
}

fn parse_flag(s: &str) -> bool {
    let s = s.trim();
    if s.eq_ignore_ascii_case("true") {
        return true;
    }
    s.parse::<f64>().is_ok_and(|v| !v.is_nan() && v != 0.0)
}
