use std::io::Write;

use eyre::WrapErr;
use models::{Catalog, GenreVocabulary};
use movie_match::{parse_query, recommend, QueryNotice, RawQueryInput, Recommendation};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    notices: Vec<String>,
    #[serde(flatten)]
    recommendation: &'a Recommendation<'a>,
}

pub fn print_genres<W: Write>(out: &mut W, vocabulary: &GenreVocabulary) -> eyre::Result<()> {
    writeln!(out, "\nAvailable genres:")?;
    for genre in vocabulary.iter() {
        writeln!(out, "- {genre}")?;
    }
    writeln!(out)?;
    Ok(())
}

/// Parses, runs and prints one query.
pub fn run_query<W: Write>(
    out: &mut W,
    catalog: &Catalog,
    input: &RawQueryInput,
    json: bool,
) -> eyre::Result<()> {
    let (query, notices) = parse_query(input);
    let recommendation = recommend(catalog, &query);
    tracing::info!(
        "query returned {} of at most {} movies ({})",
        recommendation.len(),
        query.top_k,
        recommendation.mode
    );

    if json {
        print_json(out, &notices, &recommendation)
    } else {
        print_notices(out, &notices)?;
        print_recommendation(out, &recommendation)
    }
}

pub fn print_notices<W: Write>(out: &mut W, notices: &[QueryNotice]) -> eyre::Result<()> {
    for notice in notices {
        writeln!(out, "{notice}")?;
    }
    Ok(())
}

pub fn print_recommendation<W: Write>(
    out: &mut W,
    recommendation: &Recommendation<'_>,
) -> eyre::Result<()> {
    if !recommendation.unknown_genres.is_empty() {
        writeln!(
            out,
            "Unknown genres ignored: {}",
            recommendation.unknown_genres.join(", ")
        )?;
    }

    if recommendation.is_empty() {
        writeln!(out, "No results found for your query.")?;
        return Ok(());
    }

    writeln!(out, "\nTop {} results:\n", recommendation.len())?;
    for (idx, m) in recommendation.matches.iter().enumerate() {
        writeln!(out, "{:02}. {}", idx + 1, m.item.title)?;
    }
    Ok(())
}

fn print_json<W: Write>(
    out: &mut W,
    notices: &[QueryNotice],
    recommendation: &Recommendation<'_>,
) -> eyre::Result<()> {
    let report = JsonReport {
        notices: notices.iter().map(ToString::to_string).collect(),
        recommendation,
    };
    serde_json::to_writer_pretty(&mut *out, &report).wrap_err("serialize recommendation")?;
    writeln!(out)?;
    Ok(())
}
