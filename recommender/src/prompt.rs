use std::io::{BufRead, Write};

use eyre::WrapErr;
use models::{DEFAULT_TOP_K, MAX_REQUESTED_GENRES};
use movie_match::RawQueryInput;

/// Asks for each query field in turn. Input ending early leaves the
/// remaining fields blank.
pub fn prompt_query<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> eyre::Result<RawQueryInput> {
    writeln!(
        out,
        "Enter genres, comma-separated (up to {MAX_REQUESTED_GENRES}). Leave blank for none."
    )?;
    let genres = ask(input, out, "Genres: ")?;

    writeln!(out, "Enter start year (or press Enter to skip):")?;
    let start_year = ask(input, out, "Start year: ")?;

    writeln!(out, "Enter end year (or press Enter to skip):")?;
    let end_year = ask(input, out, "End year: ")?;

    writeln!(
        out,
        "How many recommendations do you want? (press Enter for default {DEFAULT_TOP_K}):"
    )?;
    let top_k = ask(input, out, "Top-K: ")?;

    Ok(RawQueryInput {
        genres,
        start_year,
        end_year,
        top_k,
    })
}

fn ask<R: BufRead, W: Write>(input: &mut R, out: &mut W, label: &str) -> eyre::Result<String> {
    write!(out, "{label}")?;
    out.flush().wrap_err("flush prompt")?;

    let mut line = String::new();
    input.read_line(&mut line).wrap_err("read answer")?;
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_one_line_per_field() {
        let mut input = Cursor::new("Action, Drama\n1990\n\n5\n");
        let mut out = Vec::new();
        let raw = prompt_query(&mut input, &mut out).unwrap();

        assert_eq!(raw.genres, "Action, Drama");
        assert_eq!(raw.start_year, "1990");
        assert_eq!(raw.end_year, "");
        assert_eq!(raw.top_k, "5");

        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains("Genres: "));
        assert!(shown.contains("Top-K: "));
    }

    #[test]
    fn early_end_of_input_leaves_fields_blank() {
        let mut input = Cursor::new("Comedy");
        let mut out = Vec::new();
        let raw = prompt_query(&mut input, &mut out).unwrap();

        assert_eq!(raw.genres, "Comedy");
        assert_eq!(raw.start_year, "");
        assert_eq!(raw.top_k, "");
    }
}
