use clap::Parser;
use eyre::WrapErr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "movie-catalog")]
#[command(about = "Normalize a raw movies table into the processed catalog", long_about = None)]
struct Args {
    /// Raw movies CSV (movieId, title, genres)
    #[arg(short, long, default_value = "data/movies.csv", value_name = "FILE")]
    input: PathBuf,

    /// Processed catalog CSV to write
    #[arg(short, long, default_value = "data/movies_processed.csv", value_name = "FILE")]
    output: PathBuf,
}

fn main() -> eyre::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "movie_catalog=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if movie_catalog::same_file(&args.input, &args.output) {
        return Err(eyre::eyre!(
            "refusing to overwrite raw input {} with processed output",
            args.input.display()
        ));
    }

    tracing::info!("Reading raw movies from {}", args.input.display());
    let raw = movie_catalog::read_raw_movies(&args.input).wrap_err("failed to read raw movies")?;
    let raw_count = raw.len();

    let catalog = movie_catalog::build(raw);
    let without_year = catalog.items().iter().filter(|i| i.year.is_none()).count();
    let without_genres = catalog.items().iter().filter(|i| i.has_no_genres()).count();

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).wrap_err_with(|| {
                format!("failed to create output directory: {}", parent.display())
            })?;
        }
    }

    movie_catalog::write_processed(&args.output, &catalog)
        .wrap_err("failed to write processed catalog")?;

    tracing::info!("✓ Wrote processed catalog to {}", args.output.display());
    tracing::info!(
        "  - Movies: {} ({} duplicate titles dropped)",
        catalog.len(),
        raw_count - catalog.len()
    );
    tracing::info!("  - Genres: {}", catalog.vocabulary().len());
    tracing::info!("  - Without year: {}", without_year);
    tracing::info!("  - Without genres: {}", without_genres);

    Ok(())
}

