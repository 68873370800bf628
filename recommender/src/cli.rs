use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "recommender")]
#[command(about = "Genre-based movie recommendations from a processed catalog")]
pub struct RootArgs {
    #[arg(
        long,
        value_name = "FILE",
        help = "Processed catalog CSV (defaults to $MOVIE_CATALOG_PATH, then data/movies_processed.csv)"
    )]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    #[command(about = "Ask for genres, years and K interactively (default)")]
    Prompt,
    #[command(about = "Run a single query from command-line arguments")]
    Query {
        #[arg(
            long,
            default_value = "",
            value_name = "LIST",
            help = "Comma-separated genres; empty lists movies without genres"
        )]
        genres: String,

        #[arg(long, value_name = "YEAR", help = "Earliest release year (inclusive)")]
        start_year: Option<String>,

        #[arg(long, value_name = "YEAR", help = "Latest release year (inclusive)")]
        end_year: Option<String>,

        #[arg(long, value_name = "K", help = "Number of recommendations (default 10)")]
        top_k: Option<String>,

        #[arg(long, help = "Print the recommendation as JSON")]
        json: bool,
    },
    #[command(about = "List the genres known to the catalog")]
    Genres,
}
