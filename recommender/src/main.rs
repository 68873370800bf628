use std::io::{self, Write};

use clap::Parser;
use eyre::WrapErr;

use movie_match::RawQueryInput;
use recommender::cli::{Command, RootArgs};
use recommender::config::AppConfig;
use recommender::prompt::prompt_query;
use recommender::report::{print_genres, run_query};

fn main() -> eyre::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = RootArgs::parse();
    let config = AppConfig::from_env_and_args(&args).wrap_err("load config")?;
    config.ensure_catalog()?;

    let catalog =
        movie_catalog::read_processed(&config.catalog_path).wrap_err("load processed catalog")?;
    tracing::info!(
        "Loaded {} movies with {} genres from {}",
        catalog.len(),
        catalog.vocabulary().len(),
        config.catalog_path.display()
    );

    let mut out = io::stdout().lock();

    match args.command.unwrap_or(Command::Prompt) {
        Command::Prompt => {
            print_genres(&mut out, catalog.vocabulary())?;
            let raw = prompt_query(&mut io::stdin().lock(), &mut out).wrap_err("read query")?;
            run_query(&mut out, &catalog, &raw, false)?;
        }
        Command::Query {
            genres,
            start_year,
            end_year,
            top_k,
            json,
        } => {
            let raw = RawQueryInput {
                genres,
                start_year: start_year.unwrap_or_default(),
                end_year: end_year.unwrap_or_default(),
                top_k: top_k.unwrap_or_default(),
            };
            run_query(&mut out, &catalog, &raw, json)?;
        }
        Command::Genres => {
            for genre in catalog.vocabulary().iter() {
                writeln!(out, "{genre}")?;
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
}
