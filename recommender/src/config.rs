use std::path::PathBuf;

use crate::cli::RootArgs;

pub const CATALOG_PATH_ENV: &str = "MOVIE_CATALOG_PATH";
pub const DEFAULT_CATALOG_PATH: &str = "data/movies_processed.csv";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub catalog_path: PathBuf,
}

impl AppConfig {
    /// `--catalog` wins over `MOVIE_CATALOG_PATH`, which wins over the default.
    pub fn from_env_and_args(args: &RootArgs) -> eyre::Result<Self> {
        let env_path = std::env::var(CATALOG_PATH_ENV)
            .ok()
            .filter(|s| !s.trim().is_empty());
        Ok(Self::resolve(args, env_path))
    }

    fn resolve(args: &RootArgs, env_path: Option<String>) -> Self {
        let catalog_path = args
            .catalog
            .clone()
            .or_else(|| env_path.map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH));
        Self { catalog_path }
    }

    pub fn ensure_catalog(&self) -> eyre::Result<()> {
        if self.catalog_path.is_file() {
            return Ok(());
        }
        Err(eyre::eyre!(
            "catalog not found at {}; build it first with `movie-catalog --output {}`",
            self.catalog_path.display(),
            self.catalog_path.display()
        ))
    }
}
