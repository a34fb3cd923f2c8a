//! Runtime configuration read from the environment.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DB_ENV: &str = "FLASHCARDS_DB";
pub const PACING_ENV: &str = "FLASHCARDS_PACING_MS";
pub const LOG_ENV: &str = "RUST_LOG";

const DEFAULT_PACING_MS: u64 = 200;
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("FLASHCARDS_PACING_MS must be a whole number of milliseconds, got {0:?}")]
    InvalidPacing(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    /// Delay between rating a card and the next draw.
    pub pacing: Duration,
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = lookup(DB_ENV)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_db_path);

        let pacing = match lookup(PACING_ENV) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| ConfigError::InvalidPacing(raw))?,
            None => Duration::from_millis(DEFAULT_PACING_MS),
        };

        let log_filter = lookup(LOG_ENV).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            db_path,
            pacing,
            log_filter,
        })
    }

    pub fn with_db_path(mut self, db_path: Option<PathBuf>) -> Self {
        if let Some(path) = db_path {
            self.db_path = path;
        }
        self
    }
}

pub fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("jirehs-flashcards")
        .join("flashcards.db")
}
