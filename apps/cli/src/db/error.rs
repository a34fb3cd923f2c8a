//! Database error types.

use flashcard_core::PersistenceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}
