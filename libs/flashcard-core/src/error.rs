//! Error types for flashcard-core.

use thiserror::Error;

/// Result type alias using CardError.
pub type Result<T> = std::result::Result<T, CardError>;

/// Errors raised when creating or changing cards.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CardError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("no row has both a question and an answer")]
    NoValidRows,

    #[error("a card with the question \"{question}\" already exists")]
    DuplicateQuestion { question: String },

    #[error("card not found: {0}")]
    NotFound(String),
}

/// Errors that can occur while parsing an imported card file.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a card object or an array of card objects")]
    UnexpectedShape,
}

/// Errors reading or writing the saved collection.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("corrupt saved state: {0}")]
    Corrupt(serde_json::Error),

    #[error("failed to encode collection: {0}")]
    Encode(serde_json::Error),
}
