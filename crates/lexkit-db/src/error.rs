//! Database reconciliation errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// The database file does not exist.
    #[error("database does not exist: {0}")]
    NotFound(String),

    /// Definition words with no row in the database. Nothing was changed.
    #[error("the following words are not in the words table: {}", .0.join(", "))]
    UnknownWords(Vec<String>),

    /// Database words the definitions did not cover. The update was rolled back.
    #[error("the following words were not updated with new definitions: {}", .0.join(", "))]
    Uncovered(Vec<String>),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}
