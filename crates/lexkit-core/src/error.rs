//! Validation error types.
//!
//! Loaders and formatters return these when an input file does not have
//! the shape the quiz program or the lexicon tools expect. I/O failures are
//! reported through `anyhow` context instead.

use thiserror::Error;

/// Errors raised while parsing lexicon files.
#[derive(Debug, Error)]
pub enum LexiconError {
    /// A line did not start with a contiguous run of letters.
    #[error("invalid line format: {0}")]
    InvalidLine(String),

    /// A line did not match the definitions export layout.
    #[error("match not found for {0}")]
    UnmatchedExportLine(String),

    /// A hook lexicon line had fewer than three fields.
    #[error("invalid hook line: {0}")]
    InvalidHookLine(String),

    /// A numeric field could not be parsed.
    #[error("invalid number '{value}' on line: {line}")]
    InvalidNumber { value: String, line: String },

    /// A word looked up in a lexicon was not present.
    #[error("word {0} not found in lexicon")]
    UnknownWord(String),
}

/// Errors raised while reading or writing quiz files.
#[derive(Debug, Error)]
pub enum QuizError {
    /// A TSV row did not contain exactly one tab.
    #[error("row must contain exactly one tab: {0}")]
    MalformedRow(String),

    /// A semicolon-delimited quiz line did not have three fields.
    #[error("line does not have 3 parts: {0}")]
    WrongFieldCount(String),

    /// A quiz word is missing from the lexicon.
    #[error("word {0} not found in lexicon")]
    UnknownWord(String),

    /// An operation that needs at least one word got none.
    #[error("word list is empty")]
    EmptyWordList,

    /// A size, increment, or line count argument was zero.
    #[error("{0} must be at least 1")]
    ZeroSize(&'static str),
}

/// Errors raised while merging or diffing lexicon editions.
#[derive(Debug, Error)]
pub enum UpdateError {
    /// A word in the new edition has no definition from any source.
    #[error("missing definition for word '{0}'")]
    MissingDefinition(String),

    /// The downloaded update sheet had too few columns.
    #[error("update sheet row has {found} columns, expected at least 6: {line}")]
    TooFewColumns { found: usize, line: String },
}
