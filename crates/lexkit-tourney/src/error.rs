//! Error types for tournament tools.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TourneyError {
    /// The scaling factor for the score-difference table was not positive.
    #[error("scaling factor must be greater than 0, got {0}")]
    InvalidScale(f64),

    /// A results line did not have the `round first last score first last score` layout.
    #[error("malformed results line: {0}")]
    MalformedResultLine(String),

    /// A game file name did not contain a round number.
    #[error("malformed filename (no round number): {0}")]
    MissingRound(String),
}
