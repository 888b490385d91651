//! Remote API error types.

use thiserror::Error;

/// Errors that can occur when talking to a remote service.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),

    /// The response body could not be decoded.
    #[error("could not decode response from {url}: {message}")]
    Decode { url: String, message: String },

    /// A field the caller needs was absent from the response.
    #[error("'{0}' field not in response")]
    MissingField(&'static str),

    /// The requested date range is empty.
    #[error("start date {start} is after end date {end}")]
    InvalidDateRange { start: String, end: String },

    /// The player has no tournaments in the requested range.
    #[error("no tournaments found in the specified date range")]
    NoTournaments,

    /// No annotated games matched the player and range.
    #[error("no annotated games found for this player in the specified date range")]
    NoAnnotatedGames,
}

impl RemoteError {
    /// Whether retrying the same request might succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::Network(_) => true,
            Self::Http { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    pub(crate) fn from_transport(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout_secs)
        } else {
            Self::Network(err.to_string())
        }
    }
}
