//! Error type shared by the schedule fetcher, normalizer and classifier.

/// Failures surfaced by the library.
///
/// Missing optional leaf values (an absent airline, a null scheduled time)
/// are never errors; they are defaulted or filtered where they are read.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Network or HTTP failure, including deadline and budget expiry.
    #[error("Transport error: {0}")]
    Transport(Box<dyn std::error::Error + Send + Sync>),
    /// A page payload lacks the expected schedule structure.
    #[error("Malformed response: missing or invalid '{path}'")]
    MalformedResponse { path: String },
    /// A flight record lacks a structural key.
    #[error("Malformed flight record: missing '{field}'")]
    MalformedField { field: String },
    #[error("Aircraft prefix '{prefix}' is claimed by both '{first}' and '{second}'")]
    OverlappingPrefix {
        prefix: String,
        first: String,
        second: String,
    },
    #[error("Invalid window start '{0}': expected Unix seconds or RFC 3339")]
    InvalidWindowStart(String),
}

impl Error {
    pub fn transport(message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self::Transport(message.into())
    }

    pub(crate) fn malformed_response(path: impl Into<String>) -> Self {
        Self::MalformedResponse { path: path.into() }
    }

    pub(crate) fn malformed_field(field: impl Into<String>) -> Self {
        Self::MalformedField {
            field: field.into(),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
