//! Error types for the PMKB bot.

use thiserror::Error;

/// Result type alias for bot operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types raised while answering a chat turn
#[derive(Debug, Error)]
pub enum Error {
    /// No usable gene entity was recognized in the utterance
    #[error("No gene entity found in the recognized entities")]
    MissingGene,

    /// Knowledge-base API answered with a non-success status
    #[error("Knowledge base error ({status}): {body}")]
    Gateway { status: u16, body: String },

    /// The turn deadline elapsed while waiting on an external call
    #[error("Timed out after {0} ms")]
    Timeout(u64),

    /// NLU service failure
    #[error("Recognizer error: {0}")]
    Recognizer(String),

    /// Network error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL construction error
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}

impl Error {
    /// Whether the user can fix this by rephrasing their message.
    ///
    /// Everything else is reported with the generic apology.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Error::MissingGene | Error::InvalidInput(_))
    }

    /// Knowledge-base side failure (status, transport or deadline)
    pub fn is_gateway_failure(&self) -> bool {
        matches!(
            self,
            Error::Gateway { .. } | Error::Http(_) | Error::Timeout(_)
        )
    }

    /// HTTP status carried by a gateway error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Gateway { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
