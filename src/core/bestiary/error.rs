//! Error types for the monster data gateway.

use thiserror::Error;

use crate::core::combat::ErrorCategory;

/// Result type alias for bestiary operations.
pub type Result<T> = std::result::Result<T, BestiaryError>;

/// Errors raised while fetching monster data.
#[derive(Debug, Error)]
pub enum BestiaryError {
    /// Transport failure (connection refused, DNS, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },

    /// The response body was not the JSON we expected.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The API has no monster with this index.
    #[error("Monster not found: {0}")]
    MonsterNotFound(String),

    /// A monster name that is not in the loaded list.
    #[error("Unknown monster '{0}'. Pick a monster from the list.")]
    UnknownMonsterName(String),
}

impl BestiaryError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownMonsterName(_) => ErrorCategory::Lookup,
            _ => ErrorCategory::Network,
        }
    }
}
