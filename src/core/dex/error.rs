//! Error types for the Pokédex data layer.
//!
//! Load failures are fatal and shared with every caller waiting on the first
//! load. Ability lookup failures never escape the cache; they exist so the
//! cause can be logged before the lookup collapses to "not found".

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Result type alias for service-level operations.
pub type Result<T> = std::result::Result<T, DexError>;

/// Failure while reading or parsing the bulk dataset.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The configured source does not exist. Not retried.
    #[error("Dataset source not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    /// The source was read but could not be parsed into records.
    #[error("Malformed dataset source '{source_name}': {reason}")]
    Malformed { source_name: String, reason: String },

    /// Any other I/O failure, propagated unchanged.
    #[error("I/O error reading dataset: {0}")]
    Io(#[from] std::io::Error),

    /// The spawned load task panicked or was aborted.
    #[error("Dataset load task failed: {0}")]
    TaskFailed(String),
}

/// Internal reasons an ability lookup produced no description.
#[derive(Error, Debug)]
pub enum AbilityError {
    #[error("Upstream request timed out")]
    Timeout,

    #[error("Upstream request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Upstream returned status {0}")]
    Status(u16),

    #[error("Failed to parse ability body: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No '{language}' effect entry for ability '{ability}'")]
    MissingLanguage { ability: String, language: String },
}

impl From<reqwest::Error> for AbilityError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AbilityError::Timeout
        } else {
            AbilityError::Request(err)
        }
    }
}

/// Errors surfaced to callers of the service facade.
#[derive(Error, Debug, Clone)]
pub enum DexError {
    /// The dataset failed to load. Every caller sees the same shared error.
    #[error("Dataset unavailable: {0}")]
    Load(Arc<LoadError>),

    /// Rejected before any lookup work was attempted.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<Arc<LoadError>> for DexError {
    fn from(err: Arc<LoadError>) -> Self {
        DexError::Load(err)
    }
}
