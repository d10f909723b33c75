//! Error types for the recommendation pipeline.

use thiserror::Error;

/// Key-value store failures.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage task failed: {0}")]
    Task(String),

    #[error("Storage error: {0}")]
    Other(String),
}

/// Recommendation cache failures. Reads never surface these; writes do.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to encode cache entry: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Generation API failures. All of them are recovered by the fallback engine.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Project validation failed")]
    ProjectValidation,

    #[error("API error: {status}")]
    Api { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl GenerationError {
    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::ProjectValidation => "Outfit suggestions are not configured for this app.",
            Self::Api { status, .. } if *status >= 500 => {
                "The suggestion service is having trouble. Showing a basic outfit instead."
            }
            Self::Api { .. } => "Could not get a personalized outfit. Showing a basic one instead.",
            Self::Network(_) => "No connection. Showing a basic outfit instead.",
        }
    }
}

/// Why model output could not be turned into a recommendation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    #[error("response has no SUMMARY line")]
    MissingSummary,

    #[error("response has no CLOTHING line")]
    MissingClothing,

    #[error("CLOTHING line lists no items")]
    EmptyClothing,
}
