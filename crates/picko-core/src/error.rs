//! Top-level error type for Picko.
//!
//! Wraps the per-crate errors and maps each to a short message that is safe
//! to show to a parent. Full detail stays in the `Display` output for logs.

use thiserror::Error;

use picko_outfit::{CacheError, GenerationError, ProfileError, StoreError};
use picko_weather::{LocationError, WeatherError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherError),

    #[error("Location error: {0}")]
    Location(#[from] LocationError),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl From<ProfileError> for AppError {
    fn from(e: ProfileError) -> Self {
        match e {
            ProfileError::Store(e) => AppError::Store(e),
            ProfileError::Cache(e) => AppError::Cache(e),
        }
    }
}

impl AppError {
    /// A non-technical message suitable for display.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Config(e) => e.user_message(),
            AppError::Location(LocationError::Unavailable(_)) => {
                "Location unknown. Pass --lat and --lon or set a default location."
            }
            AppError::Weather(WeatherError::Network(_)) => {
                "Unable to reach the weather service. Check your internet connection."
            }
            AppError::Weather(_) => {
                "Weather data is unavailable right now. Please try again later."
            }
            AppError::Generation(e) => e.user_message(),
            AppError::Store(_) | AppError::Cache(_) => {
                "Unable to access saved data. Try clearing the cache."
            }
            AppError::Io(_) => "A file operation failed. Please try again.",
            AppError::Other(_) => "An unexpected error occurred. Please try again.",
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
        }
    }
}
