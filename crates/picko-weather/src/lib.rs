//! Weather data for Picko
//!
//! Fetches current conditions and a two-day forecast from Open-Meteo and
//! resolves a place label via reverse geocoding.

pub mod geocode;
pub mod provider;
pub mod types;

pub use geocode::{reverse_geocode, UNKNOWN_LOCATION};
pub use provider::WeatherProvider;
pub use types::*;
