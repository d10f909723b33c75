//! Outfit recommendation pipeline for Picko.
//!
//! Turns a weather snapshot into a style- and age-personalized clothing
//! recommendation: prompt building, generation, parsing with a rule-based
//! fallback, and a 12-hour per-slot cache.

pub mod advisor;
pub mod cache;
pub mod client;
pub mod error;
pub mod fallback;
pub mod parser;
pub mod preferences;
pub mod prompt;
pub mod store;
pub mod types;

pub use advisor::{OutfitAdvisor, ProfileError};
pub use cache::RecommendationCache;
pub use client::GenerationClient;
pub use error::{CacheError, GenerationError, ParseFailure, StoreError};
pub use fallback::fallback;
pub use parser::parse;
pub use preferences::PreferencesStore;
pub use prompt::build_prompt;
pub use store::{KeyValueStore, MemoryStore, SqliteStore};
pub use types::*;
