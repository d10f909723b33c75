//! Recommendation orchestrator.
//!
//! Per slot: cache check, then generate, parse, and cache on success. Any
//! generation or parse failure yields the rule-based fallback, which is never
//! cached so the next request tries the API again.

use picko_weather::WeatherSnapshot;

use crate::cache::RecommendationCache;
use crate::client::GenerationClient;
use crate::error::{CacheError, StoreError};
use crate::fallback::fallback;
use crate::parser::parse;
use crate::preferences::PreferencesStore;
use crate::prompt::build_prompt;
use crate::types::{
    clamp_age, ClothingStyle, DailyRecommendations, PreferencesUpdate, Slot,
    StructuredRecommendation, UserPreferences,
};

/// Errors from profile operations that persist state.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Produces clothing recommendations for weather snapshots.
#[derive(Clone)]
pub struct OutfitAdvisor {
    client: GenerationClient,
    cache: RecommendationCache,
    preferences: PreferencesStore,
}

impl OutfitAdvisor {
    pub fn new(
        client: GenerationClient,
        cache: RecommendationCache,
        preferences: PreferencesStore,
    ) -> Self {
        Self {
            client,
            cache,
            preferences,
        }
    }

    pub fn cache(&self) -> &RecommendationCache {
        &self.cache
    }

    pub fn preferences(&self) -> &PreferencesStore {
        &self.preferences
    }

    /// Recommendation for one slot. Always returns something.
    pub async fn get_recommendation(
        &self,
        slot: Slot,
        snapshot: &WeatherSnapshot,
        age: u8,
        style: ClothingStyle,
    ) -> StructuredRecommendation {
        if let Some(cached) = self.cache.get(slot).await {
            tracing::info!("Using cached {} recommendation", slot);
            return cached;
        }

        let prompt = build_prompt(snapshot, slot, clamp_age(age), style);

        let raw = match self.client.generate_text(&prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Generation failed for {}, using fallback: {}", slot, e);
                return fallback(snapshot, slot);
            }
        };

        let recommendation = match parse(&raw) {
            Ok(rec) => rec,
            Err(e) => {
                tracing::warn!("Unparseable {} recommendation, using fallback: {}", slot, e);
                return fallback(snapshot, slot);
            }
        };

        // A failed write only costs a future regeneration
        if let Err(e) = self.cache.set(slot, &recommendation).await {
            tracing::warn!("Failed to cache {} recommendation: {}", slot, e);
        }

        tracing::info!(
            "Generated {} recommendation with {} items",
            slot,
            recommendation.clothing_items.len()
        );
        recommendation
    }

    /// Today's and tomorrow's recommendations, fetched concurrently.
    pub async fn get_daily(
        &self,
        snapshot: &WeatherSnapshot,
        preferences: &UserPreferences,
    ) -> DailyRecommendations {
        let age = preferences.child_age;
        let style = preferences.clothing_style;

        let (today, tomorrow) = tokio::join!(
            self.get_recommendation(Slot::Today, snapshot, age, style),
            self.get_recommendation(Slot::Tomorrow, snapshot, age, style),
        );

        DailyRecommendations { today, tomorrow }
    }

    /// Load stored preferences and fetch both slots.
    pub async fn get_daily_for_profile(&self, snapshot: &WeatherSnapshot) -> DailyRecommendations {
        let preferences = self.preferences.load().await;
        self.get_daily(snapshot, &preferences).await
    }

    /// Apply a preferences change and drop cached recommendations.
    pub async fn update_preferences(
        &self,
        update: PreferencesUpdate,
    ) -> Result<UserPreferences, ProfileError> {
        let preferences = self.preferences.update(update).await?;
        self.cache.clear_all().await?;
        Ok(preferences)
    }

    /// Save first-launch answers and drop cached recommendations.
    pub async fn complete_setup(
        &self,
        age: u8,
        style: ClothingStyle,
    ) -> Result<UserPreferences, ProfileError> {
        let preferences = self.preferences.complete_setup(age, style).await?;
        self.cache.clear_all().await?;
        Ok(preferences)
    }

    /// Forget the profile and every cached recommendation.
    pub async fn reset_profile(&self) -> Result<(), ProfileError> {
        self.preferences.reset().await?;
        self.cache.clear_all().await?;
        Ok(())
    }
}
