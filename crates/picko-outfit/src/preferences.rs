//! Persisted child profile.

use std::sync::Arc;

use crate::error::StoreError;
use crate::store::{KeyValueStore, StoreResult};
use crate::types::{clamp_age, ClothingStyle, PreferencesUpdate, UserPreferences};

const PREFERENCES_KEY: &str = "user_preferences";

/// Reads and writes [`UserPreferences`] through a key-value store.
#[derive(Clone)]
pub struct PreferencesStore {
    store: Arc<dyn KeyValueStore>,
}

impl PreferencesStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    async fn blocking<T, F>(&self, op: F) -> StoreResult<T>
    where
        F: FnOnce(&dyn KeyValueStore) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || op(store.as_ref()))
            .await
            .map_err(|e| StoreError::Task(e.to_string()))?
    }

    /// Saved preferences, or defaults when nothing readable is stored.
    pub async fn load(&self) -> UserPreferences {
        match self.blocking(|store| store.get(PREFERENCES_KEY)).await {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable preferences: {}", e);
                UserPreferences::default()
            }),
            Ok(None) => UserPreferences::default(),
            Err(e) => {
                tracing::warn!("Error loading preferences: {}", e);
                UserPreferences::default()
            }
        }
    }

    /// Persist preferences as given, with the age clamped.
    pub async fn save(&self, preferences: UserPreferences) -> StoreResult<UserPreferences> {
        let preferences = UserPreferences {
            child_age: clamp_age(preferences.child_age),
            ..preferences
        };
        let json =
            serde_json::to_string(&preferences).map_err(|e| StoreError::Other(e.to_string()))?;
        self.blocking(move |store| store.set(PREFERENCES_KEY, &json)).await?;
        Ok(preferences)
    }

    /// Merge a partial update into the stored preferences.
    pub async fn update(&self, update: PreferencesUpdate) -> StoreResult<UserPreferences> {
        let current = self.load().await;
        self.save(current.apply(update)).await
    }

    /// Record the first-launch answers and mark setup done.
    pub async fn complete_setup(
        &self,
        child_age: u8,
        clothing_style: ClothingStyle,
    ) -> StoreResult<UserPreferences> {
        self.save(UserPreferences {
            child_age,
            clothing_style,
            has_completed_setup: true,
        })
        .await
    }

    /// Forget the stored profile.
    pub async fn reset(&self) -> StoreResult<()> {
        self.blocking(|store| store.remove(PREFERENCES_KEY)).await
    }
}
