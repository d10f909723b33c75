//! Time-boxed recommendation cache, one entry per slot.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{CacheError, StoreError};
use crate::store::{KeyValueStore, StoreResult};
use crate::types::{Slot, StructuredRecommendation};

/// Entries older than this are dead.
pub const DEFAULT_TTL_MS: i64 = 12 * 60 * 60 * 1000;

const TODAY_KEY: &str = "picko_today_recommendation";
const TOMORROW_KEY: &str = "picko_tomorrow_recommendation";

fn slot_key(slot: Slot) -> &'static str {
    match slot {
        Slot::Today => TODAY_KEY,
        Slot::Tomorrow => TOMORROW_KEY,
    }
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    data: StructuredRecommendation,
    /// Write time, epoch milliseconds
    timestamp: i64,
}

/// Recommendation cache over an injected key-value store.
#[derive(Clone)]
pub struct RecommendationCache {
    store: Arc<dyn KeyValueStore>,
    ttl_ms: i64,
}

impl RecommendationCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_ttl(store, DEFAULT_TTL_MS)
    }

    pub fn with_ttl(store: Arc<dyn KeyValueStore>, ttl_ms: i64) -> Self {
        Self { store, ttl_ms }
    }

    pub fn ttl_ms(&self) -> i64 {
        self.ttl_ms
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

    /// Cached recommendation for `slot`, if present and fresh.
    pub async fn get(&self, slot: Slot) -> Option<StructuredRecommendation> {
        self.get_at(slot, now_ms()).await
    }

    /// Like [`get`](Self::get) with an explicit clock value.
    ///
    /// Storage and decode errors are logged and reported as a miss. An
    /// expired entry is removed before returning `None`.
    pub async fn get_at(&self, slot: Slot, now_ms: i64) -> Option<StructuredRecommendation> {
        let key = slot_key(slot);
        let raw = match self.blocking(move |store| store.get(key)).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!("No cached recommendation for {}", slot);
                return None;
            }
            Err(e) => {
                tracing::warn!("Error reading cache for {}: {}", slot, e);
                return None;
            }
        };

        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Discarding unreadable cache entry for {}: {}", slot, e);
                return None;
            }
        };

        // A timestamp too far from now to subtract counts as expired
        let fresh = matches!(now_ms.checked_sub(entry.timestamp), Some(age) if age <= self.ttl_ms);
        if !fresh {
            tracing::debug!("Cached recommendation for {} expired", slot);
            if let Err(e) = self.blocking(move |store| store.remove(key)).await {
                tracing::warn!("Error removing expired cache entry for {}: {}", slot, e);
            }
            return None;
        }

        tracing::debug!("Cache hit for {}", slot);
        Some(entry.data)
    }

    /// Store a recommendation for `slot`, stamped with the current time.
    pub async fn set(
        &self,
        slot: Slot,
        recommendation: &StructuredRecommendation,
    ) -> Result<(), CacheError> {
        self.set_at(slot, recommendation, now_ms()).await
    }

    pub async fn set_at(
        &self,
        slot: Slot,
        recommendation: &StructuredRecommendation,
        now_ms: i64,
    ) -> Result<(), CacheError> {
        let entry = CacheEntry {
            data: recommendation.clone(),
            timestamp: now_ms,
        };
        let json = serde_json::to_string(&entry)?;
        let key = slot_key(slot);
        self.blocking(move |store| store.set(key, &json)).await?;
        Ok(())
    }

    /// Remove one slot's entry.
    pub async fn clear(&self, slot: Slot) -> Result<(), CacheError> {
        let key = slot_key(slot);
        self.blocking(move |store| store.remove(key)).await?;
        Ok(())
    }

    /// Remove both slots' entries.
    pub async fn clear_all(&self) -> Result<(), CacheError> {
        let keys = Slot::ALL.map(slot_key);
        self.blocking(move |store| store.remove_many(&keys)).await?;
        tracing::info!("Cleared recommendation cache");
        Ok(())
    }
}
