//! Persistence seam for user preferences.

use super::UserPreferences;
use crate::error::{PreferenceError, PreferenceResult};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Where preferences are persisted.
///
/// The storefront backs this with its REST API; tests and the CLI use
/// [`InMemoryPreferenceStore`].
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Load the saved preferences, or `None` if nothing was saved yet.
    async fn load(&self) -> PreferenceResult<Option<UserPreferences>>;

    /// Replace the saved preferences.
    async fn save(&self, preferences: &UserPreferences) -> PreferenceResult<()>;
}

/// Process-local store keeping the serialized record in memory.
///
/// Cloning shares the record.
#[derive(Clone, Default)]
pub struct InMemoryPreferenceStore {
    record: Arc<Mutex<Option<String>>>,
    saves: Arc<AtomicUsize>,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `preferences`.
    pub fn with_preferences(preferences: &UserPreferences) -> PreferenceResult<Self> {
        let store = Self::new();
        store.write(preferences)?;
        Ok(store)
    }

    /// Number of successful saves since creation.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// The currently stored record, decoded.
    pub fn stored(&self) -> PreferenceResult<Option<UserPreferences>> {
        let record = self
            .record
            .lock()
            .map_err(|_| PreferenceError::Store("preference record lock poisoned".to_string()))?;

        match record.as_deref() {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    fn write(&self, preferences: &UserPreferences) -> PreferenceResult<()> {
        let json = serde_json::to_string(preferences)?;
        let mut record = self
            .record
            .lock()
            .map_err(|_| PreferenceError::Store("preference record lock poisoned".to_string()))?;
        *record = Some(json);
        Ok(())
    }
}

#[async_trait]
impl PreferenceStore for InMemoryPreferenceStore {
    async fn load(&self) -> PreferenceResult<Option<UserPreferences>> {
        self.stored()
    }

    async fn save(&self, preferences: &UserPreferences) -> PreferenceResult<()> {
        self.write(preferences)?;
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
