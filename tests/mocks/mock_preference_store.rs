use async_trait::async_trait;
use sora_storefront_core::error::{PreferenceError, PreferenceResult};
use sora_storefront_core::preferences::{PreferenceStore, UserPreferences};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock preference store for testing.
///
/// Records every saved value and can be switched into a failing mode.
#[allow(dead_code)]
#[derive(Clone)]
pub struct MockPreferenceStore {
    saved: Arc<Mutex<Vec<UserPreferences>>>,
    initial: Option<UserPreferences>,
    failing: Arc<AtomicBool>,
    next_save_delay: Arc<Mutex<Option<Duration>>>,
    call_counts: Arc<Mutex<HashMap<String, usize>>>,
}

#[allow(dead_code)]
impl MockPreferenceStore {
    pub fn new() -> Self {
        Self {
            saved: Arc::new(Mutex::new(Vec::new())),
            initial: None,
            failing: Arc::new(AtomicBool::new(false)),
            next_save_delay: Arc::new(Mutex::new(None)),
            call_counts: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn with_initial(preferences: UserPreferences) -> Self {
        Self {
            initial: Some(preferences),
            ..Self::new()
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Make the next `save` take `delay` before recording its value.
    pub fn delay_next_save(&self, delay: Duration) {
        *self.next_save_delay.lock().unwrap() = Some(delay);
    }

    pub fn saved(&self) -> Vec<UserPreferences> {
        self.saved.lock().unwrap().clone()
    }

    pub fn get_call_count(&self, method: &str) -> usize {
        let counts = self.call_counts.lock().unwrap();
        *counts.get(method).unwrap_or(&0)
    }

    fn track_call(&self, method: &str) {
        let mut counts = self.call_counts.lock().unwrap();
        *counts.entry(method.to_string()).or_insert(0) += 1;
    }

    fn check_failing(&self) -> PreferenceResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PreferenceError::Store("backend unavailable".to_string()));
        }
        Ok(())
    }
}

impl Default for MockPreferenceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PreferenceStore for MockPreferenceStore {
    async fn load(&self) -> PreferenceResult<Option<UserPreferences>> {
        self.track_call("load");
        self.check_failing()?;

        let last_saved = self.saved.lock().unwrap().last().copied();
        Ok(last_saved.or(self.initial))
    }

    async fn save(&self, preferences: &UserPreferences) -> PreferenceResult<()> {
        self.track_call("save");
        self.check_failing()?;

        let delay = self.next_save_delay.lock().unwrap().take();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.saved.lock().unwrap().push(*preferences);
        Ok(())
    }
}
