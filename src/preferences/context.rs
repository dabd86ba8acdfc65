//! Shared preference state with debounced persistence.

use super::{PreferenceStore, Theme, UserPreferences};
use crate::config::Config;
use crate::domain::{CurrencyCode, CurrencyFormatter};
use crate::error::PreferenceResult;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// The user's display preferences, shared by everything that renders.
///
/// Changes apply in memory immediately. Persisting waits for the debounce
/// delay; a newer change inside that window replaces the pending save, so a
/// burst of changes is written once with the final value. Saves never overlap,
/// so an older snapshot cannot land after a newer one.
///
/// Debounced saves run on the ambient tokio runtime. Outside a runtime,
/// changes stay in memory until [`Self::flush`]. A save still waiting for its
/// debounce when the runtime shuts down is lost; call [`Self::shutdown`] first.
///
/// Cloning is cheap and every clone sees the same state.
#[derive(Clone)]
pub struct PreferencesContext {
    state: Arc<RwLock<UserPreferences>>,
    store: Arc<dyn PreferenceStore>,
    generation: Arc<AtomicU64>,
    save_lock: Arc<Mutex<()>>,
    pending: Arc<StdMutex<Option<JoinHandle<()>>>>,
    debounce: Duration,
    formatter: CurrencyFormatter,
}

impl PreferencesContext {
    /// Load the persisted preferences, falling back to `defaults`.
    ///
    /// A store failure is logged and treated like a missing record.
    pub async fn init(
        store: Arc<dyn PreferenceStore>,
        defaults: UserPreferences,
        debounce: Duration,
    ) -> Self {
        let initial = match store.load().await {
            Ok(Some(saved)) => {
                debug!("Loaded saved preferences: {:?}", saved);
                saved
            }
            Ok(None) => {
                debug!("No saved preferences, using defaults");
                defaults
            }
            Err(e) => {
                warn!("Failed to load preferences, using defaults: {}", e);
                defaults
            }
        };

        Self {
            state: Arc::new(RwLock::new(initial)),
            store,
            generation: Arc::new(AtomicU64::new(0)),
            save_lock: Arc::new(Mutex::new(())),
            pending: Arc::new(StdMutex::new(None)),
            debounce,
            formatter: CurrencyFormatter::default(),
        }
    }

    /// Build a context from configuration: default currency, debounce delay
    /// and exchange rates all come from `config`.
    pub async fn from_config(store: Arc<dyn PreferenceStore>, config: &Config) -> Self {
        let defaults = UserPreferences::new(Theme::default(), config.default_currency);

        Self::init(store, defaults, config.preference_debounce())
            .await
            .with_formatter(CurrencyFormatter::new(config.exchange_rates()))
    }

    /// Use `formatter` (and its exchange rates) for [`Self::format_price`].
    pub fn with_formatter(mut self, formatter: CurrencyFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    pub async fn current(&self) -> UserPreferences {
        *self.state.read().await
    }

    pub async fn theme(&self) -> Theme {
        self.state.read().await.theme
    }

    pub async fn currency(&self) -> CurrencyCode {
        self.state.read().await.currency
    }

    pub async fn set_theme(&self, theme: Theme) {
        self.update(|prefs| prefs.theme = theme).await;
    }

    /// Flip between light and dark, returning the new theme.
    pub async fn toggle_theme(&self) -> Theme {
        self.update(|prefs| prefs.theme = prefs.theme.toggled())
            .await
            .theme
    }

    pub async fn set_currency(&self, currency: CurrencyCode) {
        self.update(|prefs| prefs.currency = currency).await;
    }

    /// Render a ruble amount in the user's currency.
    pub async fn format_price(&self, amount_in_base: f64) -> String {
        let currency = self.currency().await;
        self.formatter.format(amount_in_base, currency)
    }

    /// Whether the latest debounced save has not finished yet.
    pub fn has_pending_save(&self) -> bool {
        match self.pending.lock() {
            Ok(pending) => pending.as_ref().is_some_and(|handle| !handle.is_finished()),
            Err(_) => false,
        }
    }

    /// Persist the current preferences now, dropping any pending save.
    ///
    /// Waits for a save already in progress so the value written here is the
    /// last one the store sees.
    pub async fn flush(&self) -> PreferenceResult<()> {
        self.generation.fetch_add(1, Ordering::SeqCst);

        let _guard = self.save_lock.lock().await;
        let snapshot = self.current().await;
        self.store.save(&snapshot).await
    }

    /// Cancel the pending debounced save and persist the current value.
    pub async fn shutdown(&self) -> PreferenceResult<()> {
        let pending = self.pending.lock().ok().and_then(|mut pending| pending.take());
        if let Some(handle) = pending {
            handle.abort();
        }

        self.flush().await
    }

    async fn update<F>(&self, apply: F) -> UserPreferences
    where
        F: FnOnce(&mut UserPreferences),
    {
        let (before, after) = {
            let mut state = self.state.write().await;
            let before = *state;
            apply(&mut *state);
            (before, *state)
        };

        if before != after {
            self.schedule_save();
        }

        after
    }

    fn schedule_save(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                warn!(
                    "No tokio runtime, preference change {} kept in memory until flush",
                    generation
                );
                return;
            }
        };

        let ctx = self.clone();
        let handle = runtime.spawn(async move {
            tokio::time::sleep(ctx.debounce).await;
            ctx.save_if_current(generation).await;
        });

        if let Ok(mut pending) = self.pending.lock() {
            *pending = Some(handle);
        }
    }

    /// Save the current value unless a newer change or flush came after `generation`.
    async fn save_if_current(&self, generation: u64) {
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("Preference save {} superseded", generation);
            return;
        }

        let _guard = self.save_lock.lock().await;

        // A flush may have run while we waited for the lock
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("Preference save {} superseded", generation);
            return;
        }

        let snapshot = self.current().await;
        match self.store.save(&snapshot).await {
            Ok(()) => debug!("Saved preferences: {:?}", snapshot),
            Err(e) => warn!("Failed to save preferences: {}", e),
        }
    }
}
