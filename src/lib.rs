//! SORA TECH storefront core.
//!
//! The deterministic pieces behind the SORA TECH PC-components storefront:
//! how phone numbers are masked and validated, how ruble prices are converted
//! and rendered, and how a user's theme and currency preferences are held and
//! persisted.
//!
//! # Architecture
//!
//! - **domain**: Phone, currency and role value objects with pure helpers
//! - **preferences**: Theme/currency context with debounced persistence
//! - **config**: Configuration from environment variables
//! - **error**: Error types for configuration and preference storage

pub mod config;
pub mod domain;
pub mod error;
pub mod preferences;

pub use config::Config;
pub use domain::{
    convert_price, currency_symbol, format_price, is_valid, mask, mask_phone, normalize,
    CurrencyCode, CurrencyFormatter, ExchangeRates, MaskedPhone, NormalizedPhone, PhoneDisplay,
    Role, RussianPhone, ValidationError,
};
pub use error::{ConfigError, PreferenceError};
pub use preferences::{
    InMemoryPreferenceStore, PreferenceStore, PreferencesContext, Theme, UserPreferences,
};
