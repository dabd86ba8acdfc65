//! User display preferences: theme and currency.
//!
//! Preferences are held in an explicit [`PreferencesContext`] handed to every
//! consumer. The context loads the persisted value once and writes changes
//! back through a [`PreferenceStore`] after a debounce delay.

pub mod context;
pub mod store;

pub use context::PreferencesContext;
pub use store::{InMemoryPreferenceStore, PreferenceStore};

use crate::domain::CurrencyCode;
use serde::{Deserialize, Serialize};

/// Colour theme. Carried over the wire as a boolean "dark" flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "bool", into = "bool")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn from_dark_flag(dark: bool) -> Self {
        if dark {
            Self::Dark
        } else {
            Self::Light
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, Self::Dark)
    }

    pub fn toggled(&self) -> Self {
        Self::from_dark_flag(!self.is_dark())
    }
}

impl From<bool> for Theme {
    fn from(dark: bool) -> Self {
        Self::from_dark_flag(dark)
    }
}

impl From<Theme> for bool {
    fn from(theme: Theme) -> Self {
        theme.is_dark()
    }
}

/// Everything the storefront remembers about how a user wants things shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    #[serde(rename = "darkTheme")]
    pub theme: Theme,
    pub currency: CurrencyCode,
}

impl UserPreferences {
    pub fn new(theme: Theme, currency: CurrencyCode) -> Self {
        Self { theme, currency }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_toggle() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert!(Theme::from_dark_flag(true).is_dark());
    }

    #[test]
    fn test_preferences_serialization() {
        let prefs = UserPreferences::new(Theme::Dark, CurrencyCode::Usd);
        let json = serde_json::to_string(&prefs).unwrap();
        assert_eq!(json, r#"{"darkTheme":true,"currency":"USD"}"#);

        let parsed: UserPreferences =
            serde_json::from_str(r#"{"darkTheme":false,"currency":"RUB"}"#).unwrap();
        assert_eq!(parsed, UserPreferences::default());
    }
}
