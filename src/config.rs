//! Configuration management for the storefront core.
//!
//! Values are read from environment variables, with a `.env` file loaded
//! first when present. Every setting has a default.

use crate::domain::currency::DEFAULT_RUB_TO_USD;
use crate::domain::{CurrencyCode, ExchangeRates};
use crate::error::{ConfigError, ConfigResult};
use std::env;
use std::time::Duration;

/// Configuration for the storefront core.
#[derive(Debug, Clone)]
pub struct Config {
    /// Dollars per ruble (default: 0.011)
    pub usd_rate: f64,

    /// Currency used when the user has not picked one (default: RUB)
    pub default_currency: CurrencyCode,

    /// Delay before a preference change is persisted, in milliseconds (default: 500)
    pub preference_debounce_ms: u64,

    /// Log level (default: "error")
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `SORA_USD_RATE`: RUB to USD exchange rate, must be positive (default: 0.011)
    /// - `SORA_DEFAULT_CURRENCY`: `RUB` or `USD` (default: RUB)
    /// - `SORA_PREFERENCE_DEBOUNCE_MS`: Persist delay in milliseconds (default: 500)
    /// - `LOG_LEVEL`: Logging level (default: "error")
    pub fn from_env() -> ConfigResult<Self> {
        // dotenvy::dotenv() doesn't print to stdout
        let _ = dotenvy::dotenv();

        let usd_rate = Self::parse_env_f64("SORA_USD_RATE", DEFAULT_RUB_TO_USD)?;
        if !usd_rate.is_finite() || usd_rate <= 0.0 {
            return Err(ConfigError::InvalidValue {
                var: "SORA_USD_RATE".to_string(),
                reason: format!("Must be a positive number, got: {}", usd_rate),
            });
        }

        let default_currency = match env::var("SORA_DEFAULT_CURRENCY") {
            Ok(val) => val
                .parse::<CurrencyCode>()
                .map_err(|e| ConfigError::InvalidValue {
                    var: "SORA_DEFAULT_CURRENCY".to_string(),
                    reason: e.to_string(),
                })?,
            Err(_) => CurrencyCode::default(),
        };

        let preference_debounce_ms = Self::parse_env_u64("SORA_PREFERENCE_DEBOUNCE_MS", 500)?;

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "error".to_string());

        Ok(Config {
            usd_rate,
            default_currency,
            preference_debounce_ms,
            log_level,
        })
    }

    pub fn exchange_rates(&self) -> ExchangeRates {
        ExchangeRates::new(self.usd_rate)
    }

    pub fn preference_debounce(&self) -> Duration {
        Duration::from_millis(self.preference_debounce_ms)
    }

    /// Parse an environment variable as u64 with a default value.
    fn parse_env_u64(var_name: &str, default: u64) -> ConfigResult<u64> {
        match env::var(var_name) {
            Ok(val) => val.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }

    /// Parse an environment variable as f64 with a default value.
    fn parse_env_f64(var_name: &str, default: f64) -> ConfigResult<f64> {
        match env::var(var_name) {
            Ok(val) => val.trim().parse::<f64>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            usd_rate: DEFAULT_RUB_TO_USD,
            default_currency: CurrencyCode::Rub,
            preference_debounce_ms: 500,
            log_level: "error".to_string(),
        }
    }
}
