//! Error types for the storefront core.
//!
//! Domain validation errors live in [`crate::domain::errors`]; the types here
//! cover configuration and preference persistence.

use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

/// Errors that can occur while loading or saving user preferences.
#[derive(Error, Debug)]
pub enum PreferenceError {
    /// The backing store rejected the operation
    #[error("Preference store error: {0}")]
    Store(String),

    /// Stored preferences could not be (de)serialized
    #[error("Preference serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Convenience type alias for Results with PreferenceError
pub type PreferenceResult<T> = Result<T, PreferenceError>;
