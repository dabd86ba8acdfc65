//! Domain validation errors.

use std::fmt;

/// Errors that can occur during domain value object validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided phone number is not a canonical Russian number.
    InvalidPhone(String),

    /// The provided currency code is not one the storefront displays.
    UnsupportedCurrency(String),

    /// The provided role name is empty.
    EmptyRole,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPhone(phone) => write!(f, "Invalid phone number: {}", phone),
            Self::UnsupportedCurrency(code) => write!(f, "Unsupported currency: {}", code),
            Self::EmptyRole => write!(f, "Role name cannot be empty"),
        }
    }
}

impl std::error::Error for ValidationError {}
