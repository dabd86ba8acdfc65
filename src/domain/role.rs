//! User role value object.

use super::errors::ValidationError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Role names allowed into the manager panel.
const BACK_OFFICE_ROLES: [&str; 2] = ["ADMIN", "MANAGER"];

/// A user's role as the backend sends it.
///
/// Some endpoints return the role as a bare string, others as an object with a
/// `roleName` field. Both shapes are resolved here so the rest of the code only
/// calls [`Role::name`].
///
/// # Example
///
/// ```
/// use sora_storefront_core::domain::Role;
///
/// let plain: Role = serde_json::from_str("\"MANAGER\"").unwrap();
/// let named: Role = serde_json::from_str(r#"{"roleName": "MANAGER"}"#).unwrap();
/// assert_eq!(plain.name(), named.name());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Role {
    PlainName(String),
    NamedRole {
        #[serde(rename = "roleName")]
        role_name: String,
    },
}

impl Role {
    /// Create a plain role, rejecting blank names.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyRole);
        }
        Ok(Self::PlainName(name))
    }

    pub fn name(&self) -> &str {
        match self {
            Self::PlainName(name) => name,
            Self::NamedRole { role_name } => role_name,
        }
    }

    /// Whether the role may open the manager panel.
    pub fn has_back_office_access(&self) -> bool {
        let name = self.name().trim();
        BACK_OFFICE_ROLES
            .iter()
            .any(|role| role.eq_ignore_ascii_case(name))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRole {
    Plain(String),
    Named {
        #[serde(rename = "roleName")]
        role_name: String,
    },
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let role = match RawRole::deserialize(deserializer)? {
            RawRole::Plain(name) => Role::PlainName(name),
            RawRole::Named { role_name } => Role::NamedRole { role_name },
        };

        if role.name().trim().is_empty() {
            return Err(serde::de::Error::custom(ValidationError::EmptyRole));
        }

        Ok(role)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
