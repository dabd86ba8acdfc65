//! Phone number normalization, validation and masking.
//!
//! Numbers are treated as Russian: a canonical number is eleven digits
//! starting with the country code `7`. Domestic numbers written with a
//! leading `8` are rewritten to the international form.
//!
//! Nothing in here fails on malformed input. Absent values render as
//! [`PHONE_PLACEHOLDER`], unrecognized values render as they were typed.

use super::errors::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Text shown in place of a phone number the user never provided.
pub const PHONE_PLACEHOLDER: &str = "Не указан";

/// Length of a canonical number: country code plus ten subscriber digits.
const CANONICAL_LEN: usize = 11;

static CANONICAL_PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^7[0-9]{10}$").expect("Failed to compile phone regex"));

/// Characters dropped before a number is inspected.
fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | '-' | '+')
}

/// Strip separators and force the `7` country code.
///
/// Characters outside the separator set (letters, dots) are kept as-is.
fn to_international(raw: &str) -> String {
    let cleaned: String = raw.chars().filter(|c| !is_separator(*c)).collect();

    match cleaned.strip_prefix('8') {
        Some(rest) => format!("7{}", rest),
        None if cleaned.starts_with('7') => cleaned,
        None => format!("7{}", cleaned),
    }
}

/// A phone number rewritten to start with `7` and at least eleven characters long.
///
/// Values longer than eleven characters are kept untruncated; use
/// [`NormalizedPhone::is_canonical`] to tell a proper number from a longer one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedPhone(String);

impl NormalizedPhone {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of characters in the normalized value, never fewer than eleven.
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    /// True when the value is exactly `7` followed by ten digits.
    pub fn is_canonical(&self) -> bool {
        CANONICAL_PHONE_REGEX.is_match(&self.0)
    }

    /// Last `n` characters of the value.
    fn tail(&self, n: usize) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        chars[chars.len().saturating_sub(n)..].iter().collect()
    }
}

impl fmt::Display for NormalizedPhone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A phone number with everything but its trailing digits hidden.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MaskedPhone(String);

impl MaskedPhone {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for MaskedPhone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalize free-form input into a phone number candidate.
///
/// Returns `None` for absent or empty input, and for input that is still
/// shorter than eleven characters once rewritten. Callers are expected to
/// fall back to showing the raw input in that case.
pub fn normalize(raw: Option<&str>) -> Option<NormalizedPhone> {
    let raw = raw.filter(|s| !s.is_empty())?;
    let candidate = to_international(raw);

    if candidate.chars().count() < CANONICAL_LEN {
        return None;
    }

    Some(NormalizedPhone(candidate))
}

/// Mask a normalized number.
///
/// Canonical numbers keep their last two digits: `+7 (***) ***-**90`.
/// Longer values keep their last four: `+7 (***) ***-7890`.
pub fn mask(phone: &NormalizedPhone) -> MaskedPhone {
    if phone.char_count() > CANONICAL_LEN {
        MaskedPhone(format!("+7 (***) ***-{}", phone.tail(4)))
    } else {
        MaskedPhone(format!("+7 (***) ***-**{}", phone.tail(2)))
    }
}

/// Render a phone number for display.
///
/// # Example
///
/// ```
/// use sora_storefront_core::domain::phone::mask_phone;
///
/// assert_eq!(mask_phone(Some("8 (912) 345-67-90")), "+7 (***) ***-**90");
/// assert_eq!(mask_phone(Some("12-34")), "12-34");
/// assert_eq!(mask_phone(None), "Не указан");
/// ```
pub fn mask_phone(raw: Option<&str>) -> String {
    match raw {
        None | Some("") => PHONE_PLACEHOLDER.to_string(),
        Some(value) => match normalize(Some(value)) {
            Some(phone) => mask(&phone).into_inner(),
            None => value.to_string(),
        },
    }
}

/// Check whether the input is a canonical Russian phone number once normalized.
pub fn is_valid(raw: Option<&str>) -> bool {
    match raw {
        None | Some("") => false,
        Some(value) => CANONICAL_PHONE_REGEX.is_match(&to_international(value)),
    }
}

/// A validated Russian phone number, stored in its canonical eleven-digit form.
///
/// # Example
///
/// ```
/// use sora_storefront_core::domain::RussianPhone;
///
/// let phone = RussianPhone::new("8 (912) 345-67-90").unwrap();
/// assert_eq!(phone.as_str(), "79123456790");
/// assert_eq!(phone.masked().as_str(), "+7 (***) ***-**90");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RussianPhone(String);

impl RussianPhone {
    /// Create a new RussianPhone from user input.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidPhone` with the original input if it does
    /// not normalize to `7` followed by ten digits.
    pub fn new(phone: impl Into<String>) -> Result<Self, ValidationError> {
        let phone = phone.into();

        if !is_valid(Some(&phone)) {
            return Err(ValidationError::InvalidPhone(phone));
        }

        Ok(Self(to_international(&phone)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// The ten digits after the country code.
    pub fn subscriber_number(&self) -> &str {
        &self.0[1..]
    }

    pub fn masked(&self) -> MaskedPhone {
        mask(&NormalizedPhone(self.0.clone()))
    }

    /// Full unmasked presentation, `+7 (912) 345-67-90`.
    pub fn formatted(&self) -> String {
        let d = self.subscriber_number();
        format!(
            "+7 ({}) {}-{}-{}",
            &d[0..3],
            &d[3..6],
            &d[6..8],
            &d[8..10]
        )
    }
}

impl Serialize for RussianPhone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RussianPhone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        RussianPhone::new(s).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for RussianPhone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A phone number on screen that the user can reveal and hide again.
///
/// The reveal flag lives only as long as the value; it is never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhoneDisplay {
    raw: Option<String>,
    revealed: bool,
}

impl PhoneDisplay {
    /// Start hidden.
    pub fn new(raw: Option<String>) -> Self {
        Self {
            raw,
            revealed: false,
        }
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn toggle(&mut self) {
        self.revealed = !self.revealed;
    }

    pub fn set_revealed(&mut self, revealed: bool) {
        self.revealed = revealed;
    }

    /// The text to render in the current state.
    pub fn text(&self) -> String {
        match self.raw.as_deref() {
            Some(raw) if self.revealed && !raw.is_empty() => raw.to_string(),
            raw => mask_phone(raw),
        }
    }
}

impl From<&str> for PhoneDisplay {
    fn from(raw: &str) -> Self {
        Self::new(Some(raw.to_string()))
    }
}
