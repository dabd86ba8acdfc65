//! Price conversion and formatting.
//!
//! All amounts are stored in rubles. Conversion only ever changes what is
//! displayed, the stored amount is never touched.

use super::errors::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rubles to dollars. Static until a live rate source exists.
pub const DEFAULT_RUB_TO_USD: f64 = 0.011;

/// A currency the storefront can display prices in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrencyCode {
    /// Russian ruble, the base currency.
    #[default]
    Rub,
    /// US dollar.
    Usd,
}

impl CurrencyCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rub => "RUB",
            Self::Usd => "USD",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Usd => "$",
            Self::Rub => "₽",
        }
    }

    /// Parse a code the way the storefront front end treats it: anything
    /// other than `USD` is shown in rubles.
    pub fn from_code_lossy(code: &str) -> Self {
        if code.trim().eq_ignore_ascii_case("USD") {
            Self::Usd
        } else {
            Self::Rub
        }
    }
}

impl FromStr for CurrencyCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RUB" => Ok(Self::Rub),
            "USD" => Ok(Self::Usd),
            _ => Err(ValidationError::UnsupportedCurrency(s.to_string())),
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exchange rates from the base currency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExchangeRates {
    /// Dollars per ruble.
    pub rub_to_usd: f64,
}

impl ExchangeRates {
    pub fn new(rub_to_usd: f64) -> Self {
        Self { rub_to_usd }
    }

    /// Multiplier applied to a ruble amount to display it in `target`.
    pub fn rate_for(&self, target: CurrencyCode) -> f64 {
        match target {
            CurrencyCode::Rub => 1.0,
            CurrencyCode::Usd => self.rub_to_usd,
        }
    }
}

impl Default for ExchangeRates {
    fn default() -> Self {
        Self::new(DEFAULT_RUB_TO_USD)
    }
}

/// Converts and renders ruble amounts with a fixed set of exchange rates.
///
/// # Example
///
/// ```
/// use sora_storefront_core::domain::{CurrencyCode, CurrencyFormatter, ExchangeRates};
///
/// let formatter = CurrencyFormatter::new(ExchangeRates::new(0.02));
/// assert_eq!(formatter.format(1500.0, CurrencyCode::Usd), "$30.00");
/// assert_eq!(formatter.format(1500.0, CurrencyCode::Rub), "1 500 ₽");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CurrencyFormatter {
    rates: ExchangeRates,
}

impl CurrencyFormatter {
    pub fn new(rates: ExchangeRates) -> Self {
        Self { rates }
    }

    pub fn rates(&self) -> ExchangeRates {
        self.rates
    }

    /// Convert a ruble amount into `target`. Rubles convert to themselves.
    pub fn convert(&self, amount_in_base: f64, target: CurrencyCode) -> f64 {
        match target {
            CurrencyCode::Rub => amount_in_base,
            CurrencyCode::Usd => amount_in_base * self.rates.rate_for(target),
        }
    }

    /// Convert a ruble amount and render it for display.
    ///
    /// Rubles show whole units grouped by spaces with a trailing `₽`.
    /// Dollars show cents, grouped by commas, behind a leading `$`.
    pub fn format(&self, amount_in_base: f64, currency: CurrencyCode) -> String {
        let converted = self.convert(amount_in_base, currency);

        match currency {
            CurrencyCode::Rub => {
                format!("{} {}", render_fixed(converted, 0, ' ', ','), currency.symbol())
            }
            CurrencyCode::Usd => {
                let rendered = render_fixed(converted, 2, ',', '.');
                match rendered.strip_prefix('-') {
                    Some(positive) => format!("-{}{}", currency.symbol(), positive),
                    None => format!("{}{}", currency.symbol(), rendered),
                }
            }
        }
    }

    pub fn symbol(&self, currency: CurrencyCode) -> &'static str {
        currency.symbol()
    }
}

/// Round to `decimals` places (half away from zero) and group the whole part.
///
/// Rounding works on the shortest decimal form of the amount, the same digits
/// `Intl.NumberFormat` starts from, so `1.265` becomes `1.27` even though the
/// nearest `f64` sits just below it. NaN and infinities render as zero.
fn render_fixed(
    amount: f64,
    decimals: usize,
    group_separator: char,
    decimal_point: char,
) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let (whole, fraction) = round_decimal(&amount.abs().to_string(), decimals);

    let is_zero = whole.bytes().chain(fraction.bytes()).all(|b| b == b'0');
    let grouped = group_digits(&whole, group_separator);
    let mut out = String::with_capacity(grouped.len() + decimals + 2);

    if amount < 0.0 && !is_zero {
        out.push('-');
    }
    out.push_str(&grouped);

    if decimals > 0 {
        out.push(decimal_point);
        out.push_str(&fraction);
    }

    out
}

/// Round a plain non-negative decimal string (`"1234.5678"`) to `decimals`
/// fractional digits, half away from zero. Returns the whole and fractional
/// digits separately.
fn round_decimal(repr: &str, decimals: usize) -> (String, String) {
    let (whole, fraction) = repr.split_once('.').unwrap_or((repr, ""));

    let mut digits: Vec<u8> = whole
        .bytes()
        .chain(fraction.bytes().chain(std::iter::repeat(b'0')).take(decimals))
        .map(|b| b - b'0')
        .collect();

    let round_up = fraction
        .as_bytes()
        .get(decimals)
        .is_some_and(|&next| next >= b'5');

    if round_up {
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == 9 {
                *digit = 0;
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, 1);
        }
    }

    let split = digits.len() - decimals;
    let render = |ds: &[u8]| ds.iter().map(|d| char::from(b'0' + d)).collect::<String>();
    (render(&digits[..split]), render(&digits[split..]))
}

fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }

    out
}

/// Convert with the default exchange rates.
pub fn convert_price(amount_in_base: f64, currency: CurrencyCode) -> f64 {
    CurrencyFormatter::default().convert(amount_in_base, currency)
}

/// Format with the default exchange rates.
pub fn format_price(amount_in_base: f64, currency: CurrencyCode) -> String {
    CurrencyFormatter::default().format(amount_in_base, currency)
}

pub fn currency_symbol(currency: CurrencyCode) -> &'static str {
    currency.symbol()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_rub_is_identity() {
        for amount in [0.0, 1.0, 999.99, 1000.0, 123_456_789.5] {
            assert_eq!(convert_price(amount, CurrencyCode::Rub), amount);
        }
    }

    #[test]
    fn test_convert_usd() {
        let converted = convert_price(1000.0, CurrencyCode::Usd);
        assert!((converted - 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_format_rub() {
        assert_eq!(format_price(1000.0, CurrencyCode::Rub), "1 000 ₽");
        assert_eq!(format_price(0.0, CurrencyCode::Rub), "0 ₽");
        assert_eq!(format_price(999.0, CurrencyCode::Rub), "999 ₽");
        assert_eq!(format_price(1_234_567.0, CurrencyCode::Rub), "1 234 567 ₽");
    }

    #[test]
    fn test_format_rub_rounds_to_whole() {
        assert_eq!(format_price(1499.5, CurrencyCode::Rub), "1 500 ₽");
        assert_eq!(format_price(1499.4, CurrencyCode::Rub), "1 499 ₽");
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_price(1000.0, CurrencyCode::Usd), "$11.00");
        assert_eq!(format_price(0.0, CurrencyCode::Usd), "$0.00");
        assert_eq!(format_price(100_000_000.0, CurrencyCode::Usd), "$1,100,000.00");
    }

    #[test]
    fn test_format_negative_and_non_finite() {
        assert_eq!(format_price(-2500.0, CurrencyCode::Rub), "-2 500 ₽");
        assert_eq!(format_price(-1000.0, CurrencyCode::Usd), "-$11.00");
        assert_eq!(format_price(f64::NAN, CurrencyCode::Rub), "0 ₽");
        assert_eq!(format_price(f64::INFINITY, CurrencyCode::Usd), "$0.00");
    }

    #[test]
    fn test_custom_rate() {
        let formatter = CurrencyFormatter::new(ExchangeRates::new(0.0125));
        assert_eq!(formatter.format(1000.0, CurrencyCode::Usd), "$12.50");
        assert_eq!(formatter.rates().rub_to_usd, 0.0125);
    }

    #[test]
    fn test_currency_symbol() {
        assert_eq!(currency_symbol(CurrencyCode::Usd), "$");
        assert_eq!(currency_symbol(CurrencyCode::Rub), "₽");
    }

    #[test]
    fn test_default_currency_is_rub() {
        assert_eq!(CurrencyCode::default(), CurrencyCode::Rub);
    }

    #[test]
    fn test_currency_code_parsing() {
        assert_eq!("USD".parse::<CurrencyCode>().unwrap(), CurrencyCode::Usd);
        assert_eq!(" rub ".parse::<CurrencyCode>().unwrap(), CurrencyCode::Rub);
        assert_eq!(
            "EUR".parse::<CurrencyCode>().unwrap_err(),
            ValidationError::UnsupportedCurrency("EUR".to_string())
        );
    }

    #[test]
    fn test_currency_code_lossy() {
        assert_eq!(CurrencyCode::from_code_lossy("usd"), CurrencyCode::Usd);
        assert_eq!(CurrencyCode::from_code_lossy("EUR"), CurrencyCode::Rub);
        assert_eq!(CurrencyCode::from_code_lossy(""), CurrencyCode::Rub);
    }

    #[test]
    fn test_currency_code_serialization() {
        assert_eq!(serde_json::to_string(&CurrencyCode::Usd).unwrap(), "\"USD\"");
        let code: CurrencyCode = serde_json::from_str("\"RUB\"").unwrap();
        assert_eq!(code, CurrencyCode::Rub);
    }

    #[test]
    fn test_format_usd_rounds_from_shortest_decimal() {
        // Both products land within a rounding error of a half cent
        assert_eq!(format_price(115.0, CurrencyCode::Usd), "$1.27");
        assert_eq!(format_price(85.0, CurrencyCode::Usd), "$0.93");
    }

    #[test]
    fn test_round_decimal() {
        assert_eq!(round_decimal("1.265", 2), ("1".to_string(), "27".to_string()));
        assert_eq!(
            round_decimal("0.9349999999999999", 2),
            ("0".to_string(), "93".to_string())
        );
        assert_eq!(round_decimal("9.995", 2), ("10".to_string(), "00".to_string()));
        assert_eq!(round_decimal("999.5", 0), ("1000".to_string(), String::new()));
        assert_eq!(round_decimal("11", 2), ("11".to_string(), "00".to_string()));
        assert_eq!(round_decimal("0.004", 2), ("0".to_string(), "00".to_string()));
    }

    #[test]
    fn test_negative_amount_rounding_to_zero_has_no_sign() {
        let formatter = CurrencyFormatter::new(ExchangeRates::new(0.001));
        assert_eq!(formatter.format(-1.0, CurrencyCode::Usd), "$0.00");
        assert_eq!(format_price(-0.4, CurrencyCode::Rub), "0 ₽");
    }

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits("1", ' '), "1");
        assert_eq!(group_digits("123", ' '), "123");
        assert_eq!(group_digits("1234", ','), "1,234");
        assert_eq!(group_digits("123456", ','), "123,456");
    }
}
