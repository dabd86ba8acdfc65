//! Domain value objects and pure display helpers.
//!
//! Phone numbers, prices and roles are the values the storefront shows most.
//! Everything here is synchronous and free of I/O.

pub mod currency;
pub mod errors;
pub mod phone;
pub mod role;

pub use currency::{
    convert_price, currency_symbol, format_price, CurrencyCode, CurrencyFormatter, ExchangeRates,
};
pub use errors::ValidationError;
pub use phone::{
    is_valid, mask, mask_phone, normalize, MaskedPhone, NormalizedPhone, PhoneDisplay,
    RussianPhone, PHONE_PLACEHOLDER,
};
pub use role::Role;
