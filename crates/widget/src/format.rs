//! Locale- and currency-aware price formatting.
//!
//! Digit grouping and the decimal mark come from `num-format`'s CLDR data;
//! currency symbols and minor-unit digits come from a small built-in table.
//! Formatting is cosmetic, so [`format_price`] never fails: anything the
//! formatter cannot handle degrades to the plain number.

use embed_cart_core::{CurrencyCode, LocaleTag};
use num_format::{Locale, ToFormattedString};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Errors from [`try_format_price`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("unsupported locale: {0}")]
    UnsupportedLocale(String),
    #[error("amount out of range: {0}")]
    OutOfRange(Decimal),
}

/// Symbol and minor-unit digits of a currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CurrencyInfo {
    symbol: &'static str,
    digits: u32,
}

/// Currencies with a dedicated symbol.
const CURRENCIES: &[(&str, CurrencyInfo)] = &[
    ("VND", CurrencyInfo { symbol: "₫", digits: 0 }),
    ("USD", CurrencyInfo { symbol: "$", digits: 2 }),
    ("EUR", CurrencyInfo { symbol: "€", digits: 2 }),
    ("GBP", CurrencyInfo { symbol: "£", digits: 2 }),
    ("JPY", CurrencyInfo { symbol: "¥", digits: 0 }),
    ("KRW", CurrencyInfo { symbol: "₩", digits: 0 }),
    ("CAD", CurrencyInfo { symbol: "CA$", digits: 2 }),
    ("AUD", CurrencyInfo { symbol: "A$", digits: 2 }),
    ("SGD", CurrencyInfo { symbol: "SGD", digits: 2 }),
    ("THB", CurrencyInfo { symbol: "฿", digits: 2 }),
];

/// Languages that write the symbol after the amount, separated by a space.
const SUFFIX_LANGUAGES: &[&str] = &[
    "vi", "de", "fr", "es", "it", "pt", "ru", "pl", "cs", "sv", "fi", "nb", "da",
];

/// Format `amount` for display, e.g. `650.000 ₫` for VND in `vi-VN`.
///
/// Falls back to the plain normalised number (`650000`) if the locale is
/// not supported.
#[must_use]
pub fn format_price(amount: Decimal, currency: &CurrencyCode, locale: &LocaleTag) -> String {
    try_format_price(amount, currency, locale).unwrap_or_else(|e| {
        tracing::debug!(%currency, %locale, "Price formatting fell back to plain number: {e}");
        plain_number(amount)
    })
}

/// Format `amount` for display.
///
/// # Errors
///
/// Returns `FormatError::UnsupportedLocale` if neither the full tag nor its
/// language has grouping data, or `FormatError::OutOfRange` if the integer
/// part does not fit the formatter.
pub fn try_format_price(
    amount: Decimal,
    currency: &CurrencyCode,
    locale: &LocaleTag,
) -> Result<String, FormatError> {
    let num_locale = resolve_locale(locale)?;
    let (symbol, digits) = currency_info(currency);

    let rounded = amount.round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero);
    let integer = rounded
        .trunc()
        .abs()
        .to_u128()
        .ok_or(FormatError::OutOfRange(amount))?;

    let mut number = integer.to_formatted_string(&num_locale);
    if digits > 0 {
        let scale = Decimal::from(10_u64.pow(digits));
        let fraction = (rounded.fract().abs() * scale)
            .round()
            .to_u64()
            .ok_or(FormatError::OutOfRange(amount))?;
        number.push_str(num_locale.decimal());
        number.push_str(&format!("{fraction:0width$}", width = digits as usize));
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    let formatted = if SUFFIX_LANGUAGES.contains(&locale.language().as_str()) {
        format!("{sign}{number}\u{a0}{symbol}")
    } else if symbol.chars().all(|c| c.is_ascii_alphabetic()) {
        format!("{sign}{symbol}\u{a0}{number}")
    } else {
        format!("{sign}{symbol}{number}")
    };

    Ok(formatted)
}

/// The amount without grouping or symbol.
#[must_use]
pub fn plain_number(amount: Decimal) -> String {
    amount.normalize().to_string()
}

/// Find grouping data for the full tag, then for its language alone.
fn resolve_locale(locale: &LocaleTag) -> Result<Locale, FormatError> {
    Locale::from_name(locale.as_str())
        .or_else(|_| Locale::from_name(locale.language()))
        .map_err(|_| FormatError::UnsupportedLocale(locale.to_string()))
}

/// Unknown codes are labelled with the code itself and two digits.
fn currency_info(currency: &CurrencyCode) -> (&str, u32) {
    CURRENCIES
        .iter()
        .find(|(code, _)| *code == currency.as_str())
        .map_or((currency.as_str(), 2), |(_, info)| (info.symbol, info.digits))
}
