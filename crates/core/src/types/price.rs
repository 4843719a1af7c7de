//! Currency codes for price display.
//!
//! Amounts themselves are plain [`rust_decimal::Decimal`] values; the widget
//! never converts between currencies, it only needs to know how to label and
//! round an amount.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`CurrencyCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CurrencyCodeError {
    /// The input string is empty.
    #[error("currency code cannot be empty")]
    Empty,
    /// The input is not three ASCII letters.
    #[error("currency code must be three ASCII letters (got {0:?})")]
    Malformed(String),
}

/// ISO 4217 currency code, normalised to upper case.
///
/// ## Examples
///
/// ```
/// use embed_cart_core::CurrencyCode;
///
/// assert_eq!(CurrencyCode::parse("vnd").unwrap().as_str(), "VND");
/// assert!(CurrencyCode::parse("").is_err());
/// assert!(CurrencyCode::parse("DONG").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Length of every ISO 4217 alphabetic code.
    pub const LEN: usize = 3;

    /// Parse a `CurrencyCode` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or is not exactly three ASCII
    /// letters after trimming.
    pub fn parse(s: &str) -> Result<Self, CurrencyCodeError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(CurrencyCodeError::Empty);
        }

        if trimmed.len() != Self::LEN || !trimmed.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(CurrencyCodeError::Malformed(trimmed.to_owned()));
        }

        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Vietnamese dong, the widget's default currency.
    #[must_use]
    pub fn vnd() -> Self {
        Self("VND".to_owned())
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::vnd()
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = CurrencyCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = CurrencyCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl AsRef<str> for CurrencyCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
