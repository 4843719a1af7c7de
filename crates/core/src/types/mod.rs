//! Core types for the cart widget.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod display;
pub mod id;
pub mod locale;
pub mod price;

pub use display::{ParsePositionError, ParseThemeError, Position, Theme};
pub use id::LineItemId;
pub use locale::{LocaleTag, LocaleTagError};
pub use price::{CurrencyCode, CurrencyCodeError};
