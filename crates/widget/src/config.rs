//! Widget configuration resolved from the embedding script tag.
//!
//! The host page embeds the widget with a script tag such as
//!
//! ```html
//! <script src="embed.js" data-site-id="shop-42" data-theme="dark"
//!         data-position="top-left" data-currency="USD" data-locale="en-US"
//!         data-show-trigger="false" data-mount-target="cart-slot"></script>
//! ```
//!
//! The attributes are collected into [`EmbedAttributes`] and resolved into a
//! [`CartConfiguration`] in one step. Every field is defaulted at that point;
//! nothing downstream ever sees a partially filled configuration.
//!
//! # Environment Variables
//!
//! [`EmbedAttributes::from_env`] reads the same attributes from the process
//! environment (after loading `.env` if present):
//!
//! - `EMBED_CART_SITE_ID` - Site identifier (default: `default`)
//! - `EMBED_CART_THEME` - `light`, `dark`, `ocean` or `sunset` (default: `light`)
//! - `EMBED_CART_POSITION` - `bottom-right`, `bottom-left`, `top-right` or `top-left` (default: `bottom-right`)
//! - `EMBED_CART_CURRENCY` - ISO 4217 code (default: `VND`)
//! - `EMBED_CART_LOCALE` - Locale tag (default: `vi-VN`)
//! - `EMBED_CART_SHOW_TRIGGER` - Show the floating trigger (default: `true`)
//! - `EMBED_CART_MOUNT_TARGET` - Id of a host element for the compact trigger

use embed_cart_core::{CurrencyCode, LocaleTag, Position, Theme};
use thiserror::Error;
use tracing::warn;

/// Site identifier used when none is given.
pub const DEFAULT_SITE_IDENTIFIER: &str = "default";

/// Script tag attribute names.
pub mod attr {
    pub const SITE_ID: &str = "data-site-id";
    pub const THEME: &str = "data-theme";
    pub const POSITION: &str = "data-position";
    pub const CURRENCY: &str = "data-currency";
    pub const LOCALE: &str = "data-locale";
    pub const SHOW_TRIGGER: &str = "data-show-trigger";
    pub const MOUNT_TARGET: &str = "data-mount-target";
}

/// Configuration errors that can occur when resolving attributes strictly.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid attribute {0}: {1}")]
    InvalidAttribute(String, String),
    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),
}

/// Raw attribute values as found on the embedding script tag.
///
/// `None` means the attribute was absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbedAttributes {
    pub site_id: Option<String>,
    pub theme: Option<String>,
    pub position: Option<String>,
    pub currency: Option<String>,
    pub locale: Option<String>,
    pub show_trigger: Option<String>,
    pub mount_target: Option<String>,
}

impl EmbedAttributes {
    /// Collect attributes from `(name, value)` pairs.
    ///
    /// Names are matched case-insensitively, with or without the `data-`
    /// prefix. Unknown names are ignored; later duplicates win.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut attrs = Self::default();
        for (name, value) in pairs {
            if let Err(e) = attrs.set(name.as_ref(), value) {
                tracing::debug!("Ignoring attribute: {e}");
            }
        }
        attrs
    }

    /// Set one attribute by name.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownAttribute` if the name is not one of the
    /// widget's attributes.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<(), ConfigError> {
        let lower = name.trim().to_ascii_lowercase();
        let key = if lower.starts_with("data-") {
            lower
        } else {
            format!("data-{lower}")
        };

        let slot = match key.as_str() {
            attr::SITE_ID => &mut self.site_id,
            attr::THEME => &mut self.theme,
            attr::POSITION => &mut self.position,
            attr::CURRENCY => &mut self.currency,
            attr::LOCALE => &mut self.locale,
            attr::SHOW_TRIGGER => &mut self.show_trigger,
            attr::MOUNT_TARGET => &mut self.mount_target,
            _ => return Err(ConfigError::UnknownAttribute(name.to_owned())),
        };
        *slot = Some(value.into());
        Ok(())
    }

    /// Read attributes from `EMBED_CART_*` environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    #[must_use]
    pub fn from_env() -> Self {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self {
            site_id: get_optional_env("EMBED_CART_SITE_ID"),
            theme: get_optional_env("EMBED_CART_THEME"),
            position: get_optional_env("EMBED_CART_POSITION"),
            currency: get_optional_env("EMBED_CART_CURRENCY"),
            locale: get_optional_env("EMBED_CART_LOCALE"),
            show_trigger: get_optional_env("EMBED_CART_SHOW_TRIGGER"),
            mount_target: get_optional_env("EMBED_CART_MOUNT_TARGET"),
        }
    }

    /// Overlay `other` on top of `self`; attributes present in `other` win.
    #[must_use]
    pub fn merged_with(self, other: Self) -> Self {
        Self {
            site_id: other.site_id.or(self.site_id),
            theme: other.theme.or(self.theme),
            position: other.position.or(self.position),
            currency: other.currency.or(self.currency),
            locale: other.locale.or(self.locale),
            show_trigger: other.show_trigger.or(self.show_trigger),
            mount_target: other.mount_target.or(self.mount_target),
        }
    }
}

/// Fully resolved widget configuration.
///
/// Immutable once built; instances share it behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfiguration {
    /// Key distinguishing independent carts on one page
    pub site_identifier: String,
    /// Colour theme
    pub theme: Theme,
    /// Corner of the floating trigger
    pub position: Position,
    /// Currency used to label prices
    pub currency_code: CurrencyCode,
    /// Locale used to group digits
    pub locale_tag: LocaleTag,
    /// Whether the floating trigger is rendered
    pub show_trigger: bool,
    /// Host element id for the compact trigger
    pub mount_target_id: Option<String>,
}

impl Default for CartConfiguration {
    fn default() -> Self {
        Self {
            site_identifier: DEFAULT_SITE_IDENTIFIER.to_owned(),
            theme: Theme::default(),
            position: Position::default(),
            currency_code: CurrencyCode::default(),
            locale_tag: LocaleTag::default(),
            show_trigger: true,
            mount_target_id: None,
        }
    }
}

impl CartConfiguration {
    /// Configuration for `site_identifier` with every other field defaulted.
    #[must_use]
    pub fn for_site(site_identifier: impl Into<String>) -> Self {
        Self {
            site_identifier: site_identifier.into(),
            ..Self::default()
        }
    }

    /// Resolve attributes, falling back to the default for any value that is
    /// absent, blank or invalid. Invalid values are logged, never propagated.
    #[must_use]
    pub fn from_attributes(attrs: &EmbedAttributes) -> Self {
        let defaults = Self::default();

        Self {
            site_identifier: resolve_lenient(attr::SITE_ID, attrs.site_id.as_deref(), parse_site_id)
                .unwrap_or(defaults.site_identifier),
            theme: resolve_lenient(attr::THEME, attrs.theme.as_deref(), |v| {
                v.parse::<Theme>().map_err(|e| e.to_string())
            })
            .unwrap_or(defaults.theme),
            position: resolve_lenient(attr::POSITION, attrs.position.as_deref(), |v| {
                v.parse::<Position>().map_err(|e| e.to_string())
            })
            .unwrap_or(defaults.position),
            currency_code: resolve_lenient(attr::CURRENCY, attrs.currency.as_deref(), |v| {
                CurrencyCode::parse(v).map_err(|e| e.to_string())
            })
            .unwrap_or(defaults.currency_code),
            locale_tag: resolve_lenient(attr::LOCALE, attrs.locale.as_deref(), |v| {
                LocaleTag::parse(v).map_err(|e| e.to_string())
            })
            .unwrap_or(defaults.locale_tag),
            show_trigger: resolve_lenient(
                attr::SHOW_TRIGGER,
                attrs.show_trigger.as_deref(),
                parse_bool,
            )
            .unwrap_or(defaults.show_trigger),
            mount_target_id: resolve_lenient(
                attr::MOUNT_TARGET,
                attrs.mount_target.as_deref(),
                parse_element_id,
            ),
        }
    }

    /// Resolve attributes, rejecting the first invalid value.
    ///
    /// Absent and blank attributes still take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidAttribute` naming the offending attribute.
    pub fn try_from_attributes(attrs: &EmbedAttributes) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            site_identifier: resolve_strict(attr::SITE_ID, attrs.site_id.as_deref(), parse_site_id)?
                .unwrap_or(defaults.site_identifier),
            theme: resolve_strict(attr::THEME, attrs.theme.as_deref(), |v| {
                v.parse::<Theme>().map_err(|e| e.to_string())
            })?
            .unwrap_or(defaults.theme),
            position: resolve_strict(attr::POSITION, attrs.position.as_deref(), |v| {
                v.parse::<Position>().map_err(|e| e.to_string())
            })?
            .unwrap_or(defaults.position),
            currency_code: resolve_strict(attr::CURRENCY, attrs.currency.as_deref(), |v| {
                CurrencyCode::parse(v).map_err(|e| e.to_string())
            })?
            .unwrap_or(defaults.currency_code),
            locale_tag: resolve_strict(attr::LOCALE, attrs.locale.as_deref(), |v| {
                LocaleTag::parse(v).map_err(|e| e.to_string())
            })?
            .unwrap_or(defaults.locale_tag),
            show_trigger: resolve_strict(
                attr::SHOW_TRIGGER,
                attrs.show_trigger.as_deref(),
                parse_bool,
            )?
            .unwrap_or(defaults.show_trigger),
            mount_target_id: resolve_strict(
                attr::MOUNT_TARGET,
                attrs.mount_target.as_deref(),
                parse_element_id,
            )?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Parse an attribute that is present and non-blank; `Ok(None)` otherwise.
fn resolve_strict<T>(
    name: &str,
    raw: Option<&str>,
    parse: impl FnOnce(&str) -> Result<T, String>,
) -> Result<Option<T>, ConfigError> {
    let Some(value) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    parse(value)
        .map(Some)
        .map_err(|reason| ConfigError::InvalidAttribute(name.to_owned(), reason))
}

/// Like [`resolve_strict`], but logs and swallows the error.
fn resolve_lenient<T>(
    name: &str,
    raw: Option<&str>,
    parse: impl FnOnce(&str) -> Result<T, String>,
) -> Option<T> {
    resolve_strict(name, raw, parse).unwrap_or_else(|e| {
        warn!(attribute = name, "{e}; using default");
        None
    })
}

#[allow(clippy::unnecessary_wraps)]
fn parse_site_id(value: &str) -> Result<String, String> {
    Ok(value.to_owned())
}

/// Element ids may not contain whitespace.
fn parse_element_id(value: &str) -> Result<String, String> {
    if value.chars().any(char::is_whitespace) {
        return Err(format!("element id {value:?} contains whitespace"));
    }
    Ok(value.to_owned())
}

/// Parse the loose booleans script attributes tend to carry.
fn parse_bool(value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(format!("expected a boolean, got {other:?}")),
    }
}
