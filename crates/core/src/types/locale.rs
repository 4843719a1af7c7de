//! Locale tags used for number formatting.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`LocaleTag`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LocaleTagError {
    /// The input string is empty.
    #[error("locale tag cannot be empty")]
    Empty,
    /// A subtag is empty or contains characters other than ASCII alphanumerics.
    #[error("invalid locale subtag in {0:?}")]
    InvalidSubtag(String),
}

/// A BCP 47 style language tag such as `vi-VN` or `en-US`.
///
/// Only the shape is checked (alphanumeric subtags separated by `-` or `_`);
/// whether the locale is actually supported is decided at formatting time.
/// Underscores are normalised to hyphens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocaleTag(String);

impl LocaleTag {
    /// Parse a `LocaleTag` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or any subtag is empty or
    /// contains non-alphanumeric characters.
    pub fn parse(s: &str) -> Result<Self, LocaleTagError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(LocaleTagError::Empty);
        }

        let normalised = trimmed.replace('_', "-");
        let valid = normalised
            .split('-')
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric()));
        if !valid {
            return Err(LocaleTagError::InvalidSubtag(trimmed.to_owned()));
        }

        Ok(Self(normalised))
    }

    /// Vietnamese as written in Vietnam, the widget's default locale.
    #[must_use]
    pub fn vi_vn() -> Self {
        Self("vi-VN".to_owned())
    }

    /// Returns the tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the primary language subtag, lower-cased (`vi` for `vi-VN`).
    #[must_use]
    pub fn language(&self) -> String {
        self.0
            .split('-')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase()
    }
}

impl Default for LocaleTag {
    fn default() -> Self {
        Self::vi_vn()
    }
}

impl fmt::Display for LocaleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for LocaleTag {
    type Err = LocaleTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for LocaleTag {
    type Error = LocaleTagError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LocaleTag> for String {
    fn from(tag: LocaleTag) -> Self {
        tag.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_tags() {
        assert_eq!(LocaleTag::parse("vi-VN").unwrap().as_str(), "vi-VN");
        assert_eq!(LocaleTag::parse("en").unwrap().as_str(), "en");
        assert_eq!(LocaleTag::parse("zh_Hant_TW").unwrap().as_str(), "zh-Hant-TW");
    }

    #[test]
    fn test_parse_invalid_tags() {
        assert_eq!(LocaleTag::parse(""), Err(LocaleTagError::Empty));
        assert!(matches!(
            LocaleTag::parse("en--US"),
            Err(LocaleTagError::InvalidSubtag(_))
        ));
        assert!(matches!(
            LocaleTag::parse("en US"),
            Err(LocaleTagError::InvalidSubtag(_))
        ));
    }

    #[test]
    fn test_language() {
        assert_eq!(LocaleTag::parse("VI-vn").unwrap().language(), "vi");
        assert_eq!(LocaleTag::parse("de").unwrap().language(), "de");
    }
}
