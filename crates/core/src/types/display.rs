//! Display options for the widget: colour theme and screen corner.

use serde::{Deserialize, Serialize};

/// Error returned when a theme name is not recognised.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown theme {0:?} (expected light, dark, ocean or sunset)")]
pub struct ParseThemeError(pub String);

/// Error returned when a position name is not recognised.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown position {0:?} (expected bottom-right, bottom-left, top-right or top-left)")]
pub struct ParsePositionError(pub String);

/// Colour theme of the trigger and popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Ocean,
    Sunset,
}

impl Theme {
    /// All themes, in declaration order.
    pub const ALL: [Self; 4] = [Self::Light, Self::Dark, Self::Ocean, Self::Sunset];

    /// The attribute value naming this theme.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Ocean => "ocean",
            Self::Sunset => "sunset",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|theme| theme.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseThemeError(s.to_owned()))
    }
}

/// Screen corner the floating trigger is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    #[default]
    BottomRight,
    BottomLeft,
    TopRight,
    TopLeft,
}

impl Position {
    /// All positions, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::BottomRight,
        Self::BottomLeft,
        Self::TopRight,
        Self::TopLeft,
    ];

    /// The attribute value naming this position.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BottomRight => "bottom-right",
            Self::BottomLeft => "bottom-left",
            Self::TopRight => "top-right",
            Self::TopLeft => "top-left",
        }
    }

    /// Whether the corner is on the top edge of the viewport.
    #[must_use]
    pub const fn is_top(self) -> bool {
        matches!(self, Self::TopRight | Self::TopLeft)
    }

    /// Whether the corner is on the left edge of the viewport.
    #[must_use]
    pub const fn is_left(self) -> bool {
        matches!(self, Self::BottomLeft | Self::TopLeft)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept `bottom_right` and `bottomright` spellings too.
        let wanted: String = s
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        Self::ALL
            .into_iter()
            .find(|position| position.as_str().replace('-', "").eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| ParsePositionError(s.to_owned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_from_str() {
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!(" Ocean ".parse::<Theme>().unwrap(), Theme::Ocean);
        assert!("neon".parse::<Theme>().is_err());
    }

    #[test]
    fn test_theme_round_trips_through_name() {
        for theme in Theme::ALL {
            assert_eq!(theme.as_str().parse::<Theme>().unwrap(), theme);
        }
    }

    #[test]
    fn test_position_from_str() {
        assert_eq!(
            "top-left".parse::<Position>().unwrap(),
            Position::TopLeft
        );
        assert_eq!(
            "BOTTOM_LEFT".parse::<Position>().unwrap(),
            Position::BottomLeft
        );
        assert!("middle".parse::<Position>().is_err());
        assert!("".parse::<Position>().is_err());
    }

    #[test]
    fn test_position_edges() {
        assert!(Position::TopLeft.is_top());
        assert!(Position::TopLeft.is_left());
        assert!(!Position::BottomRight.is_top());
        assert!(!Position::BottomRight.is_left());
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Theme::default(), Theme::Light);
        assert_eq!(Position::default(), Position::BottomRight);
    }

    #[test]
    fn test_serde_kebab_case() {
        let json = serde_json::to_string(&Position::BottomRight).unwrap();
        assert_eq!(json, "\"bottom-right\"");
    }
}
