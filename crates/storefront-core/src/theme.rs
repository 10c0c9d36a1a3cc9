//! # Theme
//!
//! Display-mode preference and its resolution against the host.
//!
//! ```text
//!   preference      host scheme      effective
//!   ──────────      ───────────      ─────────
//!   Light           (ignored)   ──►  Light
//!   Dark            (ignored)   ──►  Dark
//!   System          Light       ──►  Light
//!   System          Dark        ──►  Dark
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;

/// Light or dark rendering, as reported by the host or resolved for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

impl ColorScheme {
    pub fn is_dark(self) -> bool {
        self == ColorScheme::Dark
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorScheme::Light => write!(f, "light"),
            ColorScheme::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for ColorScheme {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(ColorScheme::Light),
            "dark" => Ok(ColorScheme::Dark),
            other => Err(ValidationError::InvalidFormat {
                field: "color scheme".to_string(),
                reason: format!("expected light or dark, got '{}'", other),
            }),
        }
    }
}

/// The user's stored choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ThemePreference {
    Light,
    Dark,
    /// Follow the host's color scheme.
    #[default]
    System,
}

impl ThemePreference {
    /// Resolves the effective scheme. Only `System` consults `host`.
    pub fn resolve(self, host: ColorScheme) -> ColorScheme {
        match self {
            ThemePreference::Light => ColorScheme::Light,
            ThemePreference::Dark => ColorScheme::Dark,
            ThemePreference::System => host,
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemePreference::Light => write!(f, "light"),
            ThemePreference::Dark => write!(f, "dark"),
            ThemePreference::System => write!(f, "system"),
        }
    }
}

impl FromStr for ThemePreference {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(ThemePreference::Light),
            "dark" => Ok(ThemePreference::Dark),
            "system" => Ok(ThemePreference::System),
            other => Err(ValidationError::InvalidFormat {
                field: "theme".to_string(),
                reason: format!("expected light, dark or system, got '{}'", other),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_preference_ignores_host() {
        for host in [ColorScheme::Light, ColorScheme::Dark] {
            assert_eq!(ThemePreference::Dark.resolve(host), ColorScheme::Dark);
            assert_eq!(ThemePreference::Light.resolve(host), ColorScheme::Light);
        }
    }

    #[test]
    fn test_system_tracks_host() {
        assert_eq!(ThemePreference::System.resolve(ColorScheme::Dark), ColorScheme::Dark);
        assert_eq!(ThemePreference::System.resolve(ColorScheme::Light), ColorScheme::Light);
    }

    #[test]
    fn test_serialized_as_lowercase() {
        assert_eq!(serde_json::to_string(&ThemePreference::System).unwrap(), "\"system\"");
        let pref: ThemePreference = serde_json::from_str("\"dark\"").unwrap();
        assert_eq!(pref, ThemePreference::Dark);
    }

    #[test]
    fn test_parse() {
        assert_eq!(" Dark ".parse::<ThemePreference>().unwrap(), ThemePreference::Dark);
        assert!("sepia".parse::<ThemePreference>().is_err());
        assert!("system".parse::<ColorScheme>().is_err());
    }
}
