use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Interface language: English or te reo Māori
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Mi,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Mi];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Mi => "mi",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            Self::En => Self::Mi,
            Self::Mi => Self::En,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub const ALL: [Theme; 2] = [Theme::Dark, Theme::Light];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

/// Top-level screen of the front end
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Chat,
    Projects,
    Admin,
    Settings,
}

impl View {
    pub const ALL: [View; 4] = [View::Chat, View::Projects, View::Admin, View::Settings];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Projects => "projects",
            Self::Admin => "admin",
            Self::Settings => "settings",
        }
    }
}

/// Error for enum names that don't match any variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

/// Shared `FromStr` body for the string-named enums in `models`
pub(crate) fn parse_named<T: Copy>(
    kind: &'static str,
    value: &str,
    all: &[T],
    name: impl Fn(&T) -> &'static str,
) -> Result<T, ParseEnumError> {
    let needle = value.trim().to_ascii_lowercase();
    all.iter()
        .copied()
        .find(|candidate| name(candidate) == needle)
        .ok_or_else(|| ParseEnumError {
            kind,
            value: value.to_string(),
            expected: all.iter().map(|v| name(v)).collect::<Vec<_>>().join(", "),
        })
}

impl FromStr for Language {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named("language", s, &Self::ALL, Self::as_str)
    }
}

impl FromStr for Theme {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named("theme", s, &Self::ALL, Self::as_str)
    }
}

impl FromStr for View {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named("view", s, &Self::ALL, Self::as_str)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("MI".parse::<Language>().unwrap(), Language::Mi);
        assert_eq!(" light ".parse::<Theme>().unwrap(), Theme::Light);
        assert_eq!("admin".parse::<View>().unwrap(), View::Admin);
    }

    #[test]
    fn test_parse_unknown_lists_expected_values() {
        let err = "fr".parse::<Language>().unwrap_err();
        assert_eq!(err.kind, "language");
        assert_eq!(err.expected, "en, mi");
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Language::Mi).unwrap(), "\"mi\"");
        assert_eq!(serde_json::to_string(&View::Projects).unwrap(), "\"projects\"");
        let theme: Theme = serde_json::from_str("\"dark\"").unwrap();
        assert_eq!(theme, Theme::Dark);
    }

    #[test]
    fn test_toggle() {
        assert_eq!(Language::En.toggle(), Language::Mi);
        assert_eq!(Theme::Light.toggle(), Theme::Dark);
    }
}
