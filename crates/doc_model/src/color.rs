//! Hex color values and the color categories used by the tool palette

use crate::{DocModelError, Result};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

fn hex_pattern() -> &'static regex_lite::Regex {
    static PATTERN: OnceLock<regex_lite::Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        regex_lite::Regex::new(r"^#[0-9a-fA-F]{6}$").expect("hex color pattern is valid")
    })
}

/// A validated `#rrggbb` color, normalized to lowercase
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    /// Parse a strict six-digit hex color (case-insensitive)
    pub fn parse(value: &str) -> Result<Self> {
        if hex_pattern().is_match(value) {
            Ok(Self(value.to_ascii_lowercase()))
        } else {
            Err(DocModelError::InvalidColor(value.to_string()))
        }
    }

    /// Check whether a string is a valid hex color without allocating
    pub fn is_valid(value: &str) -> bool {
        hex_pattern().is_match(value)
    }

    /// Get the color as `#rrggbb`
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for HexColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for HexColor {
    type Error = DocModelError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.0
    }
}

/// Color category for recently-used colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorCategory {
    /// Foreground text color
    Text,
    /// Highlight and callout backgrounds
    Background,
    /// Borders, circles, decoration lines and everything else
    Border,
}

impl ColorCategory {
    /// All categories
    pub const ALL: [ColorCategory; 3] = [Self::Text, Self::Background, Self::Border];

    /// Get the category name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Background => "background",
            Self::Border => "border",
        }
    }

    /// Persistence key for this category's history
    pub fn storage_key(&self) -> String {
        format!("recentColors_{}", self.as_str())
    }
}

impl std::str::FromStr for ColorCategory {
    type Err = DocModelError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(Self::Text),
            "background" | "bg" => Ok(Self::Background),
            "border" => Ok(Self::Border),
            other => Err(DocModelError::InvalidColor(format!("unknown color category '{}'", other))),
        }
    }
}
