//! The two display languages of the landing page.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MarketxError;

/// Display language. Exactly one is active at a time; the page always
/// starts in English.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Language {
    #[default]
    #[serde(rename = "ENG")]
    English,
    #[serde(rename = "KH")]
    Khmer,
}

impl Language {
    /// Both supported languages, English first.
    pub const ALL: [Language; 2] = [Language::English, Language::Khmer];

    /// Language code as used in the translation table (`ENG` / `KH`).
    pub fn code(&self) -> &'static str {
        match self {
            Self::English => "ENG",
            Self::Khmer => "KH",
        }
    }

    /// The language a selector activation switches to.
    pub fn other(&self) -> Self {
        match self {
            Self::English => Self::Khmer,
            Self::Khmer => Self::English,
        }
    }

    /// Native name for display.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Khmer => "\u{1781}\u{17d2}\u{1798}\u{17c2}\u{179a}",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = MarketxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eng" | "en" | "english" => Ok(Self::English),
            "kh" | "km" | "khmer" => Ok(Self::Khmer),
            other => Err(MarketxError::Config(format!(
                "unknown language '{other}' (expected ENG or KH)"
            ))),
        }
    }
}
