//! Translation table: content slot id to per-language display text.
//!
//! The landing copy ships inside the binary (`content/translations.toml`).
//! A replacement file can be configured; if it is missing or invalid the
//! bundled table is used.

use marketx_core::{config::shellexpand, error::MarketxError, language::Language};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Bundled landing page copy, embedded at compile time.
const BUNDLED_TRANSLATIONS: &str = include_str!("../../../content/translations.toml");

/// Text for one slot in both languages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationEntry {
    #[serde(rename = "ENG")]
    pub english: String,
    #[serde(rename = "KH")]
    pub khmer: String,
}

impl TranslationEntry {
    pub fn new(english: &str, khmer: &str) -> Self {
        Self {
            english: english.to_string(),
            khmer: khmer.to_string(),
        }
    }

    pub fn get(&self, language: Language) -> &str {
        match language {
            Language::English => &self.english,
            Language::Khmer => &self.khmer,
        }
    }
}

/// TOML structure for a translations file.
#[derive(Deserialize)]
struct TranslationFile {
    slots: BTreeMap<String, TranslationEntry>,
}

/// Static mapping from content slot to per-language text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationTable {
    slots: BTreeMap<String, TranslationEntry>,
}

impl TranslationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The table shipped with the binary.
    pub fn bundled() -> Result<Self, MarketxError> {
        Self::from_toml(BUNDLED_TRANSLATIONS)
    }

    /// Parse a `[slots.<id>]` TOML document.
    ///
    /// Every entry must carry non-empty `ENG` and `KH` strings.
    pub fn from_toml(content: &str) -> Result<Self, MarketxError> {
        let file: TranslationFile = toml::from_str(content)
            .map_err(|e| MarketxError::Translation(format!("failed to parse table: {e}")))?;

        for (slot, entry) in &file.slots {
            for language in Language::ALL {
                if entry.get(language).trim().is_empty() {
                    return Err(MarketxError::Translation(format!(
                        "slot '{slot}' has no {language} text"
                    )));
                }
            }
        }

        Ok(Self { slots: file.slots })
    }

    /// Load the configured table, falling back to the bundled one.
    pub fn load(path: Option<&str>) -> Result<Self, MarketxError> {
        let Some(path) = path else {
            return Self::bundled();
        };

        let expanded = shellexpand(path);
        match std::fs::read_to_string(&expanded) {
            Ok(content) => match Self::from_toml(&content) {
                Ok(table) => {
                    info!("loaded {} translations from {expanded}", table.len());
                    Ok(table)
                }
                Err(e) => {
                    warn!("ignoring {expanded}: {e}");
                    Self::bundled()
                }
            },
            Err(e) => {
                warn!("failed to read {expanded}: {e}, using bundled translations");
                Self::bundled()
            }
        }
    }

    pub fn insert(&mut self, slot: &str, entry: TranslationEntry) {
        self.slots.insert(slot.to_string(), entry);
    }

    /// Text for `slot` in `language`, if the slot is translated.
    pub fn get(&self, slot: &str, language: Language) -> Option<&str> {
        self.slots.get(slot).map(|e| e.get(language))
    }

    pub fn contains(&self, slot: &str) -> bool {
        self.slots.contains_key(slot)
    }

    pub fn slots(&self) -> impl Iterator<Item = (&str, &TranslationEntry)> {
        self.slots.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_table_is_complete() {
        let table = TranslationTable::bundled().unwrap();
        assert_eq!(table.len(), 61);
        for (slot, entry) in table.slots() {
            assert!(!entry.english.is_empty(), "{slot} missing ENG");
            assert!(!entry.khmer.is_empty(), "{slot} missing KH");
        }
    }

    #[test]
    fn test_bundled_known_slots() {
        let table = TranslationTable::bundled().unwrap();
        assert_eq!(table.get("nav-link-1", Language::English), Some("Home"));
        assert_eq!(
            table.get("nav-link-1", Language::Khmer),
            Some("\u{1791}\u{17c6}\u{1796}\u{17d0}\u{179a}\u{178a}\u{17be}\u{1798}")
        );
        assert_eq!(
            table.get("section-heading-gold", Language::English),
            Some("Daily Gold Price")
        );
        assert_eq!(table.get("stat-3-num", Language::Khmer), Some("99.9%"));
        assert!(table.contains("cta-register"));
        assert!(!table.contains("barPrice"));
    }

    #[test]
    fn test_khmer_copy_has_no_replacement_chars() {
        let table = TranslationTable::bundled().unwrap();
        for (slot, entry) in table.slots() {
            assert!(
                !entry.khmer.contains('\u{fffd}'),
                "{slot} has a broken code point"
            );
        }
    }

    #[test]
    fn test_from_toml_rejects_missing_language() {
        let toml_str = r#"
            [slots.greeting]
            ENG = "Hello"
        "#;
        assert!(TranslationTable::from_toml(toml_str).is_err());
    }

    #[test]
    fn test_from_toml_rejects_empty_text() {
        let toml_str = r#"
            [slots.greeting]
            ENG = "Hello"
            KH = "  "
        "#;
        let err = TranslationTable::from_toml(toml_str).unwrap_err();
        assert!(err.to_string().contains("greeting"));
    }

    #[test]
    fn test_load_missing_file_falls_back_to_bundled() {
        let table = TranslationTable::load(Some("/nonexistent/__marketx__/t.toml")).unwrap();
        assert_eq!(table.len(), 61);
    }

    #[test]
    fn test_load_override_file() {
        let tmp = std::env::temp_dir().join("__marketx_test_translations__");
        let _ = std::fs::remove_dir_all(&tmp);
        std::fs::create_dir_all(&tmp).unwrap();
        let path = tmp.join("translations.toml");
        std::fs::write(
            &path,
            "[slots.hero-heading]\nENG = \"Trade gold\"\nKH = \"KH gold\"\n",
        )
        .unwrap();

        let table = TranslationTable::load(path.to_str()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(
            table.get("hero-heading", Language::English),
            Some("Trade gold")
        );

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
