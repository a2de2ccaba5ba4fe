//! Content renderer: rewrites translated slots for the active language.
//!
//! The renderer owns the current language. The selector controls on the page
//! only mirror it: they are written on every render and never read back.

use crate::translations::TranslationTable;
use marketx_core::{document::Document, language::Language};
use tracing::{debug, info};


/// Element ids and classes the renderer writes besides content slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageHooks {
    /// Element that receives the Khmer font class.
    pub body: String,
    /// Class selecting the Khmer font/script rendering path.
    pub khmer_class: String,
    /// Selector control for English.
    pub english_control: String,
    /// Selector control for Khmer.
    pub khmer_control: String,
    /// Marker class on the active selector control.
    pub active_class: String,
}

impl Default for LanguageHooks {
    fn default() -> Self {
        Self {
            body: "body".into(),
            khmer_class: "lang-khmer-active".into(),
            english_control: "lang-eng".into(),
            khmer_control: "lang-kh".into(),
            active_class: "active-lang".into(),
        }
    }
}

impl LanguageHooks {
    fn control(&self, language: Language) -> &str {
        match language {
            Language::English => &self.english_control,
            Language::Khmer => &self.khmer_control,
        }
    }
}

/// Outcome of one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderReport {
    pub language: Language,
    /// Slots whose text was set.
    pub written: usize,
    /// Translated slots with no element on the page.
    pub missing: Vec<String>,
}

/// Renders the translation table into a document.
#[derive(Debug, Clone)]
pub struct ContentRenderer {
    table: TranslationTable,
    hooks: LanguageHooks,
    current: Language,
}

impl ContentRenderer {
    /// Create a renderer. The current language starts as English.
    pub fn new(table: TranslationTable) -> Self {
        Self {
            table,
            hooks: LanguageHooks::default(),
            current: Language::default(),
        }
    }

    pub fn with_hooks(mut self, hooks: LanguageHooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn current(&self) -> Language {
        self.current
    }

    pub fn table(&self) -> &TranslationTable {
        &self.table
    }

    /// Render every translated slot in `language` and update the font flag
    /// and selector indicator.
    ///
    /// Page elements without a table entry are left alone; table entries
    /// without a page element are reported, not treated as errors.
    pub fn render(&mut self, doc: &mut dyn Document, language: Language) -> RenderReport {
        self.current = language;

        if language == Language::Khmer {
            doc.add_class(&self.hooks.body, &self.hooks.khmer_class);
        } else {
            doc.remove_class(&self.hooks.body, &self.hooks.khmer_class);
        }

        for lang in Language::ALL {
            doc.remove_class(self.hooks.control(lang), &self.hooks.active_class);
        }
        if !doc.add_class(self.hooks.control(language), &self.hooks.active_class) {
            debug!(
                "render: selector control '{}' not on page",
                self.hooks.control(language)
            );
        }

        let mut written = 0;
        let mut missing = Vec::new();
        for (slot, entry) in self.table.slots() {
            if doc.set_text(slot, entry.get(language)) {
                written += 1;
            } else {
                missing.push(slot.to_string());
            }
        }

        if !missing.is_empty() {
            debug!("render: {} slots not on page", missing.len());
        }
        info!("render: {language} ({written} slots)");

        RenderReport {
            language,
            written,
            missing,
        }
    }

    /// Switch to the other language and render it.
    pub fn toggle(&mut self, doc: &mut dyn Document) -> RenderReport {
        let next = self.current.other();
        self.render(doc, next)
    }
}
