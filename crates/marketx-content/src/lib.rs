//! # marketx-content
//!
//! Bilingual page content: the translation table, the renderer that writes
//! it into the page, and the cosmetic effects (menu, reveal, nav, typewriter).

pub mod effects;
pub mod renderer;
pub mod translations;

pub use renderer::{ContentRenderer, LanguageHooks, RenderReport};
pub use translations::{TranslationEntry, TranslationTable};
