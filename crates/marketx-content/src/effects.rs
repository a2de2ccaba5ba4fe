//! Cosmetic page effects as document state transitions.
//!
//! The page itself decides when things scroll into view; these types only
//! apply the resulting class and text changes.

use marketx_core::document::Document;
use std::collections::BTreeSet;
use tracing::debug;

/// Glyph on the menu button while the menu is closed.
pub const MENU_CLOSED_GLYPH: &str = "\u{2630}";
/// Glyph on the menu button while the menu is open.
pub const MENU_OPEN_GLYPH: &str = "\u{2715}";

/// Sections observed for the fade-in reveal.
pub const REVEAL_TARGETS: [&str; 6] = [
    "site-header",
    "hero-section",
    "features-section",
    "course-section",
    "team-section",
    "site-footer",
];

/// Section → nav link pairs for scroll highlighting.
pub const NAV_SECTIONS: [(&str, &str); 4] = [
    ("hero-section", "nav-link-1"),
    ("features-section", "nav-link-2"),
    ("course-section", "nav-link-3"),
    ("team-section", "nav-link-4"),
];

/// Every link inside the nav menu.
pub const NAV_MENU_LINKS: [&str; 6] = [
    "nav-link-1",
    "nav-link-2",
    "nav-link-3",
    "nav-link-4",
    "nav-login",
    "nav-cta",
];

/// Element revealed by the typewriter.
pub const TYPEWRITER_TARGET: &str = "hero-subtext";

/// One viewport intersection change reported by the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intersection {
    pub target: String,
    pub is_intersecting: bool,
}

impl Intersection {
    pub fn entering(target: &str) -> Self {
        Self {
            target: target.to_string(),
            is_intersecting: true,
        }
    }

    pub fn leaving(target: &str) -> Self {
        Self {
            target: target.to_string(),
            is_intersecting: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Mobile menu
// ---------------------------------------------------------------------------

/// Open/close toggle for the collapsed navigation menu.
#[derive(Debug, Clone)]
pub struct MobileMenu {
    menu: String,
    button: String,
}

impl MobileMenu {
    pub fn new(menu: &str, button: &str) -> Self {
        Self {
            menu: menu.to_string(),
            button: button.to_string(),
        }
    }

    pub fn landing() -> Self {
        Self::new("nav-menu", "mobile-menu-button")
    }

    pub fn menu_id(&self) -> &str {
        &self.menu
    }

    /// Show the closed glyph on the button.
    pub fn install(&self, doc: &mut dyn Document) {
        doc.set_text(&self.button, MENU_CLOSED_GLYPH);
    }

    /// Flip the menu. Returns whether it is open afterwards; a page without
    /// the menu element reads as closed.
    pub fn toggle(&self, doc: &mut dyn Document) -> bool {
        let open = doc.toggle_class(&self.menu, "active").unwrap_or(false);
        let glyph = if open {
            MENU_OPEN_GLYPH
        } else {
            MENU_CLOSED_GLYPH
        };
        doc.set_text(&self.button, glyph);
        open
    }
}

// ---------------------------------------------------------------------------
// Scroll reveal
// ---------------------------------------------------------------------------

/// Fade-in on first intersection, then stop observing the element.
#[derive(Debug, Clone, Default)]
pub struct ScrollReveal {
    observing: BTreeSet<String>,
}

impl ScrollReveal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark every present target with `fade-in` and start observing it.
    /// Returns how many targets were found.
    pub fn observe<'a>(
        &mut self,
        doc: &mut dyn Document,
        targets: impl IntoIterator<Item = &'a str>,
    ) -> usize {
        let mut found = 0;
        for id in targets {
            if doc.add_class(id, "fade-in") {
                self.observing.insert(id.to_string());
                found += 1;
            } else {
                debug!("reveal: '{id}' not on page");
            }
        }
        found
    }

    pub fn is_observing(&self, id: &str) -> bool {
        self.observing.contains(id)
    }

    /// Apply an intersection batch. Returns the ids revealed by it.
    pub fn on_intersect(
        &mut self,
        doc: &mut dyn Document,
        entries: &[Intersection],
    ) -> Vec<String> {
        let mut revealed = Vec::new();
        for entry in entries.iter().filter(|e| e.is_intersecting) {
            if self.observing.remove(&entry.target) {
                doc.add_class(&entry.target, "visible");
                revealed.push(entry.target.clone());
            }
        }
        revealed
    }
}

// ---------------------------------------------------------------------------
// Nav highlighting
// ---------------------------------------------------------------------------

/// Marks the nav link of every intersecting section as active.
///
/// Each batch first clears `active` from every link in the nav menu, not
/// only the section links.
#[derive(Debug, Clone)]
pub struct NavHighlighter {
    links: Vec<(String, String)>,
    menu_links: Vec<String>,
}

impl NavHighlighter {
    pub fn new<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let links: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(section, link)| (section.to_string(), link.to_string()))
            .collect();
        let menu_links = links.iter().map(|(_, link)| link.clone()).collect();
        Self { links, menu_links }
    }

    /// Extra nav menu links that are cleared on every batch but never
    /// activated.
    pub fn with_menu_links<'a>(mut self, links: impl IntoIterator<Item = &'a str>) -> Self {
        for link in links {
            if !self.menu_links.iter().any(|l| l == link) {
                self.menu_links.push(link.to_string());
            }
        }
        self
    }

    pub fn landing() -> Self {
        Self::new(NAV_SECTIONS).with_menu_links(NAV_MENU_LINKS)
    }

    fn link_for(&self, section: &str) -> Option<&str> {
        self.links
            .iter()
            .find(|(s, _)| s == section)
            .map(|(_, l)| l.as_str())
    }

    /// Clear every menu link, then activate links of intersecting sections.
    /// Returns the activated link ids.
    pub fn on_intersect(&self, doc: &mut dyn Document, entries: &[Intersection]) -> Vec<String> {
        for link in &self.menu_links {
            doc.remove_class(link, "active");
        }

        let mut active = Vec::new();
        for entry in entries.iter().filter(|e| e.is_intersecting) {
            if let Some(link) = self.link_for(&entry.target) {
                if doc.add_class(link, "active") {
                    active.push(link.to_string());
                }
            }
        }
        active
    }
}

// ---------------------------------------------------------------------------
// Typewriter
// ---------------------------------------------------------------------------

/// Reveals an element's text one character per step, then adds `blink`.
///
/// If something else rewrites the element mid-reveal (a language switch),
/// the next step picks up the new text at the same position.
#[derive(Debug, Clone)]
pub struct Typewriter {
    target: String,
    chars: Vec<char>,
    typed: String,
    index: usize,
    finished: bool,
}

impl Typewriter {
    /// Capture the element's text and clear it. `None` if the element is
    /// missing.
    pub fn start(doc: &mut dyn Document, target: &str) -> Option<Self> {
        let full = doc.text(target)?.to_string();
        doc.set_text(target, "");
        doc.remove_class(target, "blink");
        Some(Self {
            target: target.to_string(),
            chars: full.chars().collect(),
            typed: String::new(),
            index: 0,
            finished: false,
        })
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Characters revealed so far.
    pub fn position(&self) -> usize {
        self.index
    }

    /// Type the next character. Returns `false` once the text is complete
    /// and the cursor class has been added.
    pub fn step(&mut self, doc: &mut dyn Document) -> bool {
        if self.finished {
            return false;
        }

        match doc.text(&self.target) {
            None => {
                self.finished = true;
                return false;
            }
            Some(current) if current != self.typed => {
                self.chars = current.chars().collect();
                self.index = self.index.min(self.chars.len());
                self.typed = self.chars[..self.index].iter().collect();
            }
            Some(_) => {}
        }

        if self.index < self.chars.len() {
            self.typed.push(self.chars[self.index]);
            self.index += 1;
            doc.set_text(&self.target, &self.typed);
            true
        } else {
            doc.set_text(&self.target, &self.typed);
            doc.add_class(&self.target, "blink");
            self.finished = true;
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marketx_core::document::Page;

    #[test]
    fn test_menu_toggle_glyphs() {
        let menu = MobileMenu::landing();
        let mut page = Page::new()
            .with_element("nav-menu", "")
            .with_element("mobile-menu-button", "");
        menu.install(&mut page);
        assert_eq!(page.text("mobile-menu-button"), Some(MENU_CLOSED_GLYPH));

        assert!(menu.toggle(&mut page));
        assert!(page.has_class("nav-menu", "active"));
        assert_eq!(page.text("mobile-menu-button"), Some(MENU_OPEN_GLYPH));

        assert!(!menu.toggle(&mut page));
        assert!(!page.has_class("nav-menu", "active"));
        assert_eq!(page.text("mobile-menu-button"), Some(MENU_CLOSED_GLYPH));
    }

    #[test]
    fn test_menu_without_nav_stays_closed() {
        let menu = MobileMenu::landing();
        let mut page = Page::new().with_element("mobile-menu-button", "");
        assert!(!menu.toggle(&mut page));
        assert!(!menu.toggle(&mut page));
        assert_eq!(page.text("mobile-menu-button"), Some(MENU_CLOSED_GLYPH));
    }

    #[test]
    fn test_reveal_once_then_unobserved() {
        let mut page = Page::new()
            .with_element("hero-section", "")
            .with_element("team-section", "");
        let mut reveal = ScrollReveal::new();
        assert_eq!(reveal.observe(&mut page, REVEAL_TARGETS), 2);
        assert!(page.has_class("hero-section", "fade-in"));
        assert!(!reveal.is_observing("site-footer"));

        let revealed = reveal.on_intersect(
            &mut page,
            &[
                Intersection::entering("hero-section"),
                Intersection::leaving("team-section"),
            ],
        );
        assert_eq!(revealed, vec!["hero-section".to_string()]);
        assert!(page.has_class("hero-section", "visible"));
        assert!(!page.has_class("team-section", "visible"));
        assert!(!reveal.is_observing("hero-section"));
        assert!(reveal.is_observing("team-section"));

        // A second intersection no longer counts.
        page.remove_class("hero-section", "visible");
        let revealed = reveal.on_intersect(&mut page, &[Intersection::entering("hero-section")]);
        assert!(revealed.is_empty());
        assert!(!page.has_class("hero-section", "visible"));
    }

    #[test]
    fn test_nav_highlight_follows_intersections() {
        let nav = NavHighlighter::landing();
        let mut page = Page::new();
        for (_, link) in NAV_SECTIONS {
            page = page.with_element(link, "");
        }

        let active = nav.on_intersect(&mut page, &[Intersection::entering("features-section")]);
        assert_eq!(active, vec!["nav-link-2".to_string()]);
        assert!(page.has_class("nav-link-2", "active"));

        let active = nav.on_intersect(
            &mut page,
            &[
                Intersection::leaving("features-section"),
                Intersection::entering("team-section"),
            ],
        );
        assert_eq!(active, vec!["nav-link-4".to_string()]);
        assert!(!page.has_class("nav-link-2", "active"));
        assert!(page.has_class("nav-link-4", "active"));
    }

    #[test]
    fn test_nav_highlight_clears_every_menu_link() {
        let nav = NavHighlighter::landing();
        let mut page = Page::new();
        for link in NAV_MENU_LINKS {
            page = page.with_element(link, "");
        }
        page.add_class("nav-login", "active");
        page.add_class("nav-cta", "active");

        let active = nav.on_intersect(&mut page, &[Intersection::entering("hero-section")]);
        assert_eq!(active, vec!["nav-link-1".to_string()]);
        assert!(!page.has_class("nav-login", "active"));
        assert!(!page.has_class("nav-cta", "active"));

        // Menu-only links are never activated.
        let active = nav.on_intersect(&mut page, &[Intersection::entering("nav-cta")]);
        assert!(active.is_empty());
        assert!(!page.has_class("nav-link-1", "active"));
    }

    #[test]
    fn test_nav_highlight_ignores_unknown_sections() {
        let nav = NavHighlighter::landing();
        let mut page = Page::new().with_element("nav-link-1", "");
        let active = nav.on_intersect(&mut page, &[Intersection::entering("pricing")]);
        assert!(active.is_empty());
    }

    #[test]
    fn test_typewriter_reveals_then_blinks() {
        let mut page = Page::new().with_element("hero-subtext", "abc");
        let mut tw = Typewriter::start(&mut page, "hero-subtext").unwrap();
        assert_eq!(page.text("hero-subtext"), Some(""));

        assert!(tw.step(&mut page));
        assert_eq!(page.text("hero-subtext"), Some("a"));
        assert!(tw.step(&mut page));
        assert!(tw.step(&mut page));
        assert_eq!(page.text("hero-subtext"), Some("abc"));
        assert!(!page.has_class("hero-subtext", "blink"));

        assert!(!tw.step(&mut page));
        assert!(tw.is_finished());
        assert!(page.has_class("hero-subtext", "blink"));
        assert!(!tw.step(&mut page));
    }

    #[test]
    fn test_typewriter_steps_by_code_point() {
        let khmer = "\u{1798}\u{17b6}\u{179f}";
        let mut page = Page::new().with_element("hero-subtext", khmer);
        let mut tw = Typewriter::start(&mut page, "hero-subtext").unwrap();
        tw.step(&mut page);
        assert_eq!(page.text("hero-subtext"), Some("\u{1798}"));
    }

    #[test]
    fn test_typewriter_follows_rewritten_text() {
        let mut page = Page::new().with_element("hero-subtext", "hello");
        let mut tw = Typewriter::start(&mut page, "hero-subtext").unwrap();
        tw.step(&mut page);
        tw.step(&mut page);
        assert_eq!(page.text("hero-subtext"), Some("he"));

        page.set_text("hero-subtext", "WORLD");
        assert!(tw.step(&mut page));
        assert_eq!(page.text("hero-subtext"), Some("WOR"));
        assert_eq!(tw.position(), 3);
    }

    #[test]
    fn test_typewriter_missing_target() {
        let mut page = Page::new();
        assert!(Typewriter::start(&mut page, "hero-subtext").is_none());

        let mut page = Page::new().with_element("hero-subtext", "hi");
        let mut tw = Typewriter::start(&mut page, "hero-subtext").unwrap();
        page.remove("hero-subtext");
        assert!(!tw.step(&mut page));
        assert!(tw.is_finished());
    }
}
