//! Page document model: elements addressed by id, each with text content
//! and a class list.
//!
//! Every write reports whether its target existed. Callers skip missing
//! elements instead of failing, so a page without some hook keeps working.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// A document shared between the renderer and the background loops.
///
/// Writers hold the lock for one synchronous update at a time.
pub type SharedDocument<D = Page> = Arc<tokio::sync::Mutex<D>>;

/// Read/write surface over the rendered page.
///
/// Implemented by the in-memory [`Page`]; a browser-backed document would
/// implement the same trait.
pub trait Document: Send {
    /// Whether an element with this id exists.
    fn contains(&self, id: &str) -> bool;

    /// Current text content of an element.
    fn text(&self, id: &str) -> Option<&str>;

    /// Replace the text content. Returns `false` if the element is missing.
    fn set_text(&mut self, id: &str, text: &str) -> bool;

    /// Whether the element carries `class`. Missing elements carry nothing.
    fn has_class(&self, id: &str, class: &str) -> bool;

    /// Add a class. Returns `false` if the element is missing.
    fn add_class(&mut self, id: &str, class: &str) -> bool;

    /// Remove a class. Returns `false` if the element is missing.
    fn remove_class(&mut self, id: &str, class: &str) -> bool;

    /// Flip a class on or off.
    ///
    /// Returns the new state, or `None` if the element is missing.
    fn toggle_class(&mut self, id: &str, class: &str) -> Option<bool> {
        if !self.contains(id) {
            return None;
        }
        if self.has_class(id, class) {
            self.remove_class(id, class);
            Some(false)
        } else {
            self.add_class(id, class);
            Some(true)
        }
    }
}

/// A single page element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Element {
    pub text: String,
    pub classes: BTreeSet<String>,
}

impl Element {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            classes: BTreeSet::new(),
        }
    }

    /// Builder-style class addition.
    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.insert(class.to_string());
        self
    }
}

/// In-memory page: element id → element, ordered by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Page {
    elements: BTreeMap<String, Element>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an element.
    pub fn insert(&mut self, id: &str, element: Element) {
        self.elements.insert(id.to_string(), element);
    }

    /// Builder-style element insertion.
    pub fn with_element(mut self, id: &str, text: &str) -> Self {
        self.insert(id, Element::new(text));
        self
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn remove(&mut self, id: &str) -> Option<Element> {
        self.elements.remove(id)
    }

    /// All element ids in order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.elements.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl Document for Page {
    fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    fn text(&self, id: &str) -> Option<&str> {
        self.elements.get(id).map(|e| e.text.as_str())
    }

    fn set_text(&mut self, id: &str, text: &str) -> bool {
        match self.elements.get_mut(id) {
            Some(el) => {
                el.text = text.to_string();
                true
            }
            None => false,
        }
    }

    fn has_class(&self, id: &str, class: &str) -> bool {
        self.elements
            .get(id)
            .is_some_and(|e| e.classes.contains(class))
    }

    fn add_class(&mut self, id: &str, class: &str) -> bool {
        match self.elements.get_mut(id) {
            Some(el) => {
                el.classes.insert(class.to_string());
                true
            }
            None => false,
        }
    }

    fn remove_class(&mut self, id: &str, class: &str) -> bool {
        match self.elements.get_mut(id) {
            Some(el) => {
                el.classes.remove(class);
                true
            }
            None => false,
        }
    }
}
