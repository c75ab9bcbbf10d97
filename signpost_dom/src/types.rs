// Copyright 2025 the Signpost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the document: node identifiers, elements, and head damage.

use alloc::string::String;
use alloc::vec::Vec;

/// Identifier for a node in the document.
///
/// This is a small, copyable handle that stays stable across updates but becomes
/// invalid when the underlying slot is reused.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `NodeId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// ### Liveness
///
/// Use [`Document::is_alive`](crate::Document::is_alive) to check whether a `NodeId` still
/// refers to a live node.
/// Stale `NodeId`s never alias a different live node because the generation must match.
///
/// ### Identity of head elements
///
/// Head upserts keep the `NodeId` of an existing element and only rewrite its
/// attributes, so the same logical tag keeps the same id across navigations.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// A single element: tag name, ordered attributes, and optional text content.
///
/// Tag and attribute names are stored lower-cased.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
}

impl Element {
    /// Create an element with the given tag name.
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: Vec::new(),
            text: None,
        }
    }

    /// Builder form of [`Element::set_attribute`].
    #[must_use]
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Builder form of [`Element::set_text`].
    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        self.set_text(Some(text));
        self
    }

    /// Lower-cased tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns true if the tag name matches, ignoring ASCII case.
    pub fn is(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }

    /// Value of an attribute, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if the attribute is present (with any value).
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Set or overwrite an attribute. Returns true if the stored value changed.
    pub fn set_attribute(&mut self, name: &str, value: &str) -> bool {
        if let Some((_, v)) = self
            .attributes
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
        {
            if v == value {
                return false;
            }
            v.clear();
            v.push_str(value);
            return true;
        }
        self.attributes
            .push((name.to_ascii_lowercase(), String::from(value)));
        true
    }

    /// Remove an attribute. Returns true if it was present.
    pub fn remove_attribute(&mut self, name: &str) -> bool {
        let before = self.attributes.len();
        self.attributes.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        before != self.attributes.len()
    }

    /// Iterate attributes in insertion order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Text content, if any.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Replace the text content. Returns true if it changed.
    pub fn set_text(&mut self, text: Option<&str>) -> bool {
        if self.text.as_deref() == text {
            return false;
        }
        self.text = text.map(String::from);
        true
    }
}

/// Identity of a head element: tag name plus one keying attribute.
///
/// `meta name="description"` is `HeadKey::new("meta", "name", "description")`;
/// a JSON-LD block is `HeadKey::new("script", "type", "application/ld+json")`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct HeadKey<'a> {
    /// Tag name.
    pub tag: &'a str,
    /// Attribute that identifies the element among its siblings.
    pub attribute: &'a str,
    /// Required value of that attribute.
    pub value: &'a str,
}

impl<'a> HeadKey<'a> {
    /// Construct a key.
    pub const fn new(tag: &'a str, attribute: &'a str, value: &'a str) -> Self {
        Self {
            tag,
            attribute,
            value,
        }
    }

    /// Returns true if `element` carries this identity.
    pub fn matches(&self, element: &Element) -> bool {
        element.is(self.tag) && element.attribute(self.attribute) == Some(self.value)
    }
}

/// Head mutations accumulated since the last [`Document::commit`](crate::Document::commit).
///
/// Lets callers assert on "no write happened" without diffing the tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Damage {
    /// Head elements created.
    pub inserted: Vec<NodeId>,
    /// Head elements whose attributes or text changed.
    pub updated: Vec<NodeId>,
    /// Head elements removed.
    pub removed: Vec<NodeId>,
    /// The document title changed.
    pub title_changed: bool,
}

impl Damage {
    /// Returns true if nothing changed.
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty()
            && self.updated.is_empty()
            && self.removed.is_empty()
            && !self.title_changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_names_are_case_insensitive() {
        let mut el = Element::new("A").with_attribute("HREF", "/blog");
        assert_eq!(el.tag(), "a");
        assert_eq!(el.attribute("href"), Some("/blog"));
        assert!(!el.set_attribute("Href", "/blog"), "same value is not a change");
        assert!(el.set_attribute("href", "/about"));
        assert_eq!(el.attributes().count(), 1);
    }

    #[test]
    fn head_key_matches_tag_and_attribute() {
        let el = Element::new("meta").with_attribute("name", "description");
        assert!(HeadKey::new("meta", "name", "description").matches(&el));
        assert!(!HeadKey::new("meta", "property", "description").matches(&el));
        assert!(!HeadKey::new("link", "name", "description").matches(&el));
    }

    #[test]
    fn remove_attribute_reports_presence() {
        let mut el = Element::new("a").with_attribute("download", "");
        assert!(el.remove_attribute("download"));
        assert!(!el.remove_attribute("download"));
        assert!(!el.has_attribute("download"));
    }
}
