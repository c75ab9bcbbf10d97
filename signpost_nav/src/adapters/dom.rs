// Copyright 2025 the Signpost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapter for the Signpost DOM document model.
//!
//! ## Feature
//!
//! Enable with `dom_adapter` (on by default).
//!
//! ## Notes
//!
//! [`Document`] becomes a [`HeadSink`], a [`ParentLookup`], and an
//! [`AnchorLookup`] over its [`NodeId`]s. The lookups are also implemented
//! for `RefCell<Document>`, borrowing only for the duration of one call, so a
//! document shared with the metadata synchronizer can be walked by the link
//! interceptor through an `Rc<RefCell<Document>>`.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::Point;
use signpost_dom::{Document, HeadKey, NodeId};

use crate::head::{HeadSink, MetaTag, STRUCTURED_DATA_TYPE};
use crate::types::{Anchor, AnchorLookup, ParentLookup};

/// Identity of the structured-data script.
pub const STRUCTURED_DATA_KEY: HeadKey<'static> =
    HeadKey::new("script", "type", STRUCTURED_DATA_TYPE);

/// Identity of the head element for `tag`.
pub const fn meta_key(tag: MetaTag) -> HeadKey<'static> {
    HeadKey::new("meta", tag.key_attribute(), tag.key())
}

impl HeadSink for Document {
    fn set_title(&mut self, title: &str) {
        Self::set_title(self, title);
    }

    fn upsert_meta(&mut self, tag: MetaTag, content: &str) {
        self.upsert_head_attribute(meta_key(tag), "content", content);
    }

    fn replace_structured_data(&mut self, json: Option<&str>) {
        match json {
            Some(json) => {
                // Collapse duplicates left by server rendering before the upsert.
                if self.count_head(STRUCTURED_DATA_KEY) > 1 {
                    self.remove_head(STRUCTURED_DATA_KEY);
                }
                self.upsert_head_text(STRUCTURED_DATA_KEY, json);
            }
            None => {
                self.remove_head(STRUCTURED_DATA_KEY);
            }
        }
    }
}

impl ParentLookup<NodeId> for Document {
    fn parent_of(&self, node: &NodeId) -> Option<NodeId> {
        Self::parent_of(self, *node)
    }
}

impl AnchorLookup<NodeId> for Document {
    fn anchor_of(&self, node: &NodeId) -> Option<Anchor> {
        let element = self.element(*node)?;
        if !(element.is("a") || element.is("area")) {
            return None;
        }
        Some(Anchor {
            href: String::from(element.attribute("href")?),
            target: element.attribute("target").map(String::from),
            download: element.has_attribute("download"),
        })
    }
}

impl ParentLookup<NodeId> for RefCell<Document> {
    fn parent_of(&self, node: &NodeId) -> Option<NodeId> {
        self.borrow().parent_of(*node)
    }
}

impl AnchorLookup<NodeId> for RefCell<Document> {
    fn anchor_of(&self, node: &NodeId) -> Option<Anchor> {
        AnchorLookup::anchor_of(&*self.borrow(), node)
    }
}

/// A scroll hook for [`MemoryHistory`](crate::history::MemoryHistory) that
/// resets the document's viewport to the origin.
pub fn scroll_reset(document: Rc<RefCell<Document>>) -> impl FnMut() + 'static {
    move || document.borrow_mut().scroll_to(Point::ORIGIN)
}
