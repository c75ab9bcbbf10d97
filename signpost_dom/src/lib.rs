// Copyright 2025 the Signpost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Signpost DOM: a headless document model for the Signpost navigation core.
//!
//! The navigation core never touches a browser directly. It walks element
//! ancestry through a parent lookup and writes discoverability metadata through
//! a head sink. This crate provides both on top of a small in-memory tree, so
//! navigation can be tested, benchmarked, and demoed without a browser.
//!
//! - Represents an `html` root with `head` and `body`, a document title, and a viewport
//!   scroll offset.
//! - Elements carry a tag name, ordered attributes, and optional text.
//! - Head elements are addressed by identity ([`HeadKey`]): upserts rewrite an existing element
//!   in place and never leave a second copy behind.
//! - [`Document::commit`] returns the head [`Damage`] since the previous commit, which is how tests
//!   assert that a write did or did not happen.
//!
//! ## API overview
//!
//! - [`Document`]: container managing nodes, title, and scroll offset.
//! - [`Element`]: per-node tag, attributes, and text.
//! - [`NodeId`]: generational handle of a node.
//! - [`HeadKey`]: identity of a head element (tag plus one keying attribute).
//!
//! ### Minimal usage
//!
//! ```
//! use signpost_dom::{Document, Element, HeadKey};
//!
//! let mut doc = Document::new();
//! let nav = doc.insert(Some(doc.body()), Element::new("nav"));
//! let link = doc.insert(Some(nav), Element::new("a").with_attribute("href", "/blog"));
//! assert_eq!(doc.path_to_root(link), vec![doc.root(), doc.body(), nav, link]);
//!
//! let description = HeadKey::new("meta", "name", "description");
//! let first = doc.upsert_head_attribute(description, "content", "Growth marketing");
//! let again = doc.upsert_head_attribute(description, "content", "Paid ads");
//! assert_eq!(first, again);
//! assert_eq!(doc.count_head(description), 1);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod document;
mod types;

pub use document::Document;
pub use types::{Damage, Element, HeadKey, NodeId};
