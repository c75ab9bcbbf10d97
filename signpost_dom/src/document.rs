// Copyright 2025 the Signpost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core document implementation: structure, updates, head upserts, queries.

use alloc::string::String;
use alloc::vec::Vec;
use kurbo::Point;

use crate::types::{Damage, Element, HeadKey, NodeId};

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// A headless document: `html` root with `head` and `body`, a title, and a scroll offset.
pub struct Document {
    nodes: Vec<Option<Node>>, // slots
    generations: Vec<u32>,    // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    root: NodeId,
    head: NodeId,
    body: NodeId,
    title: String,
    scroll: Point,
    damage: Damage,
}

impl core::fmt::Debug for Document {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Document")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("title", &self.title)
            .field("scroll", &self.scroll)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    element: Element,
}

impl Node {
    fn new(generation: u32, element: Element) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            element,
        }
    }
}

impl Document {
    /// Create an empty document with `html`, `head`, and `body` elements.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: NodeId::new(0, 0),
            head: NodeId::new(0, 0),
            body: NodeId::new(0, 0),
            title: String::new(),
            scroll: Point::ORIGIN,
            damage: Damage::default(),
        };
        doc.root = doc.insert(None, Element::new("html"));
        doc.head = doc.insert(Some(doc.root), Element::new("head"));
        doc.body = doc.insert(Some(doc.root), Element::new("body"));
        doc
    }

    /// The `html` element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The `head` element.
    pub fn head(&self) -> NodeId {
        self.head
    }

    /// The `body` element.
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Insert a new element as the last child of `parent` (or detached if `None`).
    ///
    /// A stale `parent` leaves the new element detached.
    pub fn insert(&mut self, parent: Option<NodeId>, element: Element) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, element));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId indices are 32-bit."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, element)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId indices are 32-bit."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = NodeId::new(idx, generation);
        if let Some(p) = parent
            && self.is_alive(p)
        {
            self.link_parent(id, p);
        }
        id
    }

    /// Remove an element (and its subtree).
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).and_then(|n| n.parent) {
            self.unlink_parent(id, parent);
        }
        let children = self.node(id).map(|n| n.children.clone()).unwrap_or_default();
        for child in children {
            self.remove(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Returns true if `id` refers to a live node.
    ///
    /// A `NodeId` is considered live if its slot exists and its generation matches
    /// the current generation stored in that slot.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// The element behind `id`, if live.
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.node(id).map(|n| &n.element)
    }

    /// Parent of `id`, if any.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Children of `id` in document order. Empty for stale ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Set an attribute on a live element. Head elements record damage.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        let in_head = self.parent_of(id) == Some(self.head);
        let changed = match self.node_mut(id) {
            Some(n) => n.element.set_attribute(name, value),
            None => return,
        };
        if changed && in_head {
            self.record_update(id);
        }
    }

    /// Path from the root to `id` (inclusive). Empty for stale ids.
    pub fn path_to_root(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cur = Some(id);
        while let Some(n) = cur {
            if !self.is_alive(n) {
                break;
            }
            out.push(n);
            cur = self.parent_of(n);
        }
        out.reverse();
        out
    }

    /// Document title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Replace the document title.
    pub fn set_title(&mut self, title: &str) {
        if self.title != title {
            self.title.clear();
            self.title.push_str(title);
            self.damage.title_changed = true;
        }
    }

    /// Current scroll offset of the viewport.
    pub fn scroll_offset(&self) -> Point {
        self.scroll
    }

    /// Scroll the viewport to `offset`.
    pub fn scroll_to(&mut self, offset: Point) {
        self.scroll = offset;
    }

    /// Find the head child carrying `key`.
    pub fn find_head(&self, key: HeadKey<'_>) -> Option<NodeId> {
        self.children(self.head)
            .iter()
            .copied()
            .find(|&c| self.element(c).is_some_and(|e| key.matches(e)))
    }

    /// Number of head children carrying `key`.
    pub fn count_head(&self, key: HeadKey<'_>) -> usize {
        self.children(self.head)
            .iter()
            .filter(|&&c| self.element(c).is_some_and(|e| key.matches(e)))
            .count()
    }

    /// Create-or-update the head element identified by `key` and set one attribute on it.
    ///
    /// Returns the element's id; an existing element keeps its id.
    pub fn upsert_head_attribute(&mut self, key: HeadKey<'_>, name: &str, value: &str) -> NodeId {
        let id = self.ensure_head(key);
        self.set_attribute(id, name, value);
        id
    }

    /// Create-or-update the head element identified by `key` and set its text.
    pub fn upsert_head_text(&mut self, key: HeadKey<'_>, text: &str) -> NodeId {
        let id = self.ensure_head(key);
        let changed = self
            .node_mut(id)
            .is_some_and(|n| n.element.set_text(Some(text)));
        if changed {
            self.record_update(id);
        }
        id
    }

    /// Remove every head element carrying `key`. Returns how many were removed.
    pub fn remove_head(&mut self, key: HeadKey<'_>) -> usize {
        let ids: Vec<NodeId> = self
            .children(self.head)
            .iter()
            .copied()
            .filter(|&c| self.element(c).is_some_and(|e| key.matches(e)))
            .collect();
        for &id in &ids {
            self.remove(id);
            self.damage.removed.push(id);
        }
        ids.len()
    }

    /// Return and reset the head damage accumulated since the last commit.
    pub fn commit(&mut self) -> Damage {
        core::mem::take(&mut self.damage)
    }

    // --- internals ---

    fn ensure_head(&mut self, key: HeadKey<'_>) -> NodeId {
        if let Some(id) = self.find_head(key) {
            return id;
        }
        let id = self.insert(
            Some(self.head),
            Element::new(key.tag).with_attribute(key.attribute, key.value),
        );
        self.damage.inserted.push(id);
        id
    }

    fn record_update(&mut self, id: NodeId) {
        if !self.damage.inserted.contains(&id) && !self.damage.updated.contains(&id) {
            self.damage.updated.push(id);
        }
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId) {
        if let Some(p) = self.node_mut(parent) {
            p.children.push(id);
        }
        if let Some(n) = self.node_mut(id) {
            n.parent = Some(parent);
        }
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        if let Some(n) = self.node_mut(id) {
            n.parent = None;
        }
    }
}
