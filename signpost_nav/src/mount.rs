// Copyright 2025 the Signpost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mount state: compute unmount/mount transitions between routes.
//!
//! ## Usage
//!
//! 1) Resolve a location to a [`RouteMatch`].
//! 2) Build its layout→page path with [`MountNode::path_for`].
//! 3) Call [`MountState::update_path`] to get `Unmount(..)` / `Mount(..)` transitions.
//!
//! A layout shared by the old and new route stays mounted; only the page below
//! it changes.
//!
//! ## Minimal example
//!
//! ```
//! use signpost_nav::mount::{MountEvent, MountState};
//! let mut m: MountState<&str> = MountState::new();
//! assert_eq!(
//!     m.update_path(&["public", "home"]),
//!     vec![MountEvent::Mount("public"), MountEvent::Mount("home")]
//! );
//! assert_eq!(
//!     m.update_path(&["public", "blog"]),
//!     vec![MountEvent::Unmount("home"), MountEvent::Mount("blog")]
//! );
//! ```

use crate::types::{Layout, RouteMatch};

/// One level of the mounted tree.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum MountNode {
    /// A top-level layout.
    Layout(Layout),
    /// A page inside a layout, identified by key and parameter.
    Page {
        /// Page variant key.
        key: &'static str,
        /// Lookup parameter, if any.
        param: Option<String>,
    },
}

impl MountNode {
    /// The layout→page path of `route`.
    pub fn path_for(route: &RouteMatch) -> [Self; 2] {
        [
            Self::Layout(route.layout()),
            Self::Page {
                key: route.page_key(),
                param: route.param().map(String::from),
            },
        ]
    }
}

/// A mount transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MountEvent<K> {
    /// Mount the node (outer→inner).
    Mount(K),
    /// Unmount the node (inner→outer).
    Unmount(K),
}

/// Tracks the mounted root→leaf path and diffs it against new paths.
///
/// Ordering semantics:
/// - Unmounts are emitted from inner-most to outer-most.
/// - Mounts are emitted from outer-most to inner-most.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MountState<K> {
    current: Vec<K>,
}

impl<K: Clone + Eq> MountState<K> {
    /// Nothing mounted.
    pub fn new() -> Self {
        Self {
            current: Vec::new(),
        }
    }

    /// The mounted root→leaf path.
    pub fn current_path(&self) -> &[K] {
        &self.current
    }

    /// Unmount everything, inner-most first.
    pub fn clear(&mut self) -> Vec<MountEvent<K>> {
        let out = self
            .current
            .iter()
            .rev()
            .cloned()
            .map(MountEvent::Unmount)
            .collect();
        self.current.clear();
        out
    }

    /// Move to `new_path`, returning the transitions required.
    pub fn update_path(&mut self, new_path: &[K]) -> Vec<MountEvent<K>> {
        // Shared prefix stays mounted.
        let keep = self
            .current
            .iter()
            .zip(new_path)
            .take_while(|(a, b)| a == b)
            .count();

        let mut out = Vec::new();
        for k in self.current[keep..].iter().rev() {
            out.push(MountEvent::Unmount(k.clone()));
        }
        for k in &new_path[keep..] {
            out.push(MountEvent::Mount(k.clone()));
        }

        self.current.clear();
        self.current.extend_from_slice(new_path);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Location;
    use crate::resolve::RouteResolver;

    fn path(p: &str) -> [MountNode; 2] {
        MountNode::path_for(&RouteResolver::default().resolve(&Location::parse(p)))
    }

    fn page(key: &'static str, param: Option<&str>) -> MountNode {
        MountNode::Page {
            key,
            param: param.map(String::from),
        }
    }

    #[test]
    fn fresh_mount_is_outer_to_inner() {
        let mut m = MountState::new();
        assert_eq!(
            m.update_path(&path("/")),
            vec![
                MountEvent::Mount(MountNode::Layout(Layout::Public)),
                MountEvent::Mount(page("home", None)),
            ]
        );
    }

    #[test]
    fn same_layout_keeps_layout_mounted() {
        let mut m = MountState::new();
        let _ = m.update_path(&path("/blog/a"));
        assert_eq!(
            m.update_path(&path("/blog/b")),
            vec![
                MountEvent::Unmount(page("article", Some("a"))),
                MountEvent::Mount(page("article", Some("b"))),
            ]
        );
    }

    #[test]
    fn layout_change_unmounts_inner_first() {
        let mut m = MountState::new();
        let _ = m.update_path(&path("/login"));
        assert_eq!(
            m.update_path(&path("/dashboard/overview")),
            vec![
                MountEvent::Unmount(page("login", None)),
                MountEvent::Unmount(MountNode::Layout(Layout::Public)),
                MountEvent::Mount(MountNode::Layout(Layout::OperatorConsole)),
                MountEvent::Mount(page("dashboard-overview", None)),
            ]
        );
    }

    #[test]
    fn same_page_is_quiet() {
        let mut m = MountState::new();
        let _ = m.update_path(&path("/services"));
        // Unknown sub-page resolves to the same index page.
        assert!(m.update_path(&path("/services/unknown")).is_empty());
    }

    #[test]
    fn clear_unmounts_inner_to_outer() {
        let mut m: MountState<u32> = MountState::new();
        let _ = m.update_path(&[1, 2]);
        assert_eq!(m.clear(), vec![MountEvent::Unmount(2), MountEvent::Unmount(1)]);
        assert!(m.current_path().is_empty());
    }
}
