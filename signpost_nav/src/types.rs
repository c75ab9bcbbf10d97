// Copyright 2025 the Signpost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for navigation: principals, layouts, route matches, events, and lookups.
//!
//! ## Overview
//!
//! These types describe the navigation protocol and its inputs/outputs.
//! They are shared by the [`guard`](crate::guard), [`resolve`](crate::resolve),
//! [`intercept`](crate::intercept), and [`store`](crate::store) modules.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::location::Location;

/// Role of the principal driving access decisions.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Not signed in.
    #[default]
    Anonymous,
    /// Agency staff using the operator console.
    Operator,
    /// A client using the customer portal.
    Customer,
}

impl Role {
    /// Lower-case name used in configuration and logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Anonymous => "anonymous",
            Self::Operator => "operator",
            Self::Customer => "customer",
        }
    }
}

/// The authenticated (or anonymous) identity supplied by the session collaborator.
///
/// Only [`Principal::role`] participates in navigation decisions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Principal {
    /// Account identifier, if signed in.
    pub id: Option<String>,
    /// Role used by the access guard.
    pub role: Role,
    /// Opaque identity key from the session provider.
    pub identity_key: Option<String>,
}

impl Principal {
    /// An anonymous visitor.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A signed-in principal with `role`.
    pub fn signed_in(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: Some(id.into()),
            role,
            identity_key: None,
        }
    }

    /// Attach the session provider's identity key.
    #[must_use]
    pub fn with_identity_key(mut self, key: impl Into<String>) -> Self {
        self.identity_key = Some(key.into());
        self
    }
}

/// Snapshot of the principal source.
///
/// `Resolving` corresponds to the source's `loading` flag: the store withholds
/// guard evaluation and rendering until it settles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// The principal is still being resolved (initial load, token refresh).
    Resolving,
    /// The principal is known.
    Resolved(Principal),
}

impl SessionState {
    /// The settled principal, if any.
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Self::Resolving => None,
            Self::Resolved(p) => Some(p),
        }
    }
}

/// Top-level layout a page renders into.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layout {
    /// Public marketing site and blog.
    Public,
    /// Agency operator dashboard.
    OperatorConsole,
    /// Client portal.
    CustomerConsole,
}

impl Layout {
    /// Every layout, in declaration order.
    pub const ALL: [Self; 3] = [Self::Public, Self::OperatorConsole, Self::CustomerConsole];

    /// Whether a principal with `role` may see this layout.
    pub const fn admits(self, role: Role) -> bool {
        match self {
            Self::Public => true,
            Self::OperatorConsole => matches!(role, Role::Operator),
            Self::CustomerConsole => matches!(role, Role::Customer),
        }
    }

    /// Kebab-case name used in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::OperatorConsole => "operator-console",
            Self::CustomerConsole => "customer-console",
        }
    }
}

/// The resolved layout/page/parameter tuple for a location.
///
/// Produced by [`RouteResolver::resolve`](crate::resolve::RouteResolver::resolve);
/// created fresh per navigation and never mutated.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RouteMatch {
    layout: Layout,
    segments: Vec<String>,
    page_key: &'static str,
    param: Option<String>,
}

impl RouteMatch {
    pub(crate) fn new(
        layout: Layout,
        segments: Vec<String>,
        page_key: &'static str,
        param: Option<String>,
    ) -> Self {
        Self {
            layout,
            segments,
            page_key,
            param,
        }
    }

    /// Layout the page renders into.
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Raw, non-empty path segments of the location.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Page variant key, such as `home` or `article`.
    pub fn page_key(&self) -> &'static str {
        self.page_key
    }

    /// Percent-decoded lookup parameter for parameterized pages.
    pub fn param(&self) -> Option<&str> {
        self.param.as_deref()
    }
}

/// A sequence number plus the location that triggered it.
///
/// Issued once per settled navigation; metadata computations carry `seq` and
/// are discarded if a newer event has been issued by the time they finish.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationEvent {
    /// Monotonic sequence number, starting at 1.
    pub seq: u64,
    /// Location that was resolved.
    pub location: Location,
}

/// Look up the parent of a node to walk from an event target towards the root.
///
/// The [link interceptor](crate::intercept::LinkInterceptor) consults this to
/// find the anchor enclosing an activation target.
pub trait ParentLookup<K> {
    /// Returns the parent of `node`, or `None` if `node` is a root.
    fn parent_of(&self, node: &K) -> Option<K>;
}

/// A no‑op parent provider: every node is its own root.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoParent;

impl<K> ParentLookup<K> for NoParent {
    #[inline]
    fn parent_of(&self, _node: &K) -> Option<K> {
        None
    }
}

impl<K, T: ParentLookup<K> + ?Sized> ParentLookup<K> for &T {
    fn parent_of(&self, node: &K) -> Option<K> {
        (**self).parent_of(node)
    }
}

impl<K, T: ParentLookup<K> + ?Sized> ParentLookup<K> for Rc<T> {
    fn parent_of(&self, node: &K) -> Option<K> {
        (**self).parent_of(node)
    }
}

/// The navigation-relevant attributes of an anchor-like element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Anchor {
    /// Raw `href`, possibly relative.
    pub href: String,
    /// Raw `target` attribute, if present.
    pub target: Option<String>,
    /// Whether a `download` attribute is present.
    pub download: bool,
}

impl Anchor {
    /// An anchor with only an `href`.
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            ..Self::default()
        }
    }

    /// Returns true if the anchor asks for another browsing context.
    ///
    /// Any target other than empty or `_self` does.
    pub fn opens_new_context(&self) -> bool {
        self.target
            .as_deref()
            .map(str::trim)
            .is_some_and(|t| !t.is_empty() && !t.eq_ignore_ascii_case("_self"))
    }
}

/// Report whether a node is anchor-like and, if so, its attributes.
pub trait AnchorLookup<K> {
    /// Returns the anchor attributes of `node` if it is an anchor with an `href`.
    fn anchor_of(&self, node: &K) -> Option<Anchor>;
}

impl<K, T: AnchorLookup<K> + ?Sized> AnchorLookup<K> for &T {
    fn anchor_of(&self, node: &K) -> Option<Anchor> {
        (**self).anchor_of(node)
    }
}

impl<K, T: AnchorLookup<K> + ?Sized> AnchorLookup<K> for Rc<T> {
    fn anchor_of(&self, node: &K) -> Option<Anchor> {
        (**self).anchor_of(node)
    }
}

bitflags::bitflags! {
    /// Modifier keys held during a pointer activation.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Control key.
        const CTRL  = 0b0000_0001;
        /// Meta / command key.
        const META  = 0b0000_0010;
        /// Shift key (new window in most browsers).
        const SHIFT = 0b0000_0100;
        /// Alt / option key (download in some browsers).
        const ALT   = 0b0000_1000;
    }
}

/// Pointer button that produced an activation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PointerButton {
    /// Main button, usually the left button.
    #[default]
    Primary,
    /// Auxiliary button, usually the wheel (new tab on anchors).
    Auxiliary,
    /// Secondary button, usually the right button.
    Secondary,
    /// Any other button index.
    Other(i16),
}

impl PointerButton {
    /// Map a DOM `MouseEvent.button` index.
    pub const fn from_index(index: i16) -> Self {
        match index {
            0 => Self::Primary,
            1 => Self::Auxiliary,
            2 => Self::Secondary,
            n => Self::Other(n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchor_new_context_targets() {
        let mut a = Anchor::new("/blog");
        assert!(!a.opens_new_context());
        for (target, expected) in [
            ("", false),
            ("_self", false),
            ("_SELF", false),
            ("_blank", true),
            ("preview", true),
            ("_parent", true),
        ] {
            a.target = Some(String::from(target));
            assert_eq!(a.opens_new_context(), expected, "target={target:?}");
        }
    }

    #[test]
    fn consoles_admit_only_their_role() {
        for role in [Role::Anonymous, Role::Operator, Role::Customer] {
            assert!(Layout::Public.admits(role));
        }
        assert!(Layout::OperatorConsole.admits(Role::Operator));
        assert!(!Layout::OperatorConsole.admits(Role::Customer));
        assert!(!Layout::OperatorConsole.admits(Role::Anonymous));
        assert!(Layout::CustomerConsole.admits(Role::Customer));
        assert!(!Layout::CustomerConsole.admits(Role::Operator));
    }

    #[test]
    fn role_serde_is_lowercase() {
        let role: Role = serde_json::from_str("\"operator\"").unwrap();
        assert_eq!(role, Role::Operator);
        assert_eq!(serde_json::to_string(&Role::Customer).unwrap(), "\"customer\"");
    }

    #[test]
    fn session_principal_only_when_resolved() {
        assert!(SessionState::Resolving.principal().is_none());
        let s = SessionState::Resolved(Principal::signed_in("u-1", Role::Customer));
        assert_eq!(s.principal().map(|p| p.role), Some(Role::Customer));
    }

    #[test]
    fn pointer_button_from_index() {
        assert_eq!(PointerButton::from_index(0), PointerButton::Primary);
        assert_eq!(PointerButton::from_index(1), PointerButton::Auxiliary);
        assert_eq!(PointerButton::from_index(7), PointerButton::Other(7));
    }
}
