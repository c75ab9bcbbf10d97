// Copyright 2025 the Signpost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Link interception: turn in-app anchor activations into history pushes.
//!
//! ## Usage
//!
//! 1) Attach one pointer-activation listener at the document root.
//! 2) For each event, build an [`Activation`] from the event target, button,
//!    modifier keys, and whether another handler already prevented the default.
//! 3) Call [`LinkInterceptor::intercept`] with the document origin and the current location.
//!    - [`Interception::Navigate`]: cancel the default and push the location.
//!    - [`Interception::Suppress`]: cancel the default and do nothing else.
//!    - [`Interception::PassThrough`]: leave the event to the browser.
//!
//! ## Minimal example
//!
//! ```
//! use signpost_nav::intercept::{Activation, Interception, LinkInterceptor};
//! use signpost_nav::location::{Location, Origin};
//! use signpost_nav::types::{Anchor, AnchorLookup, ParentLookup};
//!
//! // Node 2 is a `span` inside the anchor node 1.
//! struct Anchors;
//! impl AnchorLookup<u32> for Anchors {
//!     fn anchor_of(&self, n: &u32) -> Option<Anchor> {
//!         (*n == 1).then(|| Anchor::new("/blog/launch"))
//!     }
//! }
//! struct Parents;
//! impl ParentLookup<u32> for Parents {
//!     fn parent_of(&self, n: &u32) -> Option<u32> {
//!         (*n == 2).then_some(1)
//!     }
//! }
//!
//! let interceptor = LinkInterceptor::with_parent(Anchors, Parents);
//! let origin = Origin::parse("https://agency.example").unwrap();
//! let out = interceptor.intercept(&Activation::primary(2), &origin, &Location::root());
//! assert_eq!(out, Interception::Navigate(Location::parse("/blog/launch")));
//! ```

use core::marker::PhantomData;

use crate::location::{Location, Origin, resolve_href};
use crate::types::{Anchor, AnchorLookup, Modifiers, NoParent, ParentLookup, PointerButton};

/// A pointer activation that reached the document root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Activation<K> {
    /// The event target (innermost node).
    pub target: K,
    /// Which button produced the activation.
    pub button: PointerButton,
    /// Modifier keys held.
    pub modifiers: Modifiers,
    /// Whether an earlier handler already prevented the default action.
    pub default_prevented: bool,
}

impl<K> Activation<K> {
    /// An unmodified primary-button activation on `target`.
    pub fn primary(target: K) -> Self {
        Self {
            target,
            button: PointerButton::Primary,
            modifiers: Modifiers::empty(),
            default_prevented: false,
        }
    }

    /// Set the held modifier keys.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Set the pointer button.
    #[must_use]
    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }
}

/// Why an activation was left to the browser.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PassReason {
    /// No anchor encloses the target.
    NoAnchor,
    /// Not the primary button.
    NotPrimaryButton,
    /// Another handler already prevented the default.
    DefaultPrevented,
    /// A modifier key was held.
    ModifierHeld,
    /// The anchor asks for another browsing context.
    NewBrowsingContext,
    /// The anchor carries a `download` attribute.
    Download,
    /// The href does not resolve to an HTTP(S) URL.
    NotHttp,
    /// The href resolves to another origin.
    CrossOrigin,
}

/// Outcome of [`LinkInterceptor::intercept`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Interception {
    /// Cancel the default and push this location.
    Navigate(Location),
    /// Cancel the default; the link points at the current location.
    Suppress,
    /// Let the browser handle the activation.
    PassThrough(PassReason),
}

impl Interception {
    /// Whether the caller should cancel the event's default action.
    pub fn prevents_default(&self) -> bool {
        !matches!(self, Self::PassThrough(_))
    }
}

/// Finds the anchor enclosing an activation target and decides whether to
/// handle it in-app.
///
/// Walks from the target towards the root with a [`ParentLookup`] and asks
/// an [`AnchorLookup`] at each step, the same way a responder chain rebuilds
/// a target's ancestry. Ancestry is assumed acyclic.
pub struct LinkInterceptor<K, A: AnchorLookup<K>, P: ParentLookup<K> = NoParent> {
    anchors: A,
    parent: P,
    _phantom: PhantomData<fn() -> K>,
}

impl<K, A: AnchorLookup<K>, P: ParentLookup<K>> core::fmt::Debug for LinkInterceptor<K, A, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LinkInterceptor").finish_non_exhaustive()
    }
}

impl<K, A: AnchorLookup<K>, P: ParentLookup<K> + Default> LinkInterceptor<K, A, P> {
    /// Create an interceptor with a default parent lookup.
    pub fn new(anchors: A) -> Self {
        Self::with_parent(anchors, P::default())
    }
}

impl<K, A: AnchorLookup<K>, P: ParentLookup<K>> LinkInterceptor<K, A, P> {
    /// Create an interceptor with an explicit parent lookup provider.
    pub fn with_parent(anchors: A, parent: P) -> Self {
        Self {
            anchors,
            parent,
            _phantom: PhantomData,
        }
    }

    /// The anchor lookup.
    pub fn anchors(&self) -> &A {
        &self.anchors
    }

    /// Nearest anchor at or above `target`, with the node that carries it.
    pub fn find_anchor(&self, target: K) -> Option<(K, Anchor)> {
        let mut cur = target;
        loop {
            if let Some(anchor) = self.anchors.anchor_of(&cur) {
                return Some((cur, anchor));
            }
            cur = self.parent.parent_of(&cur)?;
        }
    }

    /// Decide what to do with `activation`.
    ///
    /// Event-level checks run before the anchor walk, so a modified click on
    /// a deep target costs nothing.
    pub fn intercept(
        &self,
        activation: &Activation<K>,
        origin: &Origin,
        current: &Location,
    ) -> Interception
    where
        K: Clone,
    {
        if activation.default_prevented {
            return Interception::PassThrough(PassReason::DefaultPrevented);
        }
        if activation.button != PointerButton::Primary {
            return Interception::PassThrough(PassReason::NotPrimaryButton);
        }
        if !activation.modifiers.is_empty() {
            return Interception::PassThrough(PassReason::ModifierHeld);
        }
        match self.find_anchor(activation.target.clone()) {
            Some((_, anchor)) => decide(&anchor, origin, current),
            None => Interception::PassThrough(PassReason::NoAnchor),
        }
    }
}

/// Decide the outcome for an unmodified primary activation of `anchor`.
pub fn decide(anchor: &Anchor, origin: &Origin, current: &Location) -> Interception {
    if anchor.download {
        return Interception::PassThrough(PassReason::Download);
    }
    if anchor.opens_new_context() {
        return Interception::PassThrough(PassReason::NewBrowsingContext);
    }
    let Some((target_origin, location)) = resolve_href(origin, current, &anchor.href) else {
        return Interception::PassThrough(PassReason::NotHttp);
    };
    if target_origin != *origin {
        return Interception::PassThrough(PassReason::CrossOrigin);
    }
    if location == *current {
        tracing::trace!(location = %location, "link to current location suppressed");
        return Interception::Suppress;
    }
    Interception::Navigate(location)
}
