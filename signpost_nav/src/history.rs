// Copyright 2025 the Signpost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! History bridge: the single accessor for "where the application is".
//!
//! ## Overview
//!
//! The browser address bar is ambient global state. [`HistoryBridge`] wraps it
//! behind a [`HistoryBackend`] and an explicit subscription list, so every read
//! goes through [`HistoryBridge::current`] and every change is delivered to
//! listeners in the order it happens.
//!
//! - [`HistoryBridge::push`] and [`HistoryBridge::replace`] update the address without reloading.
//! - [`HistoryBridge::go`] moves through the stack. Backends that move synchronously
//!   (like [`MemoryHistory`]) report the new location at once; the browser reports it
//!   later and the embedder forwards it to [`HistoryBridge::popped`].
//! - After any change the viewport scroll resets to the document origin.
//!
//! ## Minimal example
//!
//! ```
//! use signpost_nav::history::{HistoryBridge, MemoryHistory};
//! use signpost_nav::location::{Location, Origin};
//!
//! let origin = Origin::parse("https://agency.example").unwrap();
//! let mut history = HistoryBridge::new(MemoryHistory::new(origin, Location::root()));
//! assert!(history.push(Location::parse("/blog")));
//! assert!(!history.push(Location::parse("/blog")), "same location is not re-pushed");
//! assert!(history.go(-1));
//! assert_eq!(history.current().path(), "/");
//! ```

use core::fmt;

use crate::location::{Location, Origin};

/// Storage behind the history bridge: a browser history or an in-memory stack.
pub trait HistoryBackend {
    /// Origin of the document.
    fn origin(&self) -> Origin;
    /// Location of the current entry.
    fn location(&self) -> Location;
    /// Append an entry after the current one, discarding any forward entries.
    fn push(&mut self, location: &Location);
    /// Overwrite the current entry.
    fn replace(&mut self, location: &Location);
    /// Move `delta` entries through the stack.
    ///
    /// Returns the new location if the move completed synchronously, `None` if
    /// it is out of range or will be reported later.
    fn go(&mut self, delta: isize) -> Option<Location>;
    /// Reset the viewport scroll position to the document origin.
    fn scroll_to_origin(&mut self);
}

/// Why the current location changed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChangeCause {
    /// A new entry was pushed.
    Push,
    /// The current entry was replaced (guard redirects).
    Replace,
    /// Back/forward traversal.
    Pop,
}

/// A change delivered to history listeners.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryChange {
    /// The new current location.
    pub location: Location,
    /// What caused the change.
    pub cause: ChangeCause,
}

/// Handle returned by [`HistoryBridge::on_change`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&HistoryChange)>;

/// Observable wrapper around a [`HistoryBackend`].
pub struct HistoryBridge<B> {
    backend: B,
    current: Location,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl<B: fmt::Debug> fmt::Debug for HistoryBridge<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryBridge")
            .field("backend", &self.backend)
            .field("current", &self.current)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl<B: HistoryBackend> HistoryBridge<B> {
    /// Wrap `backend`, taking its current entry as the current location.
    pub fn new(backend: B) -> Self {
        let current = backend.location();
        Self {
            backend,
            current,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    /// The current location.
    pub fn current(&self) -> &Location {
        &self.current
    }

    /// Origin of the document.
    pub fn origin(&self) -> Origin {
        self.backend.origin()
    }

    /// The wrapped backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Register a listener invoked on every push, replace, and traversal.
    ///
    /// Listeners run in registration order.
    pub fn on_change(&mut self, listener: impl FnMut(&HistoryChange) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Detach a listener. Returns false if it was not registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        before != self.listeners.len()
    }

    /// Push `location`. Returns false, without touching the backend, if it is already current.
    pub fn push(&mut self, location: Location) -> bool {
        if location == self.current {
            return false;
        }
        self.backend.push(&location);
        self.apply(location, ChangeCause::Push);
        true
    }

    /// Replace the current entry with `location`. Returns false if it is already current.
    pub fn replace(&mut self, location: Location) -> bool {
        if location == self.current {
            return false;
        }
        self.backend.replace(&location);
        self.apply(location, ChangeCause::Replace);
        true
    }

    /// Move `delta` entries. Returns true if the move completed synchronously.
    pub fn go(&mut self, delta: isize) -> bool {
        match self.backend.go(delta) {
            Some(location) => {
                self.apply(location, ChangeCause::Pop);
                true
            }
            None => false,
        }
    }

    /// Record a traversal reported by the backend (the browser's `popstate`).
    pub fn popped(&mut self, location: Location) {
        self.apply(location, ChangeCause::Pop);
    }

    fn apply(&mut self, location: Location, cause: ChangeCause) {
        tracing::trace!(location = %location, ?cause, "history changed");
        self.current = location;
        self.backend.scroll_to_origin();
        let change = HistoryChange {
            location: self.current.clone(),
            cause,
        };
        for (_, listener) in &mut self.listeners {
            listener(&change);
        }
    }
}

/// An in-memory history stack with a cursor.
pub struct MemoryHistory {
    origin: Origin,
    entries: Vec<Location>,
    cursor: usize,
    scroll_resets: usize,
    scroll_hook: Option<Box<dyn FnMut()>>,
}

impl fmt::Debug for MemoryHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryHistory")
            .field("origin", &self.origin)
            .field("entries", &self.entries)
            .field("cursor", &self.cursor)
            .field("scroll_resets", &self.scroll_resets)
            .finish_non_exhaustive()
    }
}

impl MemoryHistory {
    /// A stack holding only `initial`.
    pub fn new(origin: Origin, initial: Location) -> Self {
        Self {
            origin,
            entries: vec![initial],
            cursor: 0,
            scroll_resets: 0,
            scroll_hook: None,
        }
    }

    /// Run `hook` whenever the scroll position is reset.
    #[must_use]
    pub fn with_scroll_hook(mut self, hook: impl FnMut() + 'static) -> Self {
        self.scroll_hook = Some(Box::new(hook));
        self
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[Location] {
        &self.entries
    }

    /// Index of the current entry.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// How many times the scroll position was reset.
    pub fn scroll_resets(&self) -> usize {
        self.scroll_resets
    }
}

impl HistoryBackend for MemoryHistory {
    fn origin(&self) -> Origin {
        self.origin.clone()
    }

    fn location(&self) -> Location {
        self.entries[self.cursor].clone()
    }

    fn push(&mut self, location: &Location) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(location.clone());
        self.cursor = self.entries.len() - 1;
    }

    fn replace(&mut self, location: &Location) {
        self.entries[self.cursor] = location.clone();
    }

    fn go(&mut self, delta: isize) -> Option<Location> {
        if delta == 0 {
            return None;
        }
        let target = self.cursor.checked_add_signed(delta)?;
        if target >= self.entries.len() {
            return None;
        }
        self.cursor = target;
        Some(self.entries[target].clone())
    }

    fn scroll_to_origin(&mut self) {
        self.scroll_resets += 1;
        if let Some(hook) = &mut self.scroll_hook {
            hook();
        }
    }
}
