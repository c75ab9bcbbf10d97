// Copyright 2025 the Signpost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Signpost Nav: the single-page navigation core of the agency platform.
//!
//! ## Overview
//!
//! This crate turns link activations and history traversals into rendered
//! pages without a full reload. It does not render anything and does not talk
//! to the remote store itself; render targets, content lookups, the session
//! source, and the document head are collaborators behind narrow traits.
//!
//! ## Components
//!
//! - [`history`]: the [`HistoryBridge`](history::HistoryBridge), sole accessor of the current
//!   [`Location`](location::Location), with push/replace/traversal and ordered change listeners.
//! - [`intercept`]: the [`LinkInterceptor`](intercept::LinkInterceptor) walks from an activation
//!   target to the nearest anchor and decides whether to handle it in-app.
//! - [`guard`]: the [`AccessGuard`](guard::AccessGuard), a pure role/prefix decision.
//! - [`resolve`]: the [`RouteResolver`](resolve::RouteResolver), an ordered first-match table
//!   with a home fallback.
//! - [`metadata`]: the [`MetadataSynchronizer`](metadata::MetadataSynchronizer), which computes
//!   title, meta tags, and JSON-LD per navigation and drops stale results.
//! - [`store`]: the [`NavigationStore`](store::NavigationStore) composition root.
//!
//! ## Workflow
//!
//! 1) A click bubbles to the document root. The interceptor finds the anchor and,
//!    for a same-origin unmodified activation, returns a location to push.
//! 2) The store pushes it and settles: guard (redirects replace the entry and
//!    are re-guarded), resolve, mount/render, then issue a sequence number.
//! 3) The metadata synchronizer runs on the local executor. Its write is
//!    skipped if a newer sequence number was issued meanwhile.
//!
//! Back/forward traversals enter at step 2 through
//! [`NavigationStore::history_popped`](store::NavigationStore::history_popped).
//!
//! ## Features
//!
//! - `dom_adapter` (default): head sink and element lookups for `signpost_dom`.
//! - `web`: `web-sys` history, head, spawner, and listeners for `wasm32`.
//!
//! Everything is single-threaded; shared state uses `Rc` and `RefCell`.

pub mod adapters;
pub mod config;
pub mod error;
pub mod guard;
pub mod head;
pub mod history;
pub mod intercept;
pub mod location;
pub mod lookup;
pub mod metadata;
pub mod mount;
pub mod resolve;
pub mod store;
pub mod types;
