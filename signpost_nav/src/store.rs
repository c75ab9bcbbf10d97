// Copyright 2025 the Signpost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Navigation store: the composition root.
//!
//! ## Overview
//!
//! [`NavigationStore`] owns the history bridge and runs one *settle* pass
//! after every change to the location or the session:
//!
//! 1) While the session is resolving, nothing is decided or rendered. If the
//!    location has moved on from the last rendered one, that location's
//!    pending metadata is retired so it cannot land late.
//! 2) The access guard runs against the current location. A redirect replaces
//!    the history entry and the guard runs again for the new location; the
//!    redirected location is never rendered.
//! 3) The allowed location is resolved to a [`RouteMatch`]. A console layout
//!    the principal's role may not see is refused and everything unmounts;
//!    otherwise layouts are mounted/unmounted as needed and the route's layout
//!    renders it.
//! 4) A new sequence number is issued and the metadata synchronization for
//!    it is spawned on the local executor.
//!
//! ## Minimal example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use futures::executor::LocalPool;
//! use signpost_nav::config::SiteConfig;
//! use signpost_nav::head::MemoryHead;
//! use signpost_nav::history::{HistoryBridge, MemoryHistory};
//! use signpost_nav::location::{Location, Origin};
//! use signpost_nav::metadata::MetadataSynchronizer;
//! use signpost_nav::store::NavigationStore;
//! use signpost_nav::types::{Principal, SessionState};
//!
//! let origin = Origin::parse("https://agency.example").unwrap();
//! let history = HistoryBridge::new(MemoryHistory::new(origin, Location::parse("/dashboard")));
//! let head = Rc::new(RefCell::new(MemoryHead::new()));
//! let metadata = MetadataSynchronizer::new(Rc::new(SiteConfig::default()), Rc::clone(&head));
//! let mut pool = LocalPool::new();
//! let mut store = NavigationStore::new(history, metadata, pool.spawner());
//!
//! store.set_session(SessionState::Resolved(Principal::anonymous()));
//! pool.run_until_stalled();
//! assert_eq!(store.current_location().path(), "/login");
//! assert_eq!(head.borrow().title(), "تسجيل الدخول | وكالة النمو الرقمي");
//! ```

use std::collections::BTreeMap;
use std::fmt;

use futures::task::{LocalSpawn, LocalSpawnExt};

use crate::guard::{AccessGuard, GuardDecision};
use crate::head::HeadSink;
use crate::history::{HistoryBackend, HistoryBridge, HistoryChange, ListenerId};
use crate::intercept::{Activation, Interception, LinkInterceptor};
use crate::location::Location;
use crate::metadata::{MetadataSynchronizer, Settled};
use crate::mount::{MountEvent, MountNode, MountState};
use crate::resolve::RouteResolver;
use crate::types::{
    AnchorLookup, Layout, NavigationEvent, ParentLookup, Principal, RouteMatch, SessionState,
};

/// Upper bound on guard redirects followed in one settle pass.
pub const MAX_REDIRECT_HOPS: usize = 8;

/// A layout's renderer. The navigation core renders nothing itself.
pub trait RenderTarget {
    /// The layout became visible.
    fn mount(&mut self) {}
    /// Render `route` inside the layout.
    fn render(&mut self, route: &RouteMatch);
    /// The layout is no longer visible.
    fn unmount(&mut self) {}
}

impl<F: FnMut(&RouteMatch)> RenderTarget for F {
    fn render(&mut self, route: &RouteMatch) {
        self(route);
    }
}

/// Counters describing what the store has done.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NavigationStats {
    /// Guard evaluations.
    pub guard_decisions: u64,
    /// Redirects followed.
    pub redirects: u64,
    /// Settled navigations rendered.
    pub renders: u64,
    /// Settle passes withheld because the session was resolving.
    pub withheld: u64,
    /// Metadata computations handed to the executor.
    pub syncs_spawned: u64,
    /// Renders refused because the route's layout does not admit the role.
    pub refused: u64,
}

/// Owns the current location and drives guard, resolver, rendering, and metadata.
pub struct NavigationStore<B, H, S> {
    history: HistoryBridge<B>,
    guard: AccessGuard,
    resolver: RouteResolver,
    metadata: MetadataSynchronizer<H>,
    spawner: S,
    targets: BTreeMap<Layout, Box<dyn RenderTarget>>,
    session: SessionState,
    mounts: MountState<MountNode>,
    route: Option<RouteMatch>,
    latest: Option<NavigationEvent>,
    stats: NavigationStats,
}

impl<B: fmt::Debug, H, S> fmt::Debug for NavigationStore<B, H, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationStore")
            .field("history", &self.history)
            .field("session", &self.session)
            .field("route", &self.route)
            .field("latest", &self.latest)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl<B, H, S> NavigationStore<B, H, S>
where
    B: HistoryBackend,
    H: HeadSink + 'static,
    S: LocalSpawn,
{
    /// A store with the site guard rules and route table, waiting for the session.
    pub fn new(history: HistoryBridge<B>, metadata: MetadataSynchronizer<H>, spawner: S) -> Self {
        let guard = AccessGuard::new(metadata.config().guard.clone());
        Self {
            history,
            guard,
            resolver: RouteResolver::default(),
            metadata,
            spawner,
            targets: BTreeMap::new(),
            session: SessionState::Resolving,
            mounts: MountState::new(),
            route: None,
            latest: None,
            stats: NavigationStats::default(),
        }
    }

    /// Use `guard` instead of the configured rules.
    #[must_use]
    pub fn with_guard(mut self, guard: AccessGuard) -> Self {
        self.guard = guard;
        self
    }

    /// Use `resolver` instead of the site route table.
    #[must_use]
    pub fn with_resolver(mut self, resolver: RouteResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Render `layout` through `target`.
    #[must_use]
    pub fn with_target(mut self, layout: Layout, target: impl RenderTarget + 'static) -> Self {
        self.targets.insert(layout, Box::new(target));
        self
    }

    /// The current location.
    pub fn current_location(&self) -> &Location {
        self.history.current()
    }

    /// The last rendered route.
    pub fn current_route(&self) -> Option<&RouteMatch> {
        self.route.as_ref()
    }

    /// The mounted layout→page path.
    pub fn mounted(&self) -> &[MountNode] {
        self.mounts.current_path()
    }

    /// The latest issued navigation event.
    pub fn latest_event(&self) -> Option<&NavigationEvent> {
        self.latest.as_ref()
    }

    /// The session snapshot.
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Counters.
    pub fn stats(&self) -> NavigationStats {
        self.stats
    }

    /// The metadata synchronizer.
    pub fn metadata(&self) -> &MetadataSynchronizer<H> {
        &self.metadata
    }

    /// The last written metadata record.
    pub fn current_metadata(&self) -> Option<Settled> {
        self.metadata.current()
    }

    /// The history bridge.
    pub fn history(&self) -> &HistoryBridge<B> {
        &self.history
    }

    /// Observe history changes.
    pub fn on_history_change(
        &mut self,
        listener: impl FnMut(&HistoryChange) + 'static,
    ) -> ListenerId {
        self.history.on_change(listener)
    }

    /// Stop observing history changes.
    pub fn remove_history_listener(&mut self, id: ListenerId) -> bool {
        self.history.remove_listener(id)
    }

    /// Deliver a new session snapshot. An unchanged snapshot is ignored.
    pub fn set_session(&mut self, session: SessionState) {
        if session == self.session {
            return;
        }
        let role = session.principal().map(|p| p.role.as_str());
        tracing::debug!(?role, "session changed");
        self.session = session;
        self.settle();
    }

    /// Push `location` and settle. Returns false if it was already current.
    pub fn navigate(&mut self, location: Location) -> bool {
        if !self.history.push(location) {
            return false;
        }
        self.settle();
        true
    }

    /// Run a pointer activation through `interceptor`, navigating if it asks to.
    pub fn activate_link<K, A, P>(
        &mut self,
        interceptor: &LinkInterceptor<K, A, P>,
        activation: &Activation<K>,
    ) -> Interception
    where
        K: Clone,
        A: AnchorLookup<K>,
        P: ParentLookup<K>,
    {
        let origin = self.history.origin();
        let outcome = interceptor.intercept(activation, &origin, self.history.current());
        if let Interception::Navigate(location) = &outcome {
            self.navigate(location.clone());
        }
        outcome
    }

    /// The backend reported a back/forward traversal.
    pub fn history_popped(&mut self, location: Location) {
        self.history.popped(location);
        self.settle();
    }

    /// Go back one entry. Returns true if the move completed synchronously.
    pub fn back(&mut self) -> bool {
        self.traverse(-1)
    }

    /// Go forward one entry. Returns true if the move completed synchronously.
    pub fn forward(&mut self) -> bool {
        self.traverse(1)
    }

    fn traverse(&mut self, delta: isize) -> bool {
        if !self.history.go(delta) {
            return false;
        }
        self.settle();
        true
    }

    /// Re-run the settle pass for the current location.
    ///
    /// Called internally after every change; embedders only need it once the
    /// render targets are attached after the session was already resolved.
    pub fn refresh(&mut self) {
        self.settle();
    }

    fn settle(&mut self) {
        let span = tracing::debug_span!(
            "navigation",
            path = %self.history.current(),
            seq = tracing::field::Empty
        );
        let _guard = span.enter();

        let Some(principal) = self.session.principal().cloned() else {
            self.stats.withheld += 1;
            tracing::debug!("session resolving, render withheld");
            self.invalidate_pending();
            return;
        };
        if !self.follow_redirects(&principal) {
            self.invalidate_pending();
            return;
        }

        let location = self.history.current().clone();
        if self.is_settled(&location) {
            tracing::trace!("location already settled");
            return;
        }

        let route = self.resolver.resolve(&location);
        tracing::debug!(layout = route.layout().as_str(), page = route.page_key(), "resolved");
        if !route.layout().admits(principal.role) {
            tracing::error!(
                layout = route.layout().as_str(),
                role = principal.role.as_str(),
                "layout not admitted for role, render refused"
            );
            self.stats.refused += 1;
            self.unmount_all();
            self.route = None;
            self.metadata.gate().issue();
            return;
        }
        self.apply_mounts(&route);
        if let Some(target) = self.targets.get_mut(&route.layout()) {
            target.render(&route);
        }
        self.stats.renders += 1;

        let seq = self.metadata.gate().issue();
        span.record("seq", seq);
        self.latest = Some(NavigationEvent { seq, location });
        let sync = self.metadata.synchronize(&route, seq);
        self.route = Some(route);
        match self.spawner.spawn_local(async move {
            let _ = sync.await;
        }) {
            Ok(()) => self.stats.syncs_spawned += 1,
            Err(err) => tracing::warn!(%err, "failed to spawn metadata synchronization"),
        }
    }

    /// Whether `location` was the last rendered location and its metadata is
    /// still the latest issued.
    fn is_settled(&self, location: &Location) -> bool {
        self.route.is_some()
            && self.latest.as_ref().is_some_and(|e| {
                e.location == *location && self.metadata.gate().is_current(e.seq)
            })
    }

    /// Retire the sequence number of the last rendered location once the
    /// current location has moved away from it without settling.
    fn invalidate_pending(&self) {
        let gate = self.metadata.gate();
        if let Some(event) = &self.latest
            && gate.is_current(event.seq)
            && event.location != *self.history.current()
        {
            let seq = gate.issue();
            tracing::debug!(seq, "pending metadata invalidated");
        }
    }

    /// Returns true once the current location is allowed.
    fn follow_redirects(&mut self, principal: &Principal) -> bool {
        let mut visited: Vec<Location> = Vec::new();
        loop {
            let location = self.history.current().clone();
            self.stats.guard_decisions += 1;
            let target = match self.guard.decide(principal, &location) {
                GuardDecision::Allow => {
                    tracing::debug!(path = location.path(), "guard allowed");
                    return true;
                }
                GuardDecision::Redirect(target) => target,
            };
            tracing::info!(
                from = location.path(),
                to = target.path(),
                role = principal.role.as_str(),
                "guard redirect"
            );
            visited.push(location);
            if visited.len() > MAX_REDIRECT_HOPS || visited.contains(&target) {
                tracing::error!(
                    to = target.path(),
                    hops = visited.len(),
                    "guard redirect loop, navigation abandoned"
                );
                return false;
            }
            self.stats.redirects += 1;
            self.history.replace(target);
        }
    }

    fn apply_mounts(&mut self, route: &RouteMatch) {
        let events = self.mounts.update_path(&MountNode::path_for(route));
        self.dispatch_mounts(events);
    }

    fn unmount_all(&mut self) {
        let events = self.mounts.clear();
        self.dispatch_mounts(events);
    }

    fn dispatch_mounts(&mut self, events: Vec<MountEvent<MountNode>>) {
        for event in events {
            tracing::trace!(?event, "mount transition");
            match event {
                MountEvent::Mount(MountNode::Layout(layout)) => {
                    if let Some(target) = self.targets.get_mut(&layout) {
                        target.mount();
                    }
                }
                MountEvent::Unmount(MountNode::Layout(layout)) => {
                    if let Some(target) = self.targets.get_mut(&layout) {
                        target.unmount();
                    }
                }
                MountEvent::Mount(MountNode::Page { .. })
                | MountEvent::Unmount(MountNode::Page { .. }) => {}
            }
        }
    }
}
