// Copyright 2025 the Signpost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Guard redirects.
//!
//! Evaluate the access guard for each role against a handful of locations,
//! then show the store following a redirect chain without rendering the
//! intermediate location.
//!
//! Run:
//! - `cargo run -p signpost_demos --example guard_redirects`

use std::cell::RefCell;
use std::rc::Rc;

use futures::executor::LocalPool;
use signpost_nav::config::SiteConfig;
use signpost_nav::guard::{AccessGuard, GuardDecision, GuardRules};
use signpost_nav::head::MemoryHead;
use signpost_nav::history::{HistoryBridge, MemoryHistory};
use signpost_nav::location::{Location, Origin};
use signpost_nav::metadata::MetadataSynchronizer;
use signpost_nav::store::NavigationStore;
use signpost_nav::types::{Layout, Principal, Role, RouteMatch, SessionState};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("signpost_nav=info"))
        .init();

    let guard = AccessGuard::new(GuardRules::default());
    let principals = [
        ("anonymous", Principal::anonymous()),
        ("operator", Principal::signed_in("op-1", Role::Operator)),
        ("customer", Principal::signed_in("c-1", Role::Customer)),
    ];
    let paths = ["/", "/login", "/dashboard/users", "/portal/invoices", "/blog/launch"];

    println!("== Guard table ==");
    for (name, principal) in &principals {
        for path in paths {
            let verdict = match guard.decide(principal, &Location::parse(path)) {
                GuardDecision::Allow => String::from("allow"),
                GuardDecision::Redirect(to) => format!("-> {}", to.href()),
            };
            println!("  {name:<9} {path:<18} {verdict}");
        }
    }

    println!("== Store: customer opens the operator dashboard ==");
    let Some(origin) = Origin::parse("https://agency.example") else {
        return;
    };
    let history = HistoryBridge::new(MemoryHistory::new(origin, Location::parse("/dashboard/ads")));
    let head = Rc::new(RefCell::new(MemoryHead::new()));
    let metadata = MetadataSynchronizer::new(Rc::new(SiteConfig::default()), Rc::clone(&head));
    let mut pool = LocalPool::new();
    let mut store = NavigationStore::new(history, metadata, pool.spawner());
    for layout in Layout::ALL {
        store = store.with_target(layout, move |route: &RouteMatch| {
            println!("  render {}/{}", layout.as_str(), route.page_key());
        });
    }

    store.refresh();
    println!("  resolving session, withheld: {}", store.stats().withheld);
    store.set_session(SessionState::Resolved(principals[2].1.clone()));
    pool.run_until_stalled();

    println!("  at     {}", store.current_location().href());
    println!("  title  {}", head.borrow().title());
    println!("  entries {:?}", store.history().backend().entries());
    println!("  {:?}", store.stats());
}
