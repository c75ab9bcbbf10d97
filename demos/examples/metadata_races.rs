// Copyright 2025 the Signpost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Metadata races.
//!
//! Two article lookups are started back to back and completed in reverse
//! order. Only the newer navigation's record reaches the head.
//!
//! Run:
//! - `RUST_LOG=signpost_nav=debug cargo run -p signpost_demos --example metadata_races`

use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::executor::LocalPool;
use signpost_nav::config::SiteConfig;
use signpost_nav::head::{MemoryHead, MetaTag};
use signpost_nav::history::{HistoryBridge, MemoryHistory};
use signpost_nav::location::{Location, Origin};
use signpost_nav::lookup::{ContentSummary, LookupKind, LookupResult, Lookups};
use signpost_nav::metadata::MetadataSynchronizer;
use signpost_nav::store::NavigationStore;
use signpost_nav::types::{Principal, SessionState};
use tracing_subscriber::EnvFilter;

type Pending = Rc<RefCell<Vec<(String, oneshot::Sender<LookupResult>)>>>;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let pending: Pending = Rc::new(RefCell::new(Vec::new()));
    let queue = Rc::clone(&pending);
    let lookups = Lookups::new().with(LookupKind::Article, move |slug: String| {
        let (tx, rx) = oneshot::channel();
        queue.borrow_mut().push((slug, tx));
        async move { rx.await.unwrap_or(Ok(None)) }
    });

    let Some(origin) = Origin::parse("https://agency.example") else {
        return;
    };
    let history = HistoryBridge::new(MemoryHistory::new(origin, Location::root()));
    let head = Rc::new(RefCell::new(MemoryHead::new()));
    let metadata = MetadataSynchronizer::new(Rc::new(SiteConfig::default()), Rc::clone(&head))
        .with_lookups(lookups);
    let mut pool = LocalPool::new();
    let mut store = NavigationStore::new(history, metadata, pool.spawner());

    store.set_session(SessionState::Resolved(Principal::anonymous()));
    store.navigate(Location::parse("/blog/first-post"));
    store.navigate(Location::parse("/blog/second-post"));
    pool.run_until_stalled();
    println!("in flight: {}", pending.borrow().len());

    // Newest first, then the older one.
    let mut in_flight: Vec<_> = pending.borrow_mut().drain(..).collect();
    while let Some((slug, tx)) = in_flight.pop() {
        let summary = ContentSummary::new(format!("Post {slug}"), format!("About {slug}"))
            .with_author("فريق التحرير");
        let _ = tx.send(Ok(Some(summary)));
        pool.run_until_stalled();
        println!("completed {slug}: title = {}", head.borrow().title());
    }

    let head = head.borrow();
    println!("description: {:?}", head.meta(MetaTag::Description));
    println!("settled seq: {:?}", store.current_metadata().map(|s| s.seq));
    println!("head writes: {}", head.writes());
}
