// Copyright 2025 the Signpost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Navigation basics.
//!
//! Wire a store over the in-memory document, click a few links, go back, and
//! print what each layout rendered along with the resulting head.
//!
//! Run:
//! - `cargo run -p signpost_demos --example navigation_basics`
//! - `RUST_LOG=signpost_nav=debug cargo run -p signpost_demos --example navigation_basics`

use std::cell::RefCell;
use std::rc::Rc;

use futures::executor::LocalPool;
use signpost_dom::{Document, Element};
use signpost_nav::adapters::dom::scroll_reset;
use signpost_nav::config::SiteConfig;
use signpost_nav::history::{HistoryBridge, MemoryHistory};
use signpost_nav::intercept::{Activation, LinkInterceptor};
use signpost_nav::location::{Location, Origin};
use signpost_nav::metadata::MetadataSynchronizer;
use signpost_nav::store::{NavigationStore, RenderTarget};
use signpost_nav::types::{Layout, Principal, RouteMatch, SessionState};
use tracing_subscriber::EnvFilter;

struct Printer(Layout);

impl RenderTarget for Printer {
    fn mount(&mut self) {
        println!("  mount   {}", self.0.as_str());
    }

    fn render(&mut self, route: &RouteMatch) {
        match route.param() {
            Some(param) => println!("  render  {}/{} ({param})", self.0.as_str(), route.page_key()),
            None => println!("  render  {}/{}", self.0.as_str(), route.page_key()),
        }
    }

    fn unmount(&mut self) {
        println!("  unmount {}", self.0.as_str());
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let doc = Rc::new(RefCell::new(Document::new()));
    let Some(origin) = Origin::parse("https://agency.example") else {
        return;
    };
    let backend = MemoryHistory::new(origin, Location::root())
        .with_scroll_hook(scroll_reset(Rc::clone(&doc)));
    let metadata = MetadataSynchronizer::new(Rc::new(SiteConfig::default()), Rc::clone(&doc));

    let mut pool = LocalPool::new();
    let mut store = NavigationStore::new(HistoryBridge::new(backend), metadata, pool.spawner());
    for layout in Layout::ALL {
        store = store.with_target(layout, Printer(layout));
    }

    println!("== Session resolves ==");
    store.set_session(SessionState::Resolved(Principal::anonymous()));
    pool.run_until_stalled();

    // A few links in the body; clicks land on the label inside each anchor.
    let labels: Vec<_> = ["/services/seo", "/portfolio", "https://elsewhere.example/", "/pricing"]
        .into_iter()
        .map(|href| {
            let mut d = doc.borrow_mut();
            let body = d.body();
            let a = d.insert(Some(body), Element::new("a").with_attribute("href", href));
            (href, d.insert(Some(a), Element::new("span").with_text(href)))
        })
        .collect();

    let interceptor = LinkInterceptor::with_parent(Rc::clone(&doc), Rc::clone(&doc));
    for (href, label) in labels {
        println!("== Click {href} ==");
        let outcome = store.activate_link(&interceptor, &Activation::primary(label));
        pool.run_until_stalled();
        println!("  outcome {outcome:?}");
        println!("  title   {}", doc.borrow().title());
    }

    println!("== Back ==");
    store.back();
    pool.run_until_stalled();
    println!("  at      {}", store.current_location().href());
    println!("  title   {}", doc.borrow().title());

    println!("== Stats ==");
    println!("  {:?}", store.stats());
}
