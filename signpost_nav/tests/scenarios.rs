// Copyright 2025 the Signpost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end navigation scenarios over the in-memory document.

#![cfg(feature = "dom_adapter")]

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{TimeZone, Utc};
use futures::channel::oneshot;
use futures::executor::{LocalPool, LocalSpawner};
use kurbo::Point;
use serde_json::Value;
use signpost_dom::{Document, Element, NodeId};
use signpost_nav::adapters::dom::{STRUCTURED_DATA_KEY, meta_key, scroll_reset};
use signpost_nav::config::SiteConfig;
use signpost_nav::error::ConfigError;
use signpost_nav::guard::{AccessGuard, GuardRules};
use signpost_nav::head::MetaTag;
use signpost_nav::history::{HistoryBridge, MemoryHistory};
use signpost_nav::intercept::{Activation, Interception, LinkInterceptor};
use signpost_nav::location::{Location, Origin};
use signpost_nav::lookup::{ContentSummary, LookupKind, LookupResult, Lookups};
use signpost_nav::metadata::MetadataSynchronizer;
use signpost_nav::store::NavigationStore;
use signpost_nav::types::{Layout, Principal, Role, RouteMatch, SessionState};

const SITE: &str = "وكالة النمو الرقمي";

type Pending = Rc<RefCell<Vec<(String, oneshot::Sender<LookupResult>)>>>;

struct Harness {
    store: NavigationStore<MemoryHistory, Document, LocalSpawner>,
    pool: LocalPool,
    doc: Rc<RefCell<Document>>,
    renders: Rc<RefCell<Vec<String>>>,
    articles: Pending,
}

impl Harness {
    fn new(start: &str) -> Self {
        let doc = Rc::new(RefCell::new(Document::new()));
        let origin = Origin::parse("https://agency.example").unwrap();
        let backend = MemoryHistory::new(origin, Location::parse(start))
            .with_scroll_hook(scroll_reset(Rc::clone(&doc)));

        let articles: Pending = Rc::new(RefCell::new(Vec::new()));
        let queue = Rc::clone(&articles);
        let lookups = Lookups::new().with(LookupKind::Article, move |slug: String| {
            let (tx, rx) = oneshot::channel();
            queue.borrow_mut().push((slug, tx));
            async move { rx.await.unwrap_or(Ok(None)) }
        });
        let metadata = MetadataSynchronizer::new(Rc::new(SiteConfig::default()), Rc::clone(&doc))
            .with_lookups(lookups);

        let pool = LocalPool::new();
        let renders = Rc::new(RefCell::new(Vec::new()));
        let mut store = NavigationStore::new(HistoryBridge::new(backend), metadata, pool.spawner());
        for layout in Layout::ALL {
            let log = Rc::clone(&renders);
            store = store.with_target(layout, move |route: &RouteMatch| {
                log.borrow_mut()
                    .push(format!("{}/{}", route.layout().as_str(), route.page_key()));
            });
        }
        Self {
            store,
            pool,
            doc,
            renders,
            articles,
        }
    }

    fn sign_in(&mut self, principal: Principal) {
        self.store.set_session(SessionState::Resolved(principal));
        self.pool.run_until_stalled();
    }

    fn complete(&mut self, slug: &str, result: LookupResult) {
        let tx = {
            let mut pending = self.articles.borrow_mut();
            let i = pending.iter().position(|(s, _)| s == slug).unwrap();
            pending.remove(i).1
        };
        tx.send(result).unwrap();
        self.pool.run_until_stalled();
    }

    fn link(&self, href: &str) -> NodeId {
        let mut doc = self.doc.borrow_mut();
        let body = doc.body();
        let a = doc.insert(Some(body), Element::new("a").with_attribute("href", href));
        doc.insert(Some(a), Element::new("span").with_text("label"))
    }

    fn click(&mut self, target: NodeId) -> Interception {
        let interceptor = LinkInterceptor::with_parent(Rc::clone(&self.doc), Rc::clone(&self.doc));
        let out = self.store.activate_link(&interceptor, &Activation::primary(target));
        self.pool.run_until_stalled();
        out
    }

    fn title(&self) -> String {
        String::from(self.doc.borrow().title())
    }

    fn meta(&self, tag: MetaTag) -> Option<String> {
        let doc = self.doc.borrow();
        let id = doc.find_head(meta_key(tag))?;
        doc.element(id)?.attribute("content").map(String::from)
    }

    fn structured_data(&self) -> Value {
        let doc = self.doc.borrow();
        let id = doc.find_head(STRUCTURED_DATA_KEY).unwrap();
        serde_json::from_str(doc.element(id).unwrap().text().unwrap()).unwrap()
    }
}

#[test]
fn home_shows_site_title() {
    let mut h = Harness::new("/");
    h.sign_in(Principal::anonymous());
    assert_eq!(h.title(), SITE);
    assert_eq!(h.meta(MetaTag::OgTitle).as_deref(), Some(SITE));
    assert_eq!(h.structured_data()["@type"], "Organization");
    assert_eq!(*h.renders.borrow(), ["public/home"]);
}

#[test]
fn found_article_gets_author_title_and_article_data() {
    let mut h = Harness::new("/");
    h.sign_in(Principal::anonymous());
    let link = h.link("/blog/launch");
    assert_eq!(h.click(link), Interception::Navigate(Location::parse("/blog/launch")));

    let published = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
    h.complete(
        "launch",
        Ok(Some(
            ContentSummary::new("إطلاق الخدمة", "كل ما تحتاج معرفته")
                .with_author("سارة")
                .with_published(published),
        )),
    );
    assert_eq!(h.title(), format!("إطلاق الخدمة - بقلم سارة | {SITE}"));
    assert_eq!(h.meta(MetaTag::Description).as_deref(), Some("كل ما تحتاج معرفته"));
    let data = h.structured_data();
    assert_eq!(data["@type"], "Article");
    assert_eq!(data["author"]["name"], "سارة");
    assert_eq!(data["datePublished"], "2025-03-01T10:00:00Z");
}

#[test]
fn missing_article_still_renders_with_not_found_title() {
    let mut h = Harness::new("/blog/ghost");
    h.sign_in(Principal::anonymous());
    assert_eq!(*h.renders.borrow(), ["public/article"]);
    h.complete("ghost", Ok(None));
    assert_eq!(h.title(), format!("المقال غير موجود - {SITE}"));
    assert_eq!(
        h.meta(MetaTag::Description),
        Some(SiteConfig::default().default_description)
    );
    assert_eq!(h.structured_data()["@type"], "Organization");
}

#[test]
fn anonymous_visitor_is_sent_to_login_without_flash() {
    let mut h = Harness::new("/dashboard/overview");
    h.sign_in(Principal::anonymous());
    assert_eq!(h.store.current_location().path(), "/login");
    assert_eq!(*h.renders.borrow(), ["public/login"]);
    assert_eq!(h.title(), format!("تسجيل الدخول | {SITE}"));
}

#[test]
fn signed_in_operator_skips_login() {
    let mut h = Harness::new("/login");
    h.sign_in(Principal::signed_in("op-1", Role::Operator));
    assert_eq!(h.store.current_location().path(), "/dashboard/overview");
    assert_eq!(*h.renders.borrow(), ["operator-console/dashboard-overview"]);
    assert_eq!(h.title(), format!("لوحة التحكم | {SITE}"));
}

#[test]
fn rapid_navigation_keeps_the_latest_metadata() {
    let mut h = Harness::new("/");
    h.sign_in(Principal::anonymous());
    let a = h.link("/blog/a");
    let b = h.link("/blog/b");
    h.click(a);
    h.click(b);

    h.complete("b", Ok(Some(ContentSummary::new("B", "b"))));
    assert_eq!(h.title(), format!("B | {SITE}"));
    // The older lookup finishing last must not win.
    h.complete("a", Ok(Some(ContentSummary::new("A", "a"))));
    assert_eq!(h.title(), format!("B | {SITE}"));
    assert_eq!(h.store.current_metadata().map(|m| m.seq), Some(3));
}

#[test]
fn older_lookup_finishing_first_is_also_discarded() {
    let mut h = Harness::new("/");
    h.sign_in(Principal::anonymous());
    h.store.navigate(Location::parse("/blog/a"));
    h.store.navigate(Location::parse("/blog/b"));
    h.complete("a", Ok(Some(ContentSummary::new("A", "a"))));
    assert_eq!(h.title(), SITE, "stale result must not touch the head");
    h.complete("b", Ok(Some(ContentSummary::new("B", "b"))));
    assert_eq!(h.title(), format!("B | {SITE}"));
}

#[test]
fn clicking_the_current_location_is_a_no_op() {
    let mut h = Harness::new("/about");
    h.sign_in(Principal::anonymous());
    let link = h.link("/about");
    let entries = h.store.history().backend().entries().len();
    assert_eq!(h.click(link), Interception::Suppress);
    assert_eq!(h.store.history().backend().entries().len(), entries);
    assert_eq!(*h.renders.borrow(), ["public/about"]);
    assert_eq!(h.store.stats().renders, 1);
}

#[test]
fn no_render_until_session_resolves() {
    let mut h = Harness::new("/portal/invoices");
    h.store.refresh();
    h.pool.run_until_stalled();
    assert!(h.renders.borrow().is_empty());
    assert_eq!(h.title(), "");

    h.sign_in(Principal::signed_in("c-1", Role::Customer));
    assert_eq!(h.store.stats().guard_decisions, 1);
    assert_eq!(*h.renders.borrow(), ["customer-console/portal-invoices"]);
}

#[test]
fn structured_data_stays_single_across_navigations() {
    let mut h = Harness::new("/");
    h.sign_in(Principal::anonymous());
    for path in ["/about", "/services/seo", "/blog/x", "/pricing"] {
        h.store.navigate(Location::parse(path));
        h.pool.run_until_stalled();
        if path == "/blog/x" {
            h.complete("x", Ok(Some(ContentSummary::new("X", "x"))));
        }
        assert_eq!(h.doc.borrow().count_head(STRUCTURED_DATA_KEY), 1, "{path}");
        for tag in MetaTag::ALL {
            assert_eq!(h.doc.borrow().count_head(meta_key(tag)), 1, "{path} {tag:?}");
        }
    }
}

#[test]
fn back_navigation_re_resolves_and_resets_scroll() {
    let mut h = Harness::new("/");
    h.sign_in(Principal::anonymous());
    h.store.navigate(Location::parse("/faq"));
    h.doc.borrow_mut().scroll_to(Point::new(0.0, 1200.0));
    assert!(h.store.back());
    h.pool.run_until_stalled();
    assert_eq!(h.store.current_location(), &Location::root());
    assert_eq!(h.doc.borrow().scroll_offset(), Point::ORIGIN);
    assert_eq!(*h.renders.borrow(), ["public/home", "public/faq", "public/home"]);
    assert_eq!(h.title(), SITE);
}

#[test]
fn navigation_during_session_refresh_discards_the_older_lookup() {
    let customer = Principal::signed_in("c-1", Role::Customer);
    let mut h = Harness::new("/");
    h.sign_in(customer.clone());
    h.store.navigate(Location::parse("/blog/a"));
    h.pool.run_until_stalled();

    h.store.set_session(SessionState::Resolving);
    h.store.navigate(Location::parse("/about"));
    h.complete("a", Ok(Some(ContentSummary::new("A", "a"))));
    assert_eq!(h.title(), SITE, "lookup for a location left behind must not write");

    h.sign_in(customer);
    let about = SiteConfig::default().page("about").unwrap().title.clone();
    assert_eq!(h.title(), format!("{about} | {SITE}"));
    assert_eq!(*h.renders.borrow(), ["public/home", "public/article", "public/about"]);
}

#[test]
fn moved_operator_prefix_never_exposes_the_console() {
    let source = "[guard]\noperator_prefix = \"/admin\"\noperator_home = \"/admin/overview\"\n";
    assert!(matches!(
        SiteConfig::from_toml_str(source),
        Err(ConfigError::UnguardedConsole { section: "dashboard", .. })
    ));

    // Rules built in code skip loading; the store still refuses the console.
    let rules = GuardRules {
        operator_prefix: String::from("/admin"),
        operator_home: String::from("/admin/overview"),
        ..GuardRules::default()
    };
    let mut h = Harness::new("/dashboard/users");
    h.store = h.store.with_guard(AccessGuard::new(rules));
    h.sign_in(Principal::anonymous());
    assert!(h.renders.borrow().is_empty());
    assert_eq!(h.store.stats().refused, 1);
    assert_eq!(h.title(), "");
}
