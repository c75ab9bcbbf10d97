// Copyright 2025 the Signpost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Metadata synchronization: compute a [`MetadataRecord`] per navigation and
//! project it into the document head.
//!
//! ## Overview
//!
//! Every settled navigation gets a sequence number from a shared
//! [`SequenceGate`]. [`MetadataSynchronizer::synchronize`] starts the content
//! lookup for parameterized pages at once and returns a future that builds the
//! record and writes it. Right before writing, the future checks that its
//! sequence number is still the latest issued one; if a newer navigation has
//! started, the result is dropped without touching the head.
//!
//! Lookups are not cancellable. A lookup that never completes simply never
//! writes.
//!
//! ## Records
//!
//! - Static pages use their configured entry and `Organization` structured data.
//! - A found article, author, or customer uses the looked-up summary with
//!   `Article`, `Person`, or `CreativeWork` structured data.
//! - A missing resource, or a failed lookup, uses the kind's not-found title
//!   with the default description.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::future::Future;
use std::rc::Rc;

use chrono::SecondsFormat;
use serde_json::{Value, json};

use crate::config::SiteConfig;
use crate::head::{HeadSink, MetaTag};
use crate::lookup::{ContentSummary, LookupKind, Lookups};
use crate::resolve::pages;
use crate::types::RouteMatch;

/// Open Graph object type.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum OgType {
    /// Any non-content page.
    #[default]
    Website,
    /// A blog article.
    Article,
    /// A person.
    Profile,
}

impl OgType {
    /// Value of the `og:type` tag.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Website => "website",
            Self::Article => "article",
            Self::Profile => "profile",
        }
    }
}

/// Discoverability metadata for one location. Superseded wholesale, never merged.
#[derive(Clone, Debug, PartialEq)]
pub struct MetadataRecord {
    /// Full document title.
    pub title: String,
    /// Short description.
    pub description: String,
    /// Keywords, first occurrence order, no duplicates.
    pub keywords: Vec<String>,
    /// Preview image URL.
    pub image: String,
    /// Open Graph object type.
    pub og_type: OgType,
    /// schema.org JSON-LD document.
    pub structured_data: Option<Value>,
}

impl MetadataRecord {
    /// Record for a page served from the static table.
    pub fn for_page(config: &SiteConfig, page_key: &str) -> Self {
        let entry = config.page(page_key);
        let title = match entry {
            Some(page) if page_key != pages::HOME => suffixed(&page.title, config),
            _ => config.site_title.clone(),
        };
        let description = entry
            .and_then(|p| p.description.clone())
            .unwrap_or_else(|| config.default_description.clone());
        let keywords = match entry {
            Some(p) if !p.keywords.is_empty() => dedup(&p.keywords),
            _ => dedup(&config.default_keywords),
        };
        Self {
            title,
            description,
            keywords,
            image: config.default_image.clone(),
            og_type: OgType::Website,
            structured_data: Some(organization(config)),
        }
    }

    /// Record for a found resource of `kind`.
    pub fn for_content(config: &SiteConfig, kind: LookupKind, summary: &ContentSummary) -> Self {
        let image = summary
            .image
            .clone()
            .unwrap_or_else(|| config.default_image.clone());
        let (title, og_type, data) = match kind {
            LookupKind::Article => {
                let title = match &summary.author {
                    Some(author) => suffixed(&format!("{} - بقلم {author}", summary.title), config),
                    None => suffixed(&summary.title, config),
                };
                (title, OgType::Article, article(config, summary, &image))
            }
            LookupKind::Author => (
                suffixed(&summary.title, config),
                OgType::Profile,
                json!({
                    "@context": "https://schema.org",
                    "@type": "Person",
                    "name": summary.title,
                    "description": summary.description,
                    "image": image,
                }),
            ),
            LookupKind::Customer => (
                suffixed(&summary.title, config),
                OgType::Website,
                json!({
                    "@context": "https://schema.org",
                    "@type": "CreativeWork",
                    "name": summary.title,
                    "description": summary.description,
                    "image": image,
                    "creator": { "@type": "Organization", "name": config.organization.name },
                }),
            ),
        };
        Self {
            title,
            description: summary.description.clone(),
            keywords: dedup(&config.default_keywords),
            image,
            og_type,
            structured_data: Some(data),
        }
    }

    /// Record for a missing resource of `kind`.
    pub fn not_found(config: &SiteConfig, kind: LookupKind) -> Self {
        Self {
            title: format!("{} - {}", config.not_found_title(kind), config.site_title),
            description: config.default_description.clone(),
            keywords: dedup(&config.default_keywords),
            image: config.default_image.clone(),
            og_type: OgType::Website,
            structured_data: Some(organization(config)),
        }
    }

    /// Write this record through `head`.
    pub fn project(&self, head: &mut impl HeadSink) {
        head.set_title(&self.title);
        for tag in MetaTag::ALL {
            let content = match tag {
                MetaTag::Description | MetaTag::OgDescription => self.description.clone(),
                MetaTag::Keywords => self.keywords.join(", "),
                MetaTag::OgTitle => self.title.clone(),
                MetaTag::OgImage => self.image.clone(),
                MetaTag::OgType => String::from(self.og_type.as_str()),
            };
            head.upsert_meta(tag, &content);
        }
        let json = self.structured_data.as_ref().map(Value::to_string);
        head.replace_structured_data(json.as_deref());
    }
}

fn suffixed(title: &str, config: &SiteConfig) -> String {
    format!("{title} | {}", config.site_title)
}

fn dedup(keywords: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(keywords.len());
    for k in keywords {
        if !out.contains(k) {
            out.push(k.clone());
        }
    }
    out
}

fn organization(config: &SiteConfig) -> Value {
    let org = &config.organization;
    json!({
        "@context": "https://schema.org",
        "@type": "Organization",
        "name": org.name,
        "url": config.base_url,
        "logo": org.logo,
        "sameAs": org.same_as,
    })
}

fn article(config: &SiteConfig, summary: &ContentSummary, image: &str) -> Value {
    let mut data = json!({
        "@context": "https://schema.org",
        "@type": "Article",
        "headline": summary.title,
        "description": summary.description,
        "image": image,
        "publisher": {
            "@type": "Organization",
            "name": config.organization.name,
            "logo": { "@type": "ImageObject", "url": config.organization.logo },
        },
    });
    if let Some(author) = &summary.author {
        data["author"] = json!({ "@type": "Person", "name": author });
    }
    if let Some(published) = summary.published {
        data["datePublished"] = json!(published.to_rfc3339_opts(SecondsFormat::Secs, true));
    }
    data
}

/// Monotonic navigation counter shared by the store and the synchronizer.
///
/// Compared at write time in place of a lock: only the holder of the latest
/// issued number may write.
#[derive(Clone, Debug, Default)]
pub struct SequenceGate(Rc<Cell<u64>>);

impl SequenceGate {
    /// A gate that has issued nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next sequence number, starting at 1.
    pub fn issue(&self) -> u64 {
        let next = self.0.get() + 1;
        self.0.set(next);
        next
    }

    /// Latest issued number, 0 before the first.
    pub fn latest(&self) -> u64 {
        self.0.get()
    }

    /// Whether `seq` is the latest issued number.
    pub fn is_current(&self, seq: u64) -> bool {
        self.0.get() == seq
    }
}

/// The record currently projected into the head.
#[derive(Clone, Debug, PartialEq)]
pub struct Settled {
    /// Sequence number of the navigation that produced it.
    pub seq: u64,
    /// The record.
    pub record: MetadataRecord,
}

/// Outcome of one synchronization.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The record was written.
    Applied,
    /// A newer navigation started first; nothing was written.
    Stale,
}

/// Computes and writes metadata records.
pub struct MetadataSynchronizer<H> {
    config: Rc<SiteConfig>,
    lookups: Lookups,
    head: Rc<RefCell<H>>,
    gate: SequenceGate,
    settled: Rc<RefCell<Option<Settled>>>,
}

impl<H> fmt::Debug for MetadataSynchronizer<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataSynchronizer")
            .field("lookups", &self.lookups)
            .field("latest", &self.gate.latest())
            .finish_non_exhaustive()
    }
}

impl<H: HeadSink + 'static> MetadataSynchronizer<H> {
    /// A synchronizer writing to `head`, with no lookups registered.
    pub fn new(config: Rc<SiteConfig>, head: Rc<RefCell<H>>) -> Self {
        Self {
            config,
            lookups: Lookups::new(),
            head,
            gate: SequenceGate::new(),
            settled: Rc::new(RefCell::new(None)),
        }
    }

    /// Use `lookups` for parameterized pages.
    #[must_use]
    pub fn with_lookups(mut self, lookups: Lookups) -> Self {
        self.lookups = lookups;
        self
    }

    /// The sequence gate; the store issues numbers from it.
    pub fn gate(&self) -> &SequenceGate {
        &self.gate
    }

    /// The site configuration.
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// The head sink.
    pub fn head(&self) -> &Rc<RefCell<H>> {
        &self.head
    }

    /// The last written record and its sequence number.
    pub fn current(&self) -> Option<Settled> {
        self.settled.borrow().clone()
    }

    /// Compute the record for `route` under sequence number `seq` and write it
    /// unless a newer number has been issued by then.
    ///
    /// The lookup, if any, starts before this returns.
    pub fn synchronize(
        &self,
        route: &RouteMatch,
        seq: u64,
    ) -> impl Future<Output = SyncOutcome> + use<H> {
        let config = Rc::clone(&self.config);
        let head = Rc::clone(&self.head);
        let gate = self.gate.clone();
        let settled = Rc::clone(&self.settled);
        let page = route.page_key();

        let pending = match (LookupKind::for_page(page), route.param()) {
            (Some(kind), Some(param)) => self
                .lookups
                .get(kind)
                .map(|lookup| (kind, String::from(param), lookup.lookup(param))),
            _ => None,
        };

        async move {
            let record = match pending {
                None => MetadataRecord::for_page(&config, page),
                Some((kind, param, lookup)) => match lookup.await {
                    Ok(Some(summary)) => MetadataRecord::for_content(&config, kind, &summary),
                    Ok(None) => {
                        tracing::debug!(kind = kind.as_str(), %param, "content not found");
                        MetadataRecord::not_found(&config, kind)
                    }
                    Err(err) => {
                        tracing::warn!(kind = kind.as_str(), %param, %err, "content lookup failed");
                        MetadataRecord::not_found(&config, kind)
                    }
                },
            };
            if !gate.is_current(seq) {
                tracing::debug!(seq, latest = gate.latest(), "discarding stale metadata");
                return SyncOutcome::Stale;
            }
            record.project(&mut *head.borrow_mut());
            tracing::debug!(seq, title = %record.title, "metadata written");
            *settled.borrow_mut() = Some(Settled { seq, record });
            SyncOutcome::Applied
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LookupError;
    use crate::head::MemoryHead;
    use crate::location::Location;
    use crate::resolve::RouteResolver;
    use chrono::{TimeZone, Utc};
    use futures::channel::oneshot;
    use futures::executor::block_on;

    fn route(path: &str) -> RouteMatch {
        RouteResolver::default().resolve(&Location::parse(path))
    }

    fn synchronizer(lookups: Lookups) -> MetadataSynchronizer<MemoryHead> {
        MetadataSynchronizer::new(
            Rc::new(SiteConfig::default()),
            Rc::new(RefCell::new(MemoryHead::new())),
        )
        .with_lookups(lookups)
    }

    fn sync(s: &MetadataSynchronizer<MemoryHead>, path: &str) -> SyncOutcome {
        let seq = s.gate().issue();
        block_on(s.synchronize(&route(path), seq))
    }

    #[test]
    fn home_uses_site_title() {
        let s = synchronizer(Lookups::new());
        assert_eq!(sync(&s, "/"), SyncOutcome::Applied);
        let head = s.head().borrow();
        assert_eq!(head.title(), "وكالة النمو الرقمي");
        assert_eq!(head.meta(MetaTag::OgType), Some("website"));
        let data: Value = serde_json::from_str(head.structured_data().unwrap()).unwrap();
        assert_eq!(data["@type"], "Organization");
        assert_eq!(data["sameAs"].as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn static_page_title_is_suffixed() {
        let s = synchronizer(Lookups::new());
        sync(&s, "/services/seo");
        assert_eq!(s.head().borrow().title(), "تحسين محركات البحث | وكالة النمو الرقمي");
        let settled = s.current().unwrap();
        assert_eq!(settled.seq, 1);
        assert_eq!(settled.record.description, SiteConfig::default().default_description);
    }

    #[test]
    fn found_article() {
        let published = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
        let lookups = Lookups::new().with(LookupKind::Article, move |slug: String| async move {
            Ok::<_, LookupError>(Some(
                ContentSummary::new(format!("عنوان {slug}"), "ملخص")
                    .with_author("سارة")
                    .with_image("https://cdn.example/a.jpg")
                    .with_published(published),
            ))
        });
        let s = synchronizer(lookups);
        sync(&s, "/blog/launch");
        let head = s.head().borrow();
        assert_eq!(head.title(), "عنوان launch - بقلم سارة | وكالة النمو الرقمي");
        assert_eq!(head.meta(MetaTag::Description), Some("ملخص"));
        assert_eq!(head.meta(MetaTag::OgImage), Some("https://cdn.example/a.jpg"));
        assert_eq!(head.meta(MetaTag::OgType), Some("article"));
        let data: Value = serde_json::from_str(head.structured_data().unwrap()).unwrap();
        assert_eq!(data["@type"], "Article");
        assert_eq!(data["author"]["name"], "سارة");
        assert_eq!(data["datePublished"], "2025-03-01T10:00:00Z");
        assert_eq!(data["publisher"]["name"], "وكالة النمو الرقمي");
    }

    #[test]
    fn article_without_author() {
        let lookups = Lookups::new().with(LookupKind::Article, |_: String| async {
            Ok::<_, LookupError>(Some(ContentSummary::new("دليل", "")))
        });
        let s = synchronizer(lookups);
        sync(&s, "/blog/guide");
        assert_eq!(s.head().borrow().title(), "دليل | وكالة النمو الرقمي");
        let record = s.current().unwrap().record;
        assert!(record.structured_data.unwrap().get("author").is_none());
    }

    #[test]
    fn missing_and_failed_lookups_degrade_to_not_found() {
        let lookups = Lookups::new()
            .with(LookupKind::Article, |_: String| async {
                Ok::<Option<ContentSummary>, LookupError>(None)
            })
            .with(LookupKind::Author, |_: String| async {
                Err::<Option<ContentSummary>, _>(LookupError::Transport(String::from("timeout")))
            });
        let s = synchronizer(lookups);
        sync(&s, "/blog/missing");
        assert_eq!(s.head().borrow().title(), "المقال غير موجود - وكالة النمو الرقمي");
        sync(&s, "/author/ghost");
        let head = s.head().borrow();
        assert_eq!(head.title(), "الكاتب غير موجود - وكالة النمو الرقمي");
        assert_eq!(
            head.meta(MetaTag::Description),
            Some(SiteConfig::default().default_description.as_str())
        );
    }

    #[test]
    #[tracing_test::traced_test]
    fn lookup_failure_is_logged() {
        let lookups = Lookups::new().with(LookupKind::Customer, |_: String| async {
            Err::<Option<ContentSummary>, _>(LookupError::Malformed(String::from("bad json")))
        });
        let s = synchronizer(lookups);
        assert_eq!(sync(&s, "/dashboard/acme"), SyncOutcome::Applied);
        assert_eq!(s.head().borrow().title(), "العميل غير موجود - وكالة النمو الرقمي");
        assert!(logs_contain("content lookup failed"));
        assert!(logs_contain("bad json"));
    }

    #[test]
    fn unregistered_lookup_uses_static_entry() {
        let s = synchronizer(Lookups::new());
        sync(&s, "/portfolio/rebrand");
        assert_eq!(s.head().borrow().title(), "مشروع من أعمالنا | وكالة النمو الرقمي");
    }

    #[test]
    fn found_author_and_customer() {
        let lookups = Lookups::new()
            .with(LookupKind::Author, |_: String| async {
                Ok::<_, LookupError>(Some(ContentSummary::new("سارة", "كاتبة")))
            })
            .with(LookupKind::Customer, |_: String| async {
                Ok::<_, LookupError>(Some(ContentSummary::new("متجر الورد", "هوية جديدة")))
            });
        let s = synchronizer(lookups);
        sync(&s, "/author/sara");
        assert_eq!(s.current().unwrap().record.og_type, OgType::Profile);
        assert_eq!(s.head().borrow().title(), "سارة | وكالة النمو الرقمي");
        sync(&s, "/portfolio/roses");
        let data = s.current().unwrap().record.structured_data.unwrap();
        assert_eq!(data["@type"], "CreativeWork");
        assert_eq!(s.head().borrow().title(), "متجر الورد | وكالة النمو الرقمي");
    }

    #[test]
    fn stale_result_is_discarded() {
        let (tx_a, rx_a) = oneshot::channel::<ContentSummary>();
        let (tx_b, rx_b) = oneshot::channel::<ContentSummary>();
        let pending = Rc::new(RefCell::new(vec![rx_b, rx_a]));
        let lookups = Lookups::new().with(LookupKind::Article, move |_: String| {
            let rx = pending.borrow_mut().pop();
            async move {
                match rx {
                    Some(rx) => Ok::<_, LookupError>(rx.await.ok()),
                    None => Ok(None),
                }
            }
        });
        let s = synchronizer(lookups);
        let seq_a = s.gate().issue();
        let fut_a = s.synchronize(&route("/blog/a"), seq_a);
        let seq_b = s.gate().issue();
        let fut_b = s.synchronize(&route("/blog/b"), seq_b);

        tx_b.send(ContentSummary::new("B", "b")).unwrap();
        assert_eq!(block_on(fut_b), SyncOutcome::Applied);
        tx_a.send(ContentSummary::new("A", "a")).unwrap();
        assert_eq!(block_on(fut_a), SyncOutcome::Stale);

        let head = s.head().borrow();
        assert_eq!(head.title(), "B | وكالة النمو الرقمي");
        assert_eq!(s.current().unwrap().seq, seq_b);
    }

    #[test]
    fn every_projection_writes_the_same_bounded_set() {
        let s = synchronizer(Lookups::new());
        sync(&s, "/");
        let after_one = s.head().borrow().writes();
        sync(&s, "/about");
        // Title, six meta tags, one script.
        assert_eq!(after_one, 8);
        assert_eq!(s.head().borrow().writes(), 16);
    }

    #[test]
    fn keywords_are_deduplicated_in_order() {
        let mut config = SiteConfig::default();
        config.default_keywords = ["b", "a", "b"].into_iter().map(String::from).collect();
        let record = MetadataRecord::for_page(&config, "no-entry");
        assert_eq!(record.keywords, ["b", "a"]);
        assert_eq!(record.title, config.site_title);
    }

    #[test]
    fn gate_is_monotonic() {
        let gate = SequenceGate::new();
        let shared = gate.clone();
        assert_eq!(gate.latest(), 0);
        assert_eq!(gate.issue(), 1);
        assert_eq!(shared.issue(), 2);
        assert!(gate.is_current(2));
        assert!(!gate.is_current(1));
    }
}
