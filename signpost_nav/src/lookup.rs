// Copyright 2025 the Signpost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Content lookup collaborators for parameterized pages.
//!
//! Articles, authors, and showcased customers are resolved from their URL
//! parameter by a remote store the navigation core does not own. A lookup is
//! asynchronous and may fail or report that nothing matched:
//!
//! - `Ok(Some(summary))`: found.
//! - `Ok(None)`: not found.
//! - `Err(LookupError)`: transport failure; treated like not found.
//!
//! Any `Fn(String) -> impl Future<Output = LookupResult>` closure is a lookup.
//!
//! ```
//! use signpost_nav::error::LookupError;
//! use signpost_nav::lookup::{ContentSummary, LookupKind, Lookups};
//!
//! let lookups = Lookups::new().with(LookupKind::Author, |slug: String| async move {
//!     Ok::<_, LookupError>((slug == "sara").then(|| ContentSummary::new("سارة", "كاتبة محتوى")))
//! });
//! assert!(lookups.get(LookupKind::Author).is_some());
//! assert!(lookups.get(LookupKind::Article).is_none());
//! ```

use std::fmt;
use std::future::Future;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use futures::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};

use crate::error::LookupError;
use crate::resolve::pages;

/// What a content collaborator returns for a found resource.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSummary {
    /// Display title or name.
    pub title: String,
    /// Short description.
    pub description: String,
    /// Preview image URL.
    #[serde(default)]
    pub image: Option<String>,
    /// Author display name, for articles.
    #[serde(default)]
    pub author: Option<String>,
    /// Publish timestamp, for articles.
    #[serde(default)]
    pub published: Option<DateTime<Utc>>,
}

impl ContentSummary {
    /// A summary with only a title and description.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            image: None,
            author: None,
            published: None,
        }
    }

    /// Set the preview image.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Set the author display name.
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set the publish timestamp.
    #[must_use]
    pub fn with_published(mut self, published: DateTime<Utc>) -> Self {
        self.published = Some(published);
        self
    }
}

/// Result of one lookup.
pub type LookupResult = Result<Option<ContentSummary>, LookupError>;

/// Future returned by [`ContentLookup::lookup`].
pub type LookupFuture = LocalBoxFuture<'static, LookupResult>;

/// Resolve a URL parameter to a [`ContentSummary`].
pub trait ContentLookup {
    /// Start a lookup for `param`. Called at most once per navigation.
    fn lookup(&self, param: &str) -> LookupFuture;
}

impl<F, Fut> ContentLookup for F
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = LookupResult> + 'static,
{
    fn lookup(&self, param: &str) -> LookupFuture {
        Box::pin(self(String::from(param)))
    }
}

/// Which collaborator serves a parameterized page.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupKind {
    /// Blog articles by slug.
    Article,
    /// Authors by slug.
    Author,
    /// Showcased customers (portfolio entries and operator client pages).
    Customer,
}

impl LookupKind {
    /// The lookup kind serving `page_key`, if the page is parameterized.
    pub fn for_page(page_key: &str) -> Option<Self> {
        match page_key {
            pages::ARTICLE => Some(Self::Article),
            pages::AUTHOR => Some(Self::Author),
            pages::PORTFOLIO_ITEM | pages::DASHBOARD_CLIENT => Some(Self::Customer),
            _ => None,
        }
    }

    /// Lower-case name used in configuration and logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Author => "author",
            Self::Customer => "customer",
        }
    }
}

/// One optional collaborator per [`LookupKind`].
#[derive(Clone, Default)]
pub struct Lookups {
    article: Option<Rc<dyn ContentLookup>>,
    author: Option<Rc<dyn ContentLookup>>,
    customer: Option<Rc<dyn ContentLookup>>,
}

impl fmt::Debug for Lookups {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lookups")
            .field("article", &self.article.is_some())
            .field("author", &self.author.is_some())
            .field("customer", &self.customer.is_some())
            .finish()
    }
}

impl Lookups {
    /// No collaborators; every page uses its static entry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `lookup` for `kind`, replacing any previous one.
    #[must_use]
    pub fn with(mut self, kind: LookupKind, lookup: impl ContentLookup + 'static) -> Self {
        self.register(kind, lookup);
        self
    }

    /// Register `lookup` for `kind`, replacing any previous one.
    pub fn register(&mut self, kind: LookupKind, lookup: impl ContentLookup + 'static) {
        *self.slot(kind) = Some(Rc::new(lookup));
    }

    /// The collaborator for `kind`.
    pub fn get(&self, kind: LookupKind) -> Option<Rc<dyn ContentLookup>> {
        match kind {
            LookupKind::Article => self.article.clone(),
            LookupKind::Author => self.author.clone(),
            LookupKind::Customer => self.customer.clone(),
        }
    }

    fn slot(&mut self, kind: LookupKind) -> &mut Option<Rc<dyn ContentLookup>> {
        match kind {
            LookupKind::Article => &mut self.article,
            LookupKind::Author => &mut self.author,
            LookupKind::Customer => &mut self.customer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn closures_are_lookups() {
        let lookup = |slug: String| async move {
            if slug == "missing" {
                Ok(None)
            } else if slug == "down" {
                Err(LookupError::Transport(String::from("503")))
            } else {
                Ok(Some(ContentSummary::new(slug, "desc")))
            }
        };
        assert_eq!(
            block_on(lookup.lookup("launch")).unwrap().map(|s| s.title),
            Some(String::from("launch"))
        );
        assert_eq!(block_on(lookup.lookup("missing")), Ok(None));
        assert!(block_on(lookup.lookup("down")).is_err());
    }

    #[test]
    fn page_keys_map_to_kinds() {
        assert_eq!(LookupKind::for_page(pages::ARTICLE), Some(LookupKind::Article));
        assert_eq!(LookupKind::for_page(pages::AUTHOR), Some(LookupKind::Author));
        assert_eq!(LookupKind::for_page(pages::PORTFOLIO_ITEM), Some(LookupKind::Customer));
        assert_eq!(LookupKind::for_page(pages::DASHBOARD_CLIENT), Some(LookupKind::Customer));
        assert_eq!(LookupKind::for_page(pages::BLOG), None);
    }

    #[test]
    fn register_replaces() {
        let mut lookups = Lookups::new();
        lookups.register(LookupKind::Article, |_: String| async {
            Ok::<Option<ContentSummary>, LookupError>(None)
        });
        lookups.register(LookupKind::Article, |s: String| async move {
            Ok::<_, LookupError>(Some(ContentSummary::new(s, "")))
        });
        let found = block_on(lookups.get(LookupKind::Article).unwrap().lookup("x")).unwrap();
        assert!(found.is_some());
    }

    #[test]
    fn summary_deserializes_rfc3339() {
        let s: ContentSummary = serde_json::from_str(
            r#"{"title":"t","description":"d","published":"2025-03-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(s.published.map(|p| p.timestamp()), Some(1_740_823_200));
        assert!(s.author.is_none());
    }
}
