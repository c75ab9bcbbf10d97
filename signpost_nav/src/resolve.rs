// Copyright 2025 the Signpost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Route resolution: map a location's path segments to a [`RouteMatch`].
//!
//! The first segment selects a section from an ordered table of
//! [`RouteRule`]s; the first rule whose section matches wins. A second
//! segment, when the section takes one, picks a sub-page or becomes the
//! lookup parameter. Segments after the second never change the match.
//! Unknown sections resolve to the fallback page (home for the site table).
//!
//! ```
//! use signpost_nav::location::Location;
//! use signpost_nav::resolve::{RouteResolver, pages};
//! use signpost_nav::types::Layout;
//!
//! let resolver = RouteResolver::default();
//! let m = resolver.resolve(&Location::parse("/blog/%D9%85%D8%B1%D8%AD%D8%A8%D8%A7"));
//! assert_eq!(m.layout(), Layout::Public);
//! assert_eq!(m.page_key(), pages::ARTICLE);
//! assert_eq!(m.param(), Some("مرحبا"));
//! ```

use crate::location::{Location, decode_segment};
use crate::types::{Layout, RouteMatch};

/// Page keys of the site route table.
pub mod pages {
    #![allow(missing_docs, reason = "each constant is its own page key")]

    pub const HOME: &str = "home";
    pub const ABOUT: &str = "about";
    pub const PRICING: &str = "pricing";
    pub const CONTACT: &str = "contact";
    pub const FAQ: &str = "faq";
    pub const PRIVACY: &str = "privacy";
    pub const TERMS: &str = "terms";

    pub const SERVICES: &str = "services";
    pub const SERVICES_SEO: &str = "services-seo";
    pub const SERVICES_SOCIAL_MEDIA: &str = "services-social-media";
    pub const SERVICES_WEB_DESIGN: &str = "services-web-design";
    pub const SERVICES_PAID_ADS: &str = "services-paid-ads";
    pub const SERVICES_CONTENT_WRITING: &str = "services-content-writing";
    pub const SERVICES_BRANDING: &str = "services-branding";

    pub const PORTFOLIO: &str = "portfolio";
    pub const PORTFOLIO_ITEM: &str = "portfolio-item";
    pub const BLOG: &str = "blog";
    pub const ARTICLE: &str = "article";
    pub const AUTHOR: &str = "author";

    pub const LOGIN: &str = "login";
    pub const REGISTER: &str = "register";
    pub const FORGOT_PASSWORD: &str = "forgot-password";
    pub const RESET_PASSWORD: &str = "reset-password";

    pub const DASHBOARD_OVERVIEW: &str = "dashboard-overview";
    pub const DASHBOARD_USERS: &str = "dashboard-users";
    pub const DASHBOARD_POSTS: &str = "dashboard-posts";
    pub const DASHBOARD_INVOICES: &str = "dashboard-invoices";
    pub const DASHBOARD_PROJECTS: &str = "dashboard-projects";
    pub const DASHBOARD_ADS: &str = "dashboard-ads";
    pub const DASHBOARD_NOTIFICATIONS: &str = "dashboard-notifications";
    pub const DASHBOARD_CONTENT_GENERATOR: &str = "dashboard-content-generator";
    pub const DASHBOARD_SETTINGS: &str = "dashboard-settings";
    pub const DASHBOARD_CLIENT: &str = "dashboard-client";

    pub const PORTAL_OVERVIEW: &str = "portal-overview";
    pub const PORTAL_INVOICES: &str = "portal-invoices";
    pub const PORTAL_PROJECTS: &str = "portal-projects";
    pub const PORTAL_NOTIFICATIONS: &str = "portal-notifications";
    pub const PORTAL_PROFILE: &str = "portal-profile";
}

/// How a section treats its second path segment.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Tail {
    /// Ignored; always the index page.
    None,
    /// Named sub-pages (`segment`, `page key`); anything else is the index page.
    SubPages(&'static [(&'static str, &'static str)]),
    /// A lookup parameter for the given page key.
    Param(&'static str),
    /// Named sub-pages first, otherwise a lookup parameter for the given page key.
    SubPagesOrParam(&'static [(&'static str, &'static str)], &'static str),
}

/// One row of an ordered route table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RouteRule {
    /// First path segment this rule matches; empty for the site root.
    pub section: &'static str,
    /// Layout every page of the section renders into.
    pub layout: Layout,
    /// Page key when there is no (recognized) second segment.
    pub index: &'static str,
    /// Second-segment handling.
    pub tail: Tail,
}

impl RouteRule {
    /// A section with no second segment whose page key is its own name.
    pub const fn page(section: &'static str, layout: Layout) -> Self {
        Self {
            section,
            layout,
            index: section,
            tail: Tail::None,
        }
    }
}

const SERVICE_PAGES: &[(&str, &str)] = &[
    ("seo", pages::SERVICES_SEO),
    ("social-media", pages::SERVICES_SOCIAL_MEDIA),
    ("web-design", pages::SERVICES_WEB_DESIGN),
    ("paid-ads", pages::SERVICES_PAID_ADS),
    ("content-writing", pages::SERVICES_CONTENT_WRITING),
    ("branding", pages::SERVICES_BRANDING),
];

const DASHBOARD_PAGES: &[(&str, &str)] = &[
    ("overview", pages::DASHBOARD_OVERVIEW),
    ("users", pages::DASHBOARD_USERS),
    ("posts", pages::DASHBOARD_POSTS),
    ("invoices", pages::DASHBOARD_INVOICES),
    ("projects", pages::DASHBOARD_PROJECTS),
    ("ads", pages::DASHBOARD_ADS),
    ("notifications", pages::DASHBOARD_NOTIFICATIONS),
    ("content-generator", pages::DASHBOARD_CONTENT_GENERATOR),
    ("settings", pages::DASHBOARD_SETTINGS),
];

const PORTAL_PAGES: &[(&str, &str)] = &[
    ("overview", pages::PORTAL_OVERVIEW),
    ("invoices", pages::PORTAL_INVOICES),
    ("projects", pages::PORTAL_PROJECTS),
    ("notifications", pages::PORTAL_NOTIFICATIONS),
    ("profile", pages::PORTAL_PROFILE),
];

/// The agency site's route table, in match order.
pub const SITE_ROUTES: &[RouteRule] = &[
    RouteRule {
        section: "",
        layout: Layout::Public,
        index: pages::HOME,
        tail: Tail::None,
    },
    RouteRule::page(pages::ABOUT, Layout::Public),
    RouteRule::page(pages::PRICING, Layout::Public),
    RouteRule::page(pages::CONTACT, Layout::Public),
    RouteRule::page(pages::FAQ, Layout::Public),
    RouteRule::page(pages::PRIVACY, Layout::Public),
    RouteRule::page(pages::TERMS, Layout::Public),
    RouteRule {
        section: "services",
        layout: Layout::Public,
        index: pages::SERVICES,
        tail: Tail::SubPages(SERVICE_PAGES),
    },
    RouteRule {
        section: "portfolio",
        layout: Layout::Public,
        index: pages::PORTFOLIO,
        tail: Tail::Param(pages::PORTFOLIO_ITEM),
    },
    RouteRule {
        section: "blog",
        layout: Layout::Public,
        index: pages::BLOG,
        tail: Tail::Param(pages::ARTICLE),
    },
    RouteRule {
        section: "author",
        layout: Layout::Public,
        index: pages::BLOG,
        tail: Tail::Param(pages::AUTHOR),
    },
    RouteRule::page(pages::LOGIN, Layout::Public),
    RouteRule::page(pages::REGISTER, Layout::Public),
    RouteRule::page(pages::FORGOT_PASSWORD, Layout::Public),
    RouteRule::page(pages::RESET_PASSWORD, Layout::Public),
    RouteRule {
        section: "dashboard",
        layout: Layout::OperatorConsole,
        index: pages::DASHBOARD_OVERVIEW,
        tail: Tail::SubPagesOrParam(DASHBOARD_PAGES, pages::DASHBOARD_CLIENT),
    },
    RouteRule {
        section: "portal",
        layout: Layout::CustomerConsole,
        index: pages::PORTAL_OVERVIEW,
        tail: Tail::SubPages(PORTAL_PAGES),
    },
];

/// Ordered first-match-wins resolver with a default fallback.
#[derive(Copy, Clone, Debug)]
pub struct RouteResolver {
    table: &'static [RouteRule],
    fallback: (Layout, &'static str),
}

impl Default for RouteResolver {
    fn default() -> Self {
        Self::new(SITE_ROUTES)
    }
}

impl RouteResolver {
    /// A resolver over `table` falling back to the public home page.
    pub const fn new(table: &'static [RouteRule]) -> Self {
        Self {
            table,
            fallback: (Layout::Public, pages::HOME),
        }
    }

    /// Use `page_key` in `layout` for unrecognized sections.
    #[must_use]
    pub const fn with_fallback(mut self, layout: Layout, page_key: &'static str) -> Self {
        self.fallback = (layout, page_key);
        self
    }

    /// The rule table, in match order.
    pub fn table(&self) -> &'static [RouteRule] {
        self.table
    }

    /// Resolve `location`. Defined for every path.
    pub fn resolve(&self, location: &Location) -> RouteMatch {
        let segments: Vec<String> = location.segments().map(String::from).collect();
        let section = segments.first().map_or("", String::as_str);
        let Some(rule) = self.table.iter().find(|r| r.section == section) else {
            tracing::debug!(path = location.path(), "unknown section, using fallback page");
            let (layout, page) = self.fallback;
            return RouteMatch::new(layout, segments, page, None);
        };

        let (page, param) = match (rule.tail, segments.get(1)) {
            (_, None) | (Tail::None, _) => (rule.index, None),
            (Tail::SubPages(subs), Some(s)) => (sub_page(subs, s).unwrap_or(rule.index), None),
            (Tail::Param(key), Some(s)) => (key, Some(decode_segment(s))),
            (Tail::SubPagesOrParam(subs, key), Some(s)) => match sub_page(subs, s) {
                Some(page) => (page, None),
                None => (key, Some(decode_segment(s))),
            },
        };
        RouteMatch::new(rule.layout, segments, page, param)
    }
}

fn sub_page(subs: &[(&'static str, &'static str)], segment: &str) -> Option<&'static str> {
    subs.iter().find(|(name, _)| *name == segment).map(|(_, page)| *page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn resolve(path: &str) -> RouteMatch {
        RouteResolver::default().resolve(&Location::parse(path))
    }

    fn key(path: &str) -> (Layout, &'static str, Option<String>) {
        let m = resolve(path);
        (m.layout(), m.page_key(), m.param().map(String::from))
    }

    #[test]
    fn root_is_home() {
        assert_eq!(key("/"), (Layout::Public, pages::HOME, None));
        assert!(resolve("/").segments().is_empty());
    }

    #[test]
    fn static_pages_match_their_section() {
        for page in [
            pages::ABOUT,
            pages::PRICING,
            pages::CONTACT,
            pages::FAQ,
            pages::PRIVACY,
            pages::TERMS,
            pages::LOGIN,
            pages::REGISTER,
            pages::FORGOT_PASSWORD,
            pages::RESET_PASSWORD,
        ] {
            assert_eq!(key(&format!("/{page}")), (Layout::Public, page, None));
            assert_eq!(key(&format!("/{page}/extra")), (Layout::Public, page, None));
        }
    }

    #[test]
    fn services_sub_pages() {
        assert_eq!(key("/services").1, pages::SERVICES);
        assert_eq!(key("/services/paid-ads").1, pages::SERVICES_PAID_ADS);
        assert_eq!(key("/services/branding/").1, pages::SERVICES_BRANDING);
        assert_eq!(key("/services/unknown").1, pages::SERVICES);
    }

    #[test]
    fn parameterized_public_pages() {
        assert_eq!(key("/blog"), (Layout::Public, pages::BLOG, None));
        assert_eq!(
            key("/blog/launch-day"),
            (Layout::Public, pages::ARTICLE, Some(String::from("launch-day")))
        );
        assert_eq!(key("/author"), (Layout::Public, pages::BLOG, None));
        assert_eq!(
            key("/author/sara"),
            (Layout::Public, pages::AUTHOR, Some(String::from("sara")))
        );
        assert_eq!(
            key("/portfolio/brand%20refresh"),
            (Layout::Public, pages::PORTFOLIO_ITEM, Some(String::from("brand refresh")))
        );
    }

    #[test]
    fn operator_console() {
        assert_eq!(key("/dashboard"), (Layout::OperatorConsole, pages::DASHBOARD_OVERVIEW, None));
        assert_eq!(key("/dashboard/content-generator").1, pages::DASHBOARD_CONTENT_GENERATOR);
        assert_eq!(
            key("/dashboard/client-42"),
            (
                Layout::OperatorConsole,
                pages::DASHBOARD_CLIENT,
                Some(String::from("client-42"))
            )
        );
    }

    #[test]
    fn customer_console() {
        assert_eq!(key("/portal"), (Layout::CustomerConsole, pages::PORTAL_OVERVIEW, None));
        assert_eq!(key("/portal/profile").1, pages::PORTAL_PROFILE);
        assert_eq!(key("/portal/whatever").1, pages::PORTAL_OVERVIEW);
    }

    #[test]
    fn unknown_sections_fall_back_to_home() {
        assert_eq!(key("/no-such-page"), (Layout::Public, pages::HOME, None));
        assert_eq!(key("/About"), (Layout::Public, pages::HOME, None));
        let m = resolve("/no-such-page/deeper");
        assert_eq!(m.segments(), ["no-such-page", "deeper"]);
    }

    #[test]
    fn extra_segments_are_kept_but_ignored() {
        let m = resolve("/blog/launch/comments/2");
        assert_eq!(m.page_key(), pages::ARTICLE);
        assert_eq!(m.param(), Some("launch"));
        assert_eq!(m.segments().len(), 4);
    }

    #[test]
    fn custom_table_and_fallback() {
        const TABLE: &[RouteRule] = &[RouteRule::page("docs", Layout::Public)];
        let r = RouteResolver::new(TABLE).with_fallback(Layout::Public, "docs");
        assert_eq!(r.resolve(&Location::parse("/")).page_key(), "docs");
        assert_eq!(r.table().len(), 1);
    }

    #[test]
    fn first_match_wins() {
        const TABLE: &[RouteRule] = &[
            RouteRule {
                section: "x",
                layout: Layout::Public,
                index: "first",
                tail: Tail::None,
            },
            RouteRule {
                section: "x",
                layout: Layout::OperatorConsole,
                index: "second",
                tail: Tail::None,
            },
        ];
        let m = RouteResolver::new(TABLE).resolve(&Location::parse("/x"));
        assert_eq!(m.page_key(), "first");
    }

    proptest! {
        #[test]
        fn resolve_is_total(path in "\\PC{0,64}") {
            let location = Location::parse(&path);
            let m = RouteResolver::default().resolve(&location);
            prop_assert!(!m.page_key().is_empty());
            prop_assert_eq!(m.segments().len(), location.segments().count());
        }

        #[test]
        fn parameters_only_on_parameterized_pages(path in "(/[a-z%0-9-]{1,8}){0,4}") {
            let m = RouteResolver::default().resolve(&Location::parse(&path));
            let parameterized = [
                pages::ARTICLE,
                pages::AUTHOR,
                pages::PORTFOLIO_ITEM,
                pages::DASHBOARD_CLIENT,
            ];
            prop_assert_eq!(m.param().is_some(), parameterized.contains(&m.page_key()));
        }
    }
}
