// Copyright 2025 the Signpost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Site configuration.
//!
//! [`SiteConfig`] carries everything the metadata synchronizer and the access
//! guard need that is not code: the site title and defaults, the publisher
//! organization, not-found titles, guard prefixes, and the static metadata of
//! every page. The built-in [`Default`] describes the agency site; a TOML file
//! can override any part of it.
//!
//! ```toml
//! site_title = "Acme Growth"
//! base_url = "https://acme.example"
//!
//! [guard]
//! auth_prefixes = ["/login", "/register"]
//!
//! [pages.about]
//! title = "About us"
//! description = "Who we are"
//! ```
//!
//! Page entries in a file are merged over the built-in table, so a file only
//! needs to list the pages it changes.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::guard::GuardRules;
use crate::lookup::LookupKind;
use crate::resolve::{SITE_ROUTES, pages};

/// Static metadata of one page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Page title, without the site title.
    pub title: String,
    /// Description; the site default when absent.
    #[serde(default)]
    pub description: Option<String>,
    /// Keywords; the site defaults when empty.
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl PageMeta {
    fn titled(title: &str) -> Self {
        Self {
            title: String::from(title),
            ..Self::default()
        }
    }

    fn described(title: &str, description: &str) -> Self {
        Self {
            title: String::from(title),
            description: Some(String::from(description)),
            keywords: Vec::new(),
        }
    }
}

/// Publisher organization used in structured data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Organization {
    /// Legal or brand name.
    pub name: String,
    /// Logo URL.
    pub logo: String,
    /// Profiles on other sites (`sameAs`).
    pub same_as: Vec<String>,
}

impl Default for Organization {
    fn default() -> Self {
        Self {
            name: String::from("وكالة النمو الرقمي"),
            logo: String::from("https://agency.example/images/logo.png"),
            same_as: vec![
                String::from("https://x.com/growth_agency"),
                String::from("https://www.linkedin.com/company/growth-agency"),
                String::from("https://www.instagram.com/growth_agency"),
            ],
        }
    }
}

/// Title shown when a parameterized page's content does not exist.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotFoundTitles {
    /// Missing article.
    pub article: String,
    /// Missing author.
    pub author: String,
    /// Missing customer or showcase entry.
    pub customer: String,
}

impl Default for NotFoundTitles {
    fn default() -> Self {
        Self {
            article: String::from("المقال غير موجود"),
            author: String::from("الكاتب غير موجود"),
            customer: String::from("العميل غير موجود"),
        }
    }
}

/// Everything configurable about the site.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site title; the whole title on the home page, the suffix elsewhere.
    pub site_title: String,
    /// Canonical base URL.
    pub base_url: String,
    /// Description for pages without their own.
    pub default_description: String,
    /// Keywords for pages without their own.
    pub default_keywords: Vec<String>,
    /// Preview image for pages and content without their own.
    pub default_image: String,
    /// Publisher organization.
    pub organization: Organization,
    /// Not-found titles per lookup kind.
    pub not_found: NotFoundTitles,
    /// Access guard rules.
    pub guard: GuardRules,
    /// Static metadata by page key.
    pub pages: BTreeMap<String, PageMeta>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_title: String::from("وكالة النمو الرقمي"),
            base_url: String::from("https://agency.example"),
            default_description: String::from(
                "وكالة تسويق رقمي متكاملة: تحسين محركات البحث، إدارة وسائل التواصل، تصميم المواقع والإعلانات المدفوعة.",
            ),
            default_keywords: ["تسويق رقمي", "تحسين محركات البحث", "إعلانات مدفوعة", "تصميم مواقع"]
                .into_iter()
                .map(String::from)
                .collect(),
            default_image: String::from("https://agency.example/images/og-default.jpg"),
            organization: Organization::default(),
            not_found: NotFoundTitles::default(),
            guard: GuardRules::default(),
            pages: default_pages(),
        }
    }
}

impl SiteConfig {
    /// Parse a TOML document, merge its pages over the built-in table, and
    /// validate the guard rules against the site route table.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(source)?;
        for (key, page) in default_pages() {
            config.pages.entry(key).or_insert(page);
        }
        config.guard.validate()?;
        config.guard.covers(SITE_ROUTES)?;
        Ok(config)
    }

    /// Read and parse a TOML file. See [`SiteConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(
            path = %path.display(),
            pages = config.pages.len(),
            "loaded site configuration"
        );
        Ok(config)
    }

    /// Static metadata of `page_key`.
    pub fn page(&self, page_key: &str) -> Option<&PageMeta> {
        self.pages.get(page_key)
    }

    /// Not-found title for `kind`.
    pub fn not_found_title(&self, kind: LookupKind) -> &str {
        match kind {
            LookupKind::Article => &self.not_found.article,
            LookupKind::Author => &self.not_found.author,
            LookupKind::Customer => &self.not_found.customer,
        }
    }
}

fn default_pages() -> BTreeMap<String, PageMeta> {
    let entries = [
        (
            pages::HOME,
            PageMeta::described(
                "الرئيسية",
                "نساعد علامتك التجارية على النمو عبر حلول تسويق رقمي مبنية على البيانات.",
            ),
        ),
        (
            pages::ABOUT,
            PageMeta::described("من نحن", "تعرف على فريقنا وقصتنا وقيمنا."),
        ),
        (
            pages::PRICING,
            PageMeta::described("الأسعار", "باقات مرنة تناسب الشركات الناشئة والمؤسسات."),
        ),
        (pages::CONTACT, PageMeta::titled("تواصل معنا")),
        (pages::FAQ, PageMeta::titled("الأسئلة الشائعة")),
        (pages::PRIVACY, PageMeta::titled("سياسة الخصوصية")),
        (pages::TERMS, PageMeta::titled("الشروط والأحكام")),
        (
            pages::SERVICES,
            PageMeta::described("خدماتنا", "خدمات تسويق رقمي متكاملة لنمو أعمالك."),
        ),
        (pages::SERVICES_SEO, PageMeta::titled("تحسين محركات البحث")),
        (
            pages::SERVICES_SOCIAL_MEDIA,
            PageMeta::titled("إدارة وسائل التواصل الاجتماعي"),
        ),
        (pages::SERVICES_WEB_DESIGN, PageMeta::titled("تصميم المواقع")),
        (pages::SERVICES_PAID_ADS, PageMeta::titled("الإعلانات المدفوعة")),
        (pages::SERVICES_CONTENT_WRITING, PageMeta::titled("كتابة المحتوى")),
        (pages::SERVICES_BRANDING, PageMeta::titled("الهوية التجارية")),
        (
            pages::PORTFOLIO,
            PageMeta::described("أعمالنا", "مشاريع نفذناها لعملائنا في مختلف القطاعات."),
        ),
        (pages::PORTFOLIO_ITEM, PageMeta::titled("مشروع من أعمالنا")),
        (
            pages::BLOG,
            PageMeta::described("المدونة", "مقالات ونصائح في التسويق الرقمي."),
        ),
        (pages::ARTICLE, PageMeta::titled("مقال")),
        (pages::AUTHOR, PageMeta::titled("كاتب")),
        (pages::LOGIN, PageMeta::titled("تسجيل الدخول")),
        (pages::REGISTER, PageMeta::titled("إنشاء حساب")),
        (pages::FORGOT_PASSWORD, PageMeta::titled("نسيت كلمة المرور")),
        (pages::RESET_PASSWORD, PageMeta::titled("إعادة تعيين كلمة المرور")),
        (pages::DASHBOARD_OVERVIEW, PageMeta::titled("لوحة التحكم")),
        (pages::DASHBOARD_USERS, PageMeta::titled("المستخدمون")),
        (pages::DASHBOARD_POSTS, PageMeta::titled("المقالات")),
        (pages::DASHBOARD_INVOICES, PageMeta::titled("الفواتير")),
        (pages::DASHBOARD_PROJECTS, PageMeta::titled("المشاريع")),
        (pages::DASHBOARD_ADS, PageMeta::titled("الإعلانات")),
        (pages::DASHBOARD_NOTIFICATIONS, PageMeta::titled("الإشعارات")),
        (pages::DASHBOARD_CONTENT_GENERATOR, PageMeta::titled("مولد المحتوى")),
        (pages::DASHBOARD_SETTINGS, PageMeta::titled("الإعدادات")),
        (pages::DASHBOARD_CLIENT, PageMeta::titled("ملف العميل")),
        (pages::PORTAL_OVERVIEW, PageMeta::titled("بوابة العملاء")),
        (pages::PORTAL_INVOICES, PageMeta::titled("فواتيري")),
        (pages::PORTAL_PROJECTS, PageMeta::titled("مشاريعي")),
        (pages::PORTAL_NOTIFICATIONS, PageMeta::titled("الإشعارات")),
        (pages::PORTAL_PROFILE, PageMeta::titled("الملف الشخصي")),
    ];
    entries
        .into_iter()
        .map(|(key, page)| (String::from(key), page))
        .collect()
}
