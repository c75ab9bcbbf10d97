// Copyright 2025 the Signpost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Document head projection.
//!
//! The metadata synchronizer writes through a [`HeadSink`]: the title, a
//! bounded set of six meta tags, and at most one structured-data script.
//! Sinks upsert by element identity, so repeated navigations rewrite the same
//! elements instead of appending new ones.

use std::collections::BTreeMap;

/// The meta tags the synchronizer maintains.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetaTag {
    /// `<meta name="description">`
    Description,
    /// `<meta name="keywords">`
    Keywords,
    /// `<meta property="og:title">`
    OgTitle,
    /// `<meta property="og:description">`
    OgDescription,
    /// `<meta property="og:image">`
    OgImage,
    /// `<meta property="og:type">`
    OgType,
}

impl MetaTag {
    /// Every maintained tag.
    pub const ALL: [Self; 6] = [
        Self::Description,
        Self::Keywords,
        Self::OgTitle,
        Self::OgDescription,
        Self::OgImage,
        Self::OgType,
    ];

    /// The attribute that identifies the element: `name` or `property`.
    pub const fn key_attribute(self) -> &'static str {
        match self {
            Self::Description | Self::Keywords => "name",
            _ => "property",
        }
    }

    /// Value of [`key_attribute`](Self::key_attribute).
    pub const fn key(self) -> &'static str {
        match self {
            Self::Description => "description",
            Self::Keywords => "keywords",
            Self::OgTitle => "og:title",
            Self::OgDescription => "og:description",
            Self::OgImage => "og:image",
            Self::OgType => "og:type",
        }
    }
}

/// Where the `type` attribute of the structured-data script points.
pub const STRUCTURED_DATA_TYPE: &str = "application/ld+json";

/// Upsert-by-identity writer for the document head.
pub trait HeadSink {
    /// Set the document title.
    fn set_title(&mut self, title: &str);
    /// Create or rewrite the `content` of `tag`.
    fn upsert_meta(&mut self, tag: MetaTag, content: &str);
    /// Replace the structured-data script with `json`, or remove it for `None`.
    ///
    /// After this call at most one such script exists.
    fn replace_structured_data(&mut self, json: Option<&str>);
}

/// A head sink that only remembers what was written.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryHead {
    title: String,
    meta: BTreeMap<MetaTag, String>,
    structured_data: Option<String>,
    writes: usize,
}

impl MemoryHead {
    /// Empty head.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Content of `tag`, if written.
    pub fn meta(&self, tag: MetaTag) -> Option<&str> {
        self.meta.get(&tag).map(String::as_str)
    }

    /// Current structured-data JSON.
    pub fn structured_data(&self) -> Option<&str> {
        self.structured_data.as_deref()
    }

    /// Number of sink calls so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl HeadSink for MemoryHead {
    fn set_title(&mut self, title: &str) {
        self.writes += 1;
        title.clone_into(&mut self.title);
    }

    fn upsert_meta(&mut self, tag: MetaTag, content: &str) {
        self.writes += 1;
        self.meta.insert(tag, String::from(content));
    }

    fn replace_structured_data(&mut self, json: Option<&str>) {
        self.writes += 1;
        self.structured_data = json.map(String::from);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_identities_are_distinct() {
        let mut seen: Vec<(&str, &str)> = MetaTag::ALL
            .iter()
            .map(|t| (t.key_attribute(), t.key()))
            .collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), MetaTag::ALL.len());
        assert_eq!(MetaTag::OgImage.key_attribute(), "property");
        assert_eq!(MetaTag::Keywords.key_attribute(), "name");
    }

    #[test]
    fn memory_head_overwrites() {
        let mut head = MemoryHead::new();
        head.upsert_meta(MetaTag::Description, "a");
        head.upsert_meta(MetaTag::Description, "b");
        head.replace_structured_data(Some("{}"));
        head.replace_structured_data(None);
        assert_eq!(head.meta(MetaTag::Description), Some("b"));
        assert!(head.structured_data().is_none());
        assert_eq!(head.writes(), 4);
    }
}
