// Copyright 2025 the Signpost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Locations, origins, and href resolution.
//!
//! A [`Location`] is the path/query/fragment triple of the current URL. It is an
//! immutable value: every navigation replaces it wholesale. Query and fragment
//! are carried verbatim and never parsed.
//!
//! [`resolve_href`] turns an anchor's `href` into an `(Origin, Location)` pair
//! relative to the document, which is what the link interceptor compares
//! against the document origin and the current location.

use core::fmt;

/// Path, query, and fragment of a URL.
///
/// `path` always starts with `/` and has dot segments removed. `query` and
/// `fragment` are stored without their `?` / `#` sigils.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Location {
    path: String,
    query: String,
    fragment: String,
}

impl Default for Location {
    fn default() -> Self {
        Self::root()
    }
}

impl Location {
    /// The site root, `/`.
    pub fn root() -> Self {
        Self {
            path: String::from("/"),
            query: String::new(),
            fragment: String::new(),
        }
    }

    /// Build a location from its parts. Leading `?` / `#` on `query` / `fragment` are stripped.
    pub fn new(path: &str, query: &str, fragment: &str) -> Self {
        Self {
            path: normalize_path(path),
            query: String::from(query.strip_prefix('?').unwrap_or(query)),
            fragment: String::from(fragment.strip_prefix('#').unwrap_or(fragment)),
        }
    }

    /// Parse an origin-relative href such as `/blog/post?ref=nav#comments`.
    pub fn parse(href: &str) -> Self {
        let (rest, fragment) = href.split_once('#').unwrap_or((href, ""));
        let (path, query) = rest.split_once('?').unwrap_or((rest, ""));
        Self::new(path, query, fragment)
    }

    /// The path, always starting with `/`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The raw query string, without `?`.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The raw fragment, without `#`.
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// Non-empty path segments, in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('/').filter(|s| !s.is_empty())
    }

    /// Origin-relative href, omitting empty query and fragment.
    pub fn href(&self) -> String {
        self.to_string()
    }

    /// Same location without its fragment.
    #[must_use]
    pub fn without_fragment(&self) -> Self {
        Self {
            path: self.path.clone(),
            query: self.query.clone(),
            fragment: String::new(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        if !self.query.is_empty() {
            write!(f, "?{}", self.query)?;
        }
        if !self.fragment.is_empty() {
            write!(f, "#{}", self.fragment)?;
        }
        Ok(())
    }
}

impl From<&str> for Location {
    fn from(href: &str) -> Self {
        Self::parse(href)
    }
}

/// A normalized `scheme://host[:port]` origin.
///
/// Scheme and host are lower-cased; the default port of the scheme is dropped.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Origin {
    serialized: String,
    scheme_len: usize,
}

impl Origin {
    /// Parse an origin from an absolute URL or a bare `scheme://authority`.
    ///
    /// Returns `None` for anything that is not an absolute HTTP(S) URL.
    pub fn parse(url: &str) -> Option<Self> {
        let (scheme, rest) = split_scheme(url.trim())?;
        let rest = rest.strip_prefix("//")?;
        let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
        Self::from_parts(scheme, &rest[..end])
    }

    fn from_parts(scheme: &str, authority: &str) -> Option<Self> {
        let scheme = scheme.to_ascii_lowercase();
        let default_port = match scheme.as_str() {
            "http" => "80",
            "https" => "443",
            _ => return None,
        };
        // Userinfo never participates in the origin.
        let host_port = authority.rsplit_once('@').map_or(authority, |(_, h)| h);
        let (host, port) = match host_port.rfind(':') {
            // A colon inside an IPv6 literal is not a port separator.
            Some(i) if !host_port[i..].contains(']') => (&host_port[..i], &host_port[i + 1..]),
            _ => (host_port, ""),
        };
        if host.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let mut serialized = format!("{scheme}://{}", host.to_ascii_lowercase());
        if !port.is_empty() && port != default_port {
            serialized.push(':');
            serialized.push_str(port);
        }
        Some(Self {
            serialized,
            scheme_len: scheme.len(),
        })
    }

    /// The scheme, `http` or `https`.
    pub fn scheme(&self) -> &str {
        &self.serialized[..self.scheme_len]
    }

    /// The serialized origin.
    pub fn as_str(&self) -> &str {
        &self.serialized
    }

    /// Absolute URL for `location` under this origin.
    pub fn join(&self, location: &Location) -> String {
        format!("{}{location}", self.serialized)
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialized)
    }
}

/// Resolve an anchor `href` against the document origin and current location.
///
/// Handles absolute, scheme-relative (`//host/..`), root-relative (`/..`),
/// query-only (`?..`), fragment-only (`#..`), and path-relative hrefs with dot
/// segments. An empty href refers to the current location without fragment.
/// Returns `None` for schemes other than HTTP(S), such as `mailto:` or
/// `javascript:`.
pub fn resolve_href(origin: &Origin, base: &Location, href: &str) -> Option<(Origin, Location)> {
    let href = href.trim();
    if href.is_empty() {
        return Some((origin.clone(), base.without_fragment()));
    }
    if let Some(rest) = href.strip_prefix("//") {
        return split_absolute(origin.scheme(), rest);
    }
    if let Some((scheme, rest)) = split_scheme(href) {
        let rest = rest.strip_prefix("//")?;
        return split_absolute(scheme, rest);
    }
    let location = if let Some(query) = href.strip_prefix('?') {
        let (query, fragment) = query.split_once('#').unwrap_or((query, ""));
        Location::new(base.path(), query, fragment)
    } else if let Some(fragment) = href.strip_prefix('#') {
        Location::new(base.path(), base.query(), fragment)
    } else if href.starts_with('/') {
        Location::parse(href)
    } else {
        let dir_end = base.path().rfind('/').map_or(0, |i| i + 1);
        Location::parse(&format!("{}{href}", &base.path()[..dir_end]))
    };
    Some((origin.clone(), location))
}

/// Percent-decode a single path segment. Malformed escapes are kept verbatim;
/// invalid UTF-8 is replaced.
pub fn decode_segment(segment: &str) -> String {
    fn hex(b: u8) -> Option<u8> {
        match b {
            b'0'..=b'9' => Some(b - b'0'),
            b'a'..=b'f' => Some(b - b'a' + 10),
            b'A'..=b'F' => Some(b - b'A' + 10),
            _ => None,
        }
    }
    let bytes = segment.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%'
            && i + 2 < bytes.len()
            && let (Some(h), Some(l)) = (hex(bytes[i + 1]), hex(bytes[i + 2]))
        {
            out.push((h << 4) | l);
            i += 3;
            continue;
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn split_scheme(href: &str) -> Option<(&str, &str)> {
    let (scheme, rest) = href.split_once(':')?;
    let mut chars = scheme.chars();
    let first = chars.next()?;
    let valid = first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some((scheme, rest))
}

fn split_absolute(scheme: &str, rest: &str) -> Option<(Origin, Location)> {
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let origin = Origin::from_parts(scheme, &rest[..end])?;
    Some((origin, Location::parse(&rest[end..])))
}

fn normalize_path(raw: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    let trailing = raw.ends_with('/') || raw.ends_with("/.") || raw.ends_with("/..");
    for seg in raw.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                out.pop();
            }
            s => out.push(s),
        }
    }
    let mut path = String::from("/");
    path.push_str(&out.join("/"));
    if trailing && !out.is_empty() {
        path.push('/');
    }
    path
}
