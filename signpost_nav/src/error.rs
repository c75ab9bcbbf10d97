// Copyright 2025 the Signpost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! Navigation itself has no fatal errors: unknown paths fall back to home,
//! missing content degrades to a not-found record, and stale metadata is
//! dropped. What remains is loading configuration and talking to content
//! collaborators.

use std::path::PathBuf;

use crate::types::{Layout, Role};

/// Errors raised while loading or validating [`SiteConfig`](crate::config::SiteConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        /// File that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid TOML for the expected shape.
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A guard prefix is empty, relative, or the site root.
    #[error("guard prefix `{field}` must be a non-root absolute path, got {value:?}")]
    InvalidPrefix {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: String,
    },

    /// A role's default page would itself be redirected for that role.
    #[error("default page {target} for {} is redirected by its own guard", .role.as_str())]
    RedirectLoop {
        /// Role the default page is aimed at.
        role: Role,
        /// The looping target.
        target: String,
    },

    /// A console section of the route table lies outside the prefix guarding that console.
    #[error("section /{section} renders the {} layout but is not under {prefix}", .layout.as_str())]
    UnguardedConsole {
        /// Console layout the section renders into.
        layout: Layout,
        /// The uncovered section.
        section: &'static str,
        /// The prefix that should cover it.
        prefix: String,
    },
}

/// Transport failure reported by a content lookup collaborator.
///
/// A missing resource is not an error; lookups report it as `Ok(None)`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// The remote store could not be reached or answered with a failure.
    #[error("content lookup failed: {0}")]
    Transport(String),

    /// The remote store answered with data that could not be interpreted.
    #[error("content lookup returned malformed data: {0}")]
    Malformed(String),
}
