// Copyright 2025 the Signpost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters binding the navigation core to a document implementation.
//!
//! Enabled via feature flags so the core does not depend on either.

#[cfg(feature = "dom_adapter")]
pub mod dom;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;
