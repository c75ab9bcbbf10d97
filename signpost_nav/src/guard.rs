// Copyright 2025 the Signpost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Access guard: a pure `(principal, location) -> Allow | Redirect` decision.
//!
//! Rules are evaluated in order; the first that applies wins.
//!
//! 1. Under the operator prefix and not an operator: anonymous visitors go to
//!    the login page, customers to their own console.
//! 2. Under the customer prefix and not a customer: anonymous visitors go to
//!    the login page, operators to their own console.
//! 3. Under an authentication-entry prefix while signed in: go to the role's
//!    console.
//! 4. Otherwise allow.
//!
//! Prefix matching is segment-aware: `/dashboard` covers `/dashboard` and
//! `/dashboard/users`, not `/dashboards`.
//!
//! ```
//! use signpost_nav::guard::{AccessGuard, GuardDecision};
//! use signpost_nav::location::Location;
//! use signpost_nav::types::Principal;
//!
//! let guard = AccessGuard::default();
//! let decision = guard.decide(&Principal::anonymous(), &Location::parse("/dashboard/overview"));
//! assert_eq!(decision, GuardDecision::Redirect(Location::parse("/login")));
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::location::Location;
use crate::resolve::RouteRule;
use crate::types::{Layout, Principal, Role};

/// Prefix and default-page table consulted by [`AccessGuard`].
///
/// Loaded from the `[guard]` table of the site configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardRules {
    /// Operator console prefix.
    pub operator_prefix: String,
    /// Customer console prefix.
    pub customer_prefix: String,
    /// Authentication-entry prefixes (login, registration, recovery).
    pub auth_prefixes: Vec<String>,
    /// Where anonymous visitors are sent.
    pub login_path: String,
    /// Operator default page.
    pub operator_home: String,
    /// Customer default page.
    pub customer_home: String,
}

impl Default for GuardRules {
    fn default() -> Self {
        Self {
            operator_prefix: String::from("/dashboard"),
            customer_prefix: String::from("/portal"),
            auth_prefixes: ["/login", "/register", "/forgot-password", "/reset-password"]
                .into_iter()
                .map(String::from)
                .collect(),
            login_path: String::from("/login"),
            operator_home: String::from("/dashboard/overview"),
            customer_home: String::from("/portal/overview"),
        }
    }
}

impl GuardRules {
    /// Default page for `role`. Anonymous visitors default to the login page.
    pub fn home_for(&self, role: Role) -> &str {
        match role {
            Role::Anonymous => &self.login_path,
            Role::Operator => &self.operator_home,
            Role::Customer => &self.customer_home,
        }
    }

    /// Check that every prefix is a non-root absolute path and that no
    /// role's default page is redirected for that same role.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_prefix("operator_prefix", &self.operator_prefix)?;
        check_prefix("customer_prefix", &self.customer_prefix)?;
        for prefix in &self.auth_prefixes {
            check_prefix("auth_prefixes", prefix)?;
        }
        let guard = AccessGuard::new(self.clone());
        for role in [Role::Anonymous, Role::Operator, Role::Customer] {
            let target = self.home_for(role);
            let principal = Principal {
                role,
                ..Principal::default()
            };
            if guard.decide(&principal, &Location::parse(target)) != GuardDecision::Allow {
                return Err(ConfigError::RedirectLoop {
                    role,
                    target: String::from(target),
                });
            }
        }
        Ok(())
    }

    /// Check that every console section of `routes` lies under the prefix
    /// guarding that console.
    /// A console section outside its prefix renders for every role.
    pub fn covers(&self, routes: &[RouteRule]) -> Result<(), ConfigError> {
        for rule in routes {
            let prefix = match rule.layout {
                Layout::Public => continue,
                Layout::OperatorConsole => &self.operator_prefix,
                Layout::CustomerConsole => &self.customer_prefix,
            };
            if !path_under(&format!("/{}", rule.section), prefix) {
                return Err(ConfigError::UnguardedConsole {
                    layout: rule.layout,
                    section: rule.section,
                    prefix: prefix.clone(),
                });
            }
        }
        Ok(())
    }
}

fn check_prefix(field: &'static str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim_end_matches('/');
    if !value.starts_with('/') || trimmed.is_empty() {
        return Err(ConfigError::InvalidPrefix {
            field,
            value: String::from(value),
        });
    }
    Ok(())
}

/// Returns true if `path` equals `prefix` or lies beneath it, segment-wise.
///
/// Trailing slashes on either side are ignored.
pub fn path_under(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    let path = path.trim_end_matches('/');
    if prefix.is_empty() {
        return false;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Outcome of [`AccessGuard::decide`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the requested location.
    Allow,
    /// Replace the requested location with this one.
    Redirect(Location),
}

/// Role-based access guard over path prefixes.
#[derive(Clone, Debug, Default)]
pub struct AccessGuard {
    rules: GuardRules,
}

impl AccessGuard {
    /// Create a guard over `rules`.
    ///
    /// Callers loading rules from outside should run [`GuardRules::validate`] first.
    pub fn new(rules: GuardRules) -> Self {
        Self { rules }
    }

    /// The rule table.
    pub fn rules(&self) -> &GuardRules {
        &self.rules
    }

    /// Decide whether `principal` may see `location`.
    pub fn decide(&self, principal: &Principal, location: &Location) -> GuardDecision {
        let path = location.path();
        let rules = &self.rules;
        let role = principal.role;

        if path_under(path, &rules.operator_prefix) && role != Role::Operator {
            return self.redirect_for(role);
        }
        if path_under(path, &rules.customer_prefix) && role != Role::Customer {
            return self.redirect_for(role);
        }
        if role != Role::Anonymous && rules.auth_prefixes.iter().any(|p| path_under(path, p)) {
            return self.redirect_for(role);
        }
        GuardDecision::Allow
    }

    fn redirect_for(&self, role: Role) -> GuardDecision {
        GuardDecision::Redirect(Location::parse(self.rules.home_for(role)))
    }
}
