//! Route guard
//!
//! `evaluate` is a pure function of `(state, path)`. It never performs I/O, so
//! re-running it on every render or state change cannot trigger lookups.

use serde::Serialize;

use crate::session::AuthState;

/// Well-known application paths
pub mod routes {
    /// Entry page for anonymous visitors
    pub const ENTRY: &str = "/auth";
    pub const LOGIN: &str = "/login";
    pub const SIGNUP: &str = "/signup";
    pub const FORGOT_PASSWORD: &str = "/forgot-password";
    pub const ONBOARDING: &str = "/onboarding";
    pub const ROOT: &str = "/";

    /// Paths reachable without a session
    pub const PUBLIC: [&str; 4] = [ENTRY, LOGIN, SIGNUP, FORGOT_PASSWORD];
}

/// Outcome of guarding a navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "to", rename_all = "snake_case")]
pub enum NavDecision {
    /// Resolution in flight; render a neutral loading view
    Loading,
    Allow,
    Redirect(&'static str),
}

/// Page chrome for a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Page content only (auth pages and onboarding)
    Bare,
    /// Sidebar and top bar around the page
    Shell,
}

/// Strip query, fragment and trailing slash from a requested path
pub fn normalize(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = &path[..end];
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        routes::ROOT
    } else {
        trimmed
    }
}

pub fn is_public(path: &str) -> bool {
    routes::PUBLIC.contains(&normalize(path))
}

fn is_onboarding(path: &str) -> bool {
    normalize(path) == routes::ONBOARDING
}

/// Decide whether `path` may render for `state`, or where to send the visitor
pub fn evaluate(state: &AuthState, path: &str) -> NavDecision {
    let public = is_public(path);

    match state {
        AuthState::Resolving => NavDecision::Loading,
        AuthState::Anonymous if public => NavDecision::Allow,
        AuthState::Anonymous => NavDecision::Redirect(routes::ENTRY),
        AuthState::Unlinked { .. } | AuthState::Linked { .. } if public => {
            NavDecision::Redirect(routes::ROOT)
        }
        AuthState::Unlinked { .. } if !is_onboarding(path) => {
            NavDecision::Redirect(routes::ONBOARDING)
        }
        AuthState::Unlinked { .. } | AuthState::Linked { .. } => NavDecision::Allow,
    }
}

pub fn layout_for(path: &str) -> Layout {
    if is_public(path) || is_onboarding(path) {
        Layout::Bare
    } else {
        Layout::Shell
    }
}
