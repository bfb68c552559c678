//! Navigation guard bound to the resolver's published state

use tally_core::route::{evaluate, layout_for, Layout, NavDecision};
use tally_core::session::AuthState;
use tokio::sync::watch;

use crate::resolver::SessionResolver;

/// Read-only consumer of the session state that decides navigations
#[derive(Clone)]
pub struct RouteGuard {
    state_rx: watch::Receiver<AuthState>,
}

impl RouteGuard {
    pub fn new(resolver: &SessionResolver) -> Self {
        Self {
            state_rx: resolver.subscribe(),
        }
    }

    /// Decision for `path` under the current state
    pub fn decide(&self, path: &str) -> NavDecision {
        evaluate(&self.state_rx.borrow(), path)
    }

    pub fn layout(&self, path: &str) -> Layout {
        layout_for(path)
    }

    /// Wait for resolution to finish, then decide. Returns `Loading` only if
    /// the resolver was dropped while still resolving.
    pub async fn settle(&mut self, path: &str) -> NavDecision {
        let settled = match self.state_rx.wait_for(|state| !state.is_resolving()).await {
            Ok(state) => Some(evaluate(&state, path)),
            Err(_) => None,
        };
        settled.unwrap_or_else(|| self.decide(path))
    }

    /// Wait for the next published state and decide `path` under it
    pub async fn changed(&mut self, path: &str) -> Option<NavDecision> {
        self.state_rx.changed().await.ok()?;
        Some(evaluate(&self.state_rx.borrow_and_update(), path))
    }
}
