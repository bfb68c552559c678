//! Auth-provider events

use std::sync::Arc;

use tally_core::session::Session;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::resolver::SessionResolver;

/// Notification from the external auth provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityEvent {
    /// Session found in storage at startup
    Restored(Option<Session>),
    SignedIn(Session),
    SignedOut,
    TokenRefreshed(Session),
}

impl IdentityEvent {
    fn into_session(self) -> Option<Session> {
        match self {
            Self::Restored(session) => session,
            Self::SignedIn(session) | Self::TokenRefreshed(session) => Some(session),
            Self::SignedOut => None,
        }
    }
}

impl SessionResolver {
    /// Drive the resolver from a provider event stream until the sender closes.
    ///
    /// Lookups run on their own tasks so a sign-out is applied as soon as it
    /// is received, never queued behind a pending lookup.
    pub async fn run(self: Arc<Self>, mut events: mpsc::Receiver<IdentityEvent>) {
        let mut lookups = JoinSet::new();

        while let Some(event) = events.recv().await {
            debug!("Identity event: {:?}", event);
            let restored = matches!(event, IdentityEvent::Restored(_));
            match event.into_session() {
                Some(session) => {
                    // Claimed now, so a sign-out received later supersedes it
                    let generation = self.begin_lookup();
                    let resolver = Arc::clone(&self);
                    lookups.spawn(async move {
                        if restored {
                            info!("Restoring session for {}", session.email);
                        }
                        resolver.resolve_tagged(generation, session).await
                    });
                }
                None => {
                    self.on_session_changed(None).await;
                }
            }

            // Reap finished lookups so the set does not grow
            while lookups.try_join_next().is_some() {}
        }

        while lookups.join_next().await.is_some() {}
        info!("Identity event stream closed");
    }
}
