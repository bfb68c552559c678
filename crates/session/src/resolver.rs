//! Session resolver
//!
//! Owns the published [`AuthState`] and the cached company id. Every remote
//! lookup is tagged with the generation current when it was issued; a lookup
//! whose generation is stale by the time it returns is dropped without
//! touching state or cache.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tally_client::CompanyDirectory;
use tally_core::company::CompanyCache;
use tally_core::session::{AuthState, Session};
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use crate::error::{Result, SessionError};

/// Single writer of the session state
pub struct SessionResolver {
    directory: Arc<dyn CompanyDirectory>,
    cache: Arc<dyn CompanyCache>,
    state_tx: watch::Sender<AuthState>,
    generation: AtomicU64,
    /// Serialises commits of state and cache
    commit: Mutex<()>,
}

impl SessionResolver {
    /// Create a resolver in the `Resolving` state
    pub fn new(directory: Arc<dyn CompanyDirectory>, cache: Arc<dyn CompanyCache>) -> Self {
        let (state_tx, _) = watch::channel(AuthState::Resolving);
        Self {
            directory,
            cache,
            state_tx,
            generation: AtomicU64::new(0),
            commit: Mutex::new(()),
        }
    }

    /// Read-only view of the published state
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state_tx.subscribe()
    }

    /// Snapshot of the published state
    pub fn state(&self) -> AuthState {
        self.state_tx.borrow().clone()
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// The cached company id; unreadable storage counts as empty
    pub async fn cached_company_id(&self) -> Option<String> {
        match self.cache.load().await {
            Ok(company_id) => company_id,
            Err(e) => {
                warn!("Failed to read cached company id: {}", e);
                None
            }
        }
    }

    /// Startup entry point with the session the provider restored, if any
    pub async fn on_session_restored(&self, session: Option<Session>) -> AuthState {
        info!(
            "Restoring session ({})",
            if session.is_some() { "signed in" } else { "no session" }
        );
        self.apply(session).await
    }

    /// Provider event after startup: sign-in, sign-out or token refresh
    pub async fn on_session_changed(&self, session: Option<Session>) -> AuthState {
        self.apply(session).await
    }

    async fn apply(&self, session: Option<Session>) -> AuthState {
        match session {
            Some(session) => self.resolve(session).await,
            None => self.sign_out().await,
        }
    }

    /// Override the company link after the caller completed a backend write.
    ///
    /// `None` or a blank id unlinks. Pending lookups are invalidated so they
    /// cannot overwrite the override. A sign-out that lands during the cache
    /// write wins and the call fails with `NotAuthenticated`.
    pub async fn set_company_id(&self, company_id: Option<String>) -> Result<AuthState> {
        let _commit = self.commit.lock().await;

        let session = self
            .state_tx
            .borrow()
            .session()
            .cloned()
            .ok_or(SessionError::NotAuthenticated)?;
        let generation = self.begin_lookup();

        let company_id = company_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());
        match &company_id {
            Some(id) => self.write_cache(id).await,
            None => self.clear_cache().await,
        }

        info!(
            "Company set to {} for {}",
            company_id.as_deref().unwrap_or("none"),
            session.email
        );
        let state = AuthState::authenticated(session, company_id);
        if !self.publish_if_current(generation, state.clone()) {
            return Err(SessionError::NotAuthenticated);
        }
        Ok(state)
    }

    async fn sign_out(&self) -> AuthState {
        // Publish before waiting on anything so the guard reacts at once
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.state_tx.send_replace(AuthState::Anonymous);

        let _commit = self.commit.lock().await;
        self.clear_cache().await;
        self.state_tx.send_replace(AuthState::Anonymous);
        info!("Signed out");
        AuthState::Anonymous
    }

    async fn resolve(&self, session: Session) -> AuthState {
        let generation = self.begin_lookup();
        self.resolve_tagged(generation, session).await
    }

    /// Claim a generation for a lookup; anything claimed earlier goes stale
    pub(crate) fn begin_lookup(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Look up and commit the company link for a lookup claimed with
    /// [`begin_lookup`](Self::begin_lookup)
    pub(crate) async fn resolve_tagged(&self, generation: u64, session: Session) -> AuthState {
        {
            let _commit = self.commit.lock().await;
            if self.is_stale(generation) {
                return self.state();
            }
            let same_user = self
                .state_tx
                .borrow()
                .session()
                .is_some_and(|current| current.user_id == session.user_id);
            // A known user keeps the current state during a token refresh;
            // anyone else waits in `Resolving` until the backend answers.
            if !same_user {
                self.publish_if_current(generation, AuthState::Resolving);
            }
        }

        debug!("Looking up company link for {} (generation {})", session.email, generation);
        let lookup = self.directory.lookup_company_link(&session.email).await;

        let _commit = self.commit.lock().await;
        if self.is_stale(generation) {
            debug!(
                "Discarding company lookup for {} (generation {} superseded)",
                session.email, generation
            );
            return self.state();
        }

        let company_id = match lookup {
            Ok(Some(company_id)) => {
                self.write_cache(&company_id).await;
                Some(company_id)
            }
            Ok(None) => {
                self.clear_cache().await;
                None
            }
            Err(e) if e.is_not_found() => {
                self.clear_cache().await;
                None
            }
            Err(e) => {
                warn!(
                    "Company lookup for {} failed, using cached id: {}",
                    session.email, e
                );
                self.cached_company_id().await
            }
        };

        let state = AuthState::authenticated(session, company_id);
        if !self.publish_if_current(generation, state.clone()) {
            debug!("Sign-out arrived during cache write, dropping lookup result");
            return self.state();
        }
        info!(
            "Resolved {} to {}",
            state.session().map(|s| s.email.as_str()).unwrap_or_default(),
            state.company_id().unwrap_or("no company")
        );
        state
    }

    /// Publish `state` unless `generation` has been superseded. The check runs
    /// under the channel's write lock, so a sign-out either lands first and
    /// wins, or publishes after this and overwrites it.
    fn publish_if_current(&self, generation: u64, state: AuthState) -> bool {
        self.state_tx.send_if_modified(|current| {
            if self.is_stale(generation) {
                return false;
            }
            *current = state;
            true
        })
    }

    fn is_stale(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) != generation
    }

    async fn write_cache(&self, company_id: &str) {
        if let Err(e) = self.cache.store(company_id).await {
            warn!("Failed to cache company id {}: {}", company_id, e);
        }
    }

    async fn clear_cache(&self) {
        if let Err(e) = self.cache.clear().await {
            warn!("Failed to clear cached company id: {}", e);
        }
    }
}
