//! Account settings: current company, company change, account deletion

use std::sync::Arc;

use tally_client::CompanyDirectory;
use tally_core::company::{Company, UserPatch};
use tally_core::session::{AuthState, Session};
use tracing::info;

use crate::error::{Result, SessionError};
use crate::resolver::SessionResolver;

pub struct AccountSettings {
    resolver: Arc<SessionResolver>,
    directory: Arc<dyn CompanyDirectory>,
}

impl AccountSettings {
    pub fn new(resolver: Arc<SessionResolver>, directory: Arc<dyn CompanyDirectory>) -> Self {
        Self {
            resolver,
            directory,
        }
    }

    fn session(&self) -> Result<Session> {
        self.resolver
            .state()
            .session()
            .cloned()
            .ok_or(SessionError::NotAuthenticated)
    }

    /// The company the user is linked to, if any
    pub async fn current_company(&self) -> Result<Option<Company>> {
        let state = self.resolver.state();
        if !state.is_authenticated() {
            return Err(SessionError::NotAuthenticated);
        }
        match state.company_id() {
            Some(company_id) => Ok(Some(self.directory.get_company(company_id).await?)),
            None => Ok(None),
        }
    }

    /// Ask the backend to move the user to another company.
    ///
    /// The backend refuses to change an existing link; that refusal comes back
    /// as [`SessionError::AlreadyLinked`] carrying the server's message, and
    /// the published state keeps the old company.
    pub async fn change_company(&self, company_id: &str) -> Result<AuthState> {
        let session = self.session()?;
        let company_id = company_id.trim();
        if company_id.is_empty() {
            return Err(SessionError::InvalidInput(
                "Please select a company.".to_string(),
            ));
        }

        let patch = UserPatch::company(company_id)
            .with_email(&session.email)
            .with_full_name(session.display_name());
        self.directory
            .update_user(&session.user_id.to_string(), &patch)
            .await
            .map_err(SessionError::from_link_write)?;

        info!("Changed company of {} to {}", session.email, company_id);
        self.resolver
            .set_company_id(Some(company_id.to_string()))
            .await
    }

    /// Delete the user record and sign out locally
    pub async fn delete_account(&self) -> Result<()> {
        let session = self.session()?;
        self.directory
            .delete_user(&session.user_id.to_string())
            .await?;
        info!("Deleted account {}", session.email);
        self.resolver.on_session_changed(None).await;
        Ok(())
    }
}
