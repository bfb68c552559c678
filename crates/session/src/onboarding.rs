//! Onboarding: link a signed-in user to a company
//!
//! The backend enforces one company per email. Before writing anything the
//! flow re-checks the user's current link, and a conflict reported by the
//! backend is surfaced as [`SessionError::AlreadyLinked`] with local state left
//! untouched.

use std::sync::Arc;

use tally_client::CompanyDirectory;
use tally_core::company::{Company, NewCompany, NewUser, UserPatch};
use tally_core::session::{AuthState, Session};
use tracing::{info, warn};

use crate::error::{Result, SessionError, ALREADY_LINKED_MESSAGE};
use crate::resolver::SessionResolver;

/// Company picked or created during onboarding
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyChoice {
    pub company: Company,
    /// The name matched a company that already existed
    pub existing: bool,
}

pub struct Onboarding {
    resolver: Arc<SessionResolver>,
    directory: Arc<dyn CompanyDirectory>,
}

impl Onboarding {
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

    /// If the backend already links this user, adopt that company and return it
    pub async fn check_existing(&self) -> Result<Option<String>> {
        let session = self.session()?;
        let linked = match self.directory.find_user(&session.email).await {
            Ok(user) => user.and_then(|u| u.linked_company().map(str::to_string)),
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(e.into()),
        };

        if let Some(company_id) = &linked {
            info!("{} is already linked to {}", session.email, company_id);
            self.resolver.set_company_id(Some(company_id.clone())).await?;
        }
        Ok(linked)
    }

    pub async fn list_companies(&self) -> Result<Vec<Company>> {
        Ok(self.directory.list_companies().await?)
    }

    /// Create a company, or reuse the one with the same name
    pub async fn create_company(&self, name: &str, industry: &str) -> Result<CompanyChoice> {
        let company = NewCompany::new(name, industry);
        if company.name.is_empty() {
            return Err(SessionError::InvalidInput(
                "Company name is required.".to_string(),
            ));
        }

        let created = self.directory.create_company(&company).await?;
        if created.existing {
            info!("Using existing company {} ({})", created.company.name, created.company.id);
        } else {
            info!("Created company {} ({})", created.company.name, created.company.id);
        }
        Ok(CompanyChoice {
            company: created.company,
            existing: created.existing,
        })
    }

    /// Link the signed-in user to an existing company
    pub async fn select_company(&self, company_id: &str) -> Result<AuthState> {
        let company_id = company_id.trim();
        if company_id.is_empty() {
            return Err(SessionError::InvalidInput(
                "Please select a company.".to_string(),
            ));
        }
        self.associate(company_id).await
    }

    /// Create (or reuse) a company by name and link the user to it
    pub async fn create_and_join(&self, name: &str, industry: &str) -> Result<AuthState> {
        let choice = self.create_company(name, industry).await?;
        self.associate(&choice.company.id).await
    }

    async fn associate(&self, company_id: &str) -> Result<AuthState> {
        let session = self.session()?;

        let current = match self.directory.find_user(&session.email).await {
            Ok(user) => user.and_then(|u| u.linked_company().map(str::to_string)),
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(e.into()),
        };
        match current {
            Some(existing) if existing == company_id => {
                return self.resolver.set_company_id(Some(existing)).await;
            }
            Some(existing) => {
                warn!(
                    "{} is linked to {}, refusing to link {}",
                    session.email, existing, company_id
                );
                return Err(SessionError::already_linked(ALREADY_LINKED_MESSAGE));
            }
            None => {}
        }

        let user = NewUser {
            id: session.user_id.to_string(),
            email: session.email.clone(),
            full_name: session.display_name(),
            company_id: company_id.to_string(),
        };
        match self.directory.create_user(&user).await {
            Ok(()) => {}
            Err(e) if e.is_already_exists() => {
                info!("User record for {} exists, updating company", session.email);
                let patch = UserPatch::company(company_id)
                    .with_email(&user.email)
                    .with_full_name(&user.full_name);
                self.directory
                    .update_user(&user.id, &patch)
                    .await
                    .map_err(SessionError::from_link_write)?;
            }
            Err(e) => return Err(SessionError::from_link_write(e)),
        }

        info!("Linked {} to {}", session.email, company_id);
        self.resolver.set_company_id(Some(company_id.to_string())).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{session, Fixture};
    use tally_core::route::{evaluate, NavDecision};

    async fn onboarding_for(fx: &Fixture, email: &str) -> (Onboarding, Session) {
        let s = session(email);
        fx.resolver.on_session_restored(Some(s.clone())).await;
        let flow = Onboarding::new(fx.resolver.clone(), fx.directory.clone());
        (flow, s)
    }

    #[tokio::test]
    async fn test_select_company_links_new_user() {
        let fx = Fixture::new().await;
        fx.directory.add_company("co_1", "Acme");
        let (flow, _) = onboarding_for(&fx, "new@acme.test").await;
        assert_eq!(
            evaluate(&fx.resolver.state(), "/dashboard"),
            NavDecision::Redirect("/onboarding")
        );

        let state = flow.select_company("co_1").await.unwrap();

        assert_eq!(state.company_id(), Some("co_1"));
        assert_eq!(fx.directory.company_of("new@acme.test").as_deref(), Some("co_1"));
        assert_eq!(fx.cached().await.as_deref(), Some("co_1"));
        assert_eq!(evaluate(&state, "/dashboard"), NavDecision::Allow);
    }

    #[tokio::test]
    async fn test_already_linked_user_is_refused_without_local_change() {
        let fx = Fixture::new().await;
        let (flow, s) = onboarding_for(&fx, "owner@acme.test").await;
        // Linked elsewhere after this session resolved
        fx.directory
            .add_user_with_id(&s.user_id.to_string(), "owner@acme.test", Some("co_other"));

        let err = flow.select_company("co_1").await.unwrap_err();

        assert!(matches!(err, SessionError::AlreadyLinked { .. }));
        assert_eq!(err.user_message(), ALREADY_LINKED_MESSAGE);
        assert!(matches!(fx.resolver.state(), AuthState::Unlinked { .. }));
        assert_eq!(fx.cached().await, None);
        assert!(!fx
            .directory
            .calls()
            .iter()
            .any(|c| c.starts_with("create_user") || c.starts_with("update_user")));
    }

    #[tokio::test]
    async fn test_existing_record_falls_back_to_patch() {
        let fx = Fixture::new().await;
        let (flow, s) = onboarding_for(&fx, "half@acme.test").await;
        fx.directory
            .add_user_with_id(&s.user_id.to_string(), "half@acme.test", Some(""));

        let state = flow.select_company("co_3").await.unwrap();

        assert_eq!(state.company_id(), Some("co_3"));
        assert_eq!(fx.directory.company_of("half@acme.test").as_deref(), Some("co_3"));
        let calls = fx.directory.calls();
        assert!(calls.contains(&"create_user co_3".to_string()));
        assert!(calls.contains(&"update_user co_3".to_string()));
    }

    #[tokio::test]
    async fn test_create_and_join_reuses_company_by_name() {
        let fx = Fixture::new().await;
        fx.directory.add_company("co_1", "Acme");
        let (flow, _) = onboarding_for(&fx, "new@acme.test").await;

        let choice = flow.create_company("  Acme ", "").await.unwrap();
        assert!(choice.existing);
        assert_eq!(choice.company.id, "co_1");

        let state = flow.create_and_join("Globex", "Retail").await.unwrap();
        let company_id = state.company_id().unwrap().to_string();
        assert_ne!(company_id, "co_1");
        assert_eq!(flow.list_companies().await.unwrap().len(), 2);
        assert_eq!(fx.cached().await, Some(company_id));
    }

    #[tokio::test]
    async fn test_blank_input_is_rejected() {
        let fx = Fixture::new().await;
        let (flow, _) = onboarding_for(&fx, "new@acme.test").await;

        let err = flow.create_company("   ", "Retail").await.unwrap_err();
        assert_eq!(err.user_message(), "Company name is required.");
        assert!(matches!(
            flow.select_company(" ").await,
            Err(SessionError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_check_existing_adopts_backend_link() {
        let fx = Fixture::new().await;
        let (flow, _) = onboarding_for(&fx, "owner@acme.test").await;
        assert_eq!(flow.check_existing().await.unwrap(), None);

        fx.directory.add_user("owner@acme.test", Some("co_42"));
        assert_eq!(
            flow.check_existing().await.unwrap().as_deref(),
            Some("co_42")
        );
        assert_eq!(fx.resolver.state().company_id(), Some("co_42"));
    }

    #[tokio::test]
    async fn test_requires_session() {
        let fx = Fixture::new().await;
        fx.resolver.on_session_restored(None).await;
        let flow = Onboarding::new(fx.resolver.clone(), fx.directory.clone());

        assert!(matches!(
            flow.select_company("co_1").await,
            Err(SessionError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn test_transient_failure_shows_generic_message() {
        let fx = Fixture::new().await;
        let (flow, _) = onboarding_for(&fx, "new@acme.test").await;
        fx.directory.set_offline(true);

        let err = flow.select_company("co_1").await.unwrap_err();
        assert_eq!(err.user_message(), tally_client::GENERIC_FAILURE);
        assert!(matches!(fx.resolver.state(), AuthState::Unlinked { .. }));
    }
}
