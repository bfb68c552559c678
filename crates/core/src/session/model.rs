//! Session model definitions

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity handed out by the external auth provider.
///
/// The application only ever holds a read-only copy; sign-in and sign-out are
/// owned by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
}

impl Session {
    /// Create a session for the given user
    pub fn new(user_id: Uuid, email: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
            full_name: None,
        }
    }

    /// Set the full name from provider metadata
    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    /// Name to store on the user record: provider full name, then the email
    /// local part, then `"User"`.
    pub fn display_name(&self) -> String {
        if let Some(name) = self.full_name.as_deref().map(str::trim) {
            if !name.is_empty() {
                return name.to_string();
            }
        }
        match self.email.split('@').next() {
            Some(local) if !local.is_empty() => local.to_string(),
            _ => "User".to_string(),
        }
    }
}

/// Resolved authentication state published by the session resolver
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AuthState {
    /// Initial load; the stored session has not been checked yet
    #[default]
    Resolving,
    Anonymous,
    /// Signed in, no company linked yet (onboarding pending)
    Unlinked { session: Session },
    Linked { session: Session, company_id: String },
}

impl AuthState {
    /// Build the authenticated state for a session and an optional company
    pub fn authenticated(session: Session, company_id: Option<String>) -> Self {
        match company_id {
            Some(company_id) => Self::Linked {
                session,
                company_id,
            },
            None => Self::Unlinked { session },
        }
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Unlinked { session } | Self::Linked { session, .. } => Some(session),
            Self::Resolving | Self::Anonymous => None,
        }
    }

    pub fn company_id(&self) -> Option<&str> {
        match self {
            Self::Linked { company_id, .. } => Some(company_id),
            _ => None,
        }
    }

    pub fn is_resolving(&self) -> bool {
        matches!(self, Self::Resolving)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().is_some()
    }
}
