//! Error types for tally-session

use tally_client::{ApiError, GENERIC_FAILURE};
use thiserror::Error;

/// Result type alias for session operations
pub type Result<T> = std::result::Result<T, SessionError>;

/// Shown when the backend refuses a second company for the same email
pub const ALREADY_LINKED_MESSAGE: &str = "This email is already associated with a company. One email can only be associated with one company.";

/// Errors surfaced by session flows
#[derive(Debug, Error)]
pub enum SessionError {
    /// The operation needs a signed-in user
    #[error("Not signed in")]
    NotAuthenticated,

    /// The user already has a company; the existing link is left untouched
    #[error("{message}")]
    AlreadyLinked { message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

impl SessionError {
    pub fn already_linked(message: impl Into<String>) -> Self {
        Self::AlreadyLinked {
            message: message.into(),
        }
    }

    /// Map a failed user-record write. Conflicts keep the server's wording.
    pub(crate) fn from_link_write(err: ApiError) -> Self {
        if err.is_conflict() {
            match err {
                ApiError::Status { message, .. } if !message.trim().is_empty() => {
                    Self::already_linked(message)
                }
                _ => Self::already_linked(ALREADY_LINKED_MESSAGE),
            }
        } else {
            Self::Api(err)
        }
    }

    /// Text a form shows for this failure
    pub fn user_message(&self) -> String {
        match self {
            Self::NotAuthenticated => "User not authenticated".to_string(),
            Self::AlreadyLinked { message } => message.clone(),
            Self::InvalidInput(message) => message.clone(),
            Self::Api(e) if e.is_transient() => GENERIC_FAILURE.to_string(),
            Self::Api(e) => e.user_message(),
        }
    }
}
