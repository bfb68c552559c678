//! Error types for tally-client

use thiserror::Error;

/// Result type alias for API calls
pub type Result<T> = std::result::Result<T, ApiError>;

/// Message shown for failures that carry no server explanation
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Errors that can occur while talking to the backend
#[derive(Debug, Error)]
pub enum ApiError {
    /// Server answered with a non-2xx status
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Request never produced a response (connect, timeout, TLS...)
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body did not have the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Response decoded but reported failure or lacked data
    #[error("Unexpected response: {message}")]
    UnexpectedResponse { message: String },
}

impl ApiError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::UnexpectedResponse {
            message: message.into(),
        }
    }

    /// HTTP status of the failure, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// The backend refused because the user is already linked to a company.
    ///
    /// Reported as 409, or as 400 with the one-email-one-company message.
    pub fn is_conflict(&self) -> bool {
        match self {
            Self::Status { status: 409, .. } => true,
            Self::Status {
                status: 400,
                message,
            } => {
                let message = message.to_ascii_lowercase();
                message.contains("already associated") || message.contains("cannot change company")
            }
            _ => false,
        }
    }

    /// The record being created already exists
    pub fn is_already_exists(&self) -> bool {
        match self {
            Self::Status { status: 409, .. } => true,
            Self::Status { message, .. } => message.to_ascii_lowercase().contains("already exists"),
            _ => false,
        }
    }

    /// Transport failures, timeouts, 5xx and malformed bodies
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Status { status, .. } => *status >= 500 || *status == 408 || *status == 429,
            Self::Transport(_) | Self::Decode(_) | Self::UnexpectedResponse { .. } => true,
        }
    }

    /// Text to show the user: the server's message when there is one
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message, .. } if !message.trim().is_empty() => message.clone(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}
