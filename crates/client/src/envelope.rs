//! Response envelope
//!
//! Most endpoints answer `{"status": "success", "data": ..., "message": ...}`.

use serde::Deserialize;

use crate::error::{ApiError, Result};

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub status: String,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }

    /// Unwrap the payload of a successful response
    pub fn into_data(self) -> Result<T> {
        if !self.is_success() {
            return Err(ApiError::unexpected(format!(
                "status '{}'{}",
                self.status,
                self.message.map(|m| format!(": {m}")).unwrap_or_default()
            )));
        }
        self.data
            .ok_or_else(|| ApiError::unexpected("response carried no data"))
    }
}

/// Envelope of endpoints that only report an outcome
#[derive(Debug, Deserialize)]
pub struct Ack {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl Ack {
    pub fn ensure_success(self) -> Result<Option<String>> {
        if self.status == "success" {
            Ok(self.message)
        } else {
            Err(ApiError::unexpected(format!("status '{}'", self.status)))
        }
    }
}
