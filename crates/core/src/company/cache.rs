//! Company-id cache trait
//!
//! The cached id is a hint used while the remote lookup is pending or
//! unreachable. It is never authoritative.

use async_trait::async_trait;

use crate::Result;

/// Storage key holding the cached company id
pub const COMPANY_ID_KEY: &str = "company_id";

/// Interface for the persisted company-id hint
#[async_trait]
pub trait CompanyCache: Send + Sync {
    /// Read the cached id, `None` when nothing is stored
    async fn load(&self) -> Result<Option<String>>;

    /// Replace the cached id
    async fn store(&self, company_id: &str) -> Result<()>;

    /// Remove the cached id
    async fn clear(&self) -> Result<()>;
}
