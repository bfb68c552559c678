//! Company module
//!
//! Company and user-record types, plus the locally persisted company-id hint.

mod cache;
mod local_storage;
mod model;

pub use cache::{CompanyCache, COMPANY_ID_KEY};
pub use local_storage::LocalStorage;
pub use model::*;
