//! Tally API client
//!
//! HTTP access to the Tally REST backend: a generic request wrapper, typed
//! endpoint bindings, and the [`CompanyDirectory`] seam the session layer
//! depends on.

mod client;
mod config;
mod directory;
mod endpoints;
mod envelope;
mod error;

#[cfg(test)]
mod test_support;

pub use client::ApiClient;
pub use config::{ClientConfig, DEFAULT_API_URL};
pub use directory::CompanyDirectory;
pub use endpoints::{
    Categories, Companies, CreatedCompany, Documents, Expenses, RecordedExpense, Users,
};
pub use envelope::{Ack, Envelope};
pub use error::{ApiError, Result, GENERIC_FAILURE};
