//! Core library for Tally
//!
//! This crate contains the client-side domain logic, including:
//! - Session and company-link state
//! - Persisted company-id cache
//! - Route guarding
//! - Expense models and dashboard aggregation

pub mod company;
pub mod error;
pub mod expense;
pub mod route;
pub mod session;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
