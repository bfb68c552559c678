//! Session layer for Tally
//!
//! Turns auth-provider events into one published [`AuthState`], keeps the
//! cached company id honest against the backend, and hosts the flows that
//! create or change a user's company link.
//!
//! [`AuthState`]: tally_core::session::AuthState

mod account;
mod error;
mod guard;
mod identity;
mod onboarding;
mod resolver;

#[cfg(test)]
mod test_support;

pub use account::AccountSettings;
pub use error::{SessionError, Result, ALREADY_LINKED_MESSAGE};
pub use guard::RouteGuard;
pub use identity::IdentityEvent;
pub use onboarding::{CompanyChoice, Onboarding};
pub use resolver::SessionResolver;
