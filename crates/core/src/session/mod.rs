//! Session module
//!
//! Identity issued by the auth provider and the resolved authentication state
//! the rest of the application reads.

mod model;

pub use model::*;
