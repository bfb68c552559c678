//! Route module
//!
//! Navigation decisions derived from the resolved authentication state.

mod guard;

pub use guard::{evaluate, is_public, layout_for, normalize, Layout, NavDecision, routes};
