//! Expense module
//!
//! Expense, category and receipt types exchanged with the backend, and the
//! dashboard aggregation over an expense list.

mod model;
mod summary;

pub use model::*;
pub use summary::{monthly_totals, DashboardSummary, MonthlyTotal, TopEntry};
