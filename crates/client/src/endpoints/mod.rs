//! Typed bindings for the backend routes

mod categories;
mod companies;
mod documents;
mod expenses;
mod users;

pub use categories::Categories;
pub use companies::{Companies, CreatedCompany};
pub use documents::Documents;
pub use expenses::{Expenses, RecordedExpense};
pub use users::Users;
