//! Expense records, their persistence and the form for editing them.

mod domain;
mod form;
mod store;

pub use domain::{Amount, Category, Expense, ExpenseField, ExpenseId, ItemName};
pub use form::{ExpenseForm, FieldErrors};
pub use store::{ExpenseStore, seed_expenses};
