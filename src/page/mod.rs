//! The expenses page: a table of expenses with controls for adding, editing and deleting them.

mod controller;
mod handlers;
mod view;

pub use controller::{EXPENSE_TABLE_ID, ExpensePage, lock_page};
pub use handlers::{
    delete_selected_expenses, get_expenses_page, press_row_button, toggle_all_rows, toggle_row,
};
