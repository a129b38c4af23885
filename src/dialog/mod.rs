//! The modal dialog for adding or editing an expense.
//!
//! The dialog shows the expense form next to a fact that is fetched in the
//! background when the dialog opens.

mod fact;
mod handlers;
mod registry;
mod view;

pub use fact::{DEFAULT_FACT_URL, FACT_FALLBACK, FactClient};
pub use handlers::{
    close_dialog, get_dialog_fact, get_new_expense_dialog, open_dialog, submit_dialog,
};
pub use registry::{DialogId, DialogRegistry};
pub use view::DIALOG_CONTAINER_ID;
