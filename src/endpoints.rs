//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/dialogs/{dialog_id}', use [format_endpoint].

use std::fmt::Display;

/// The root route which redirects to the expenses page.
pub const ROOT: &str = "/";
/// The page listing the user's expenses.
pub const EXPENSES_VIEW: &str = "/expenses";
/// The editor dialog for creating a new expense.
pub const NEW_EXPENSE_DIALOG: &str = "/expenses/dialog";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";

/// The route for deleting the selected expenses.
pub const DELETE_SELECTED_EXPENSES: &str = "/api/expenses/delete";
/// The route for selecting or deselecting one row of the expense table.
pub const TOGGLE_ROW: &str = "/api/table/rows/{row_id}/selection";
/// The route for selecting or deselecting every row of the expense table.
pub const TOGGLE_ALL_ROWS: &str = "/api/table/selection";
/// The route for pressing a button in a row of the expense table.
pub const PRESS_ROW_BUTTON: &str = "/api/table/columns/{column}/rows/{row_id}";
/// The route for submitting an editor dialog.
pub const SUBMIT_DIALOG: &str = "/api/dialogs/{dialog_id}";
/// The route for closing an editor dialog without saving.
pub const CLOSE_DIALOG: &str = "/api/dialogs/{dialog_id}/close";
/// The route for the fact shown in an editor dialog.
pub const DIALOG_FACT: &str = "/api/dialogs/{dialog_id}/fact";

/// Replace the first parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/dialogs/{dialog_id}', '{dialog_id}' is the parameter.
/// Endpoints with several parameters are filled in by calling this function once per parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: impl Display) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.char_indices() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
