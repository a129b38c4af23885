//! Route handlers for the expenses page and its table controls.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    AppState,
    dialog::{DialogRegistry, FactClient, open_dialog},
    expense::ExpenseId,
    page::{
        ExpensePage, lock_page,
        view::{deleted_expenses_view, expenses_view},
    },
};

/// The state needed by the expenses page routes.
#[derive(Debug, Clone)]
pub struct ExpensePageState {
    pub expense_page: Arc<Mutex<ExpensePage>>,
    pub dialogs: DialogRegistry,
    pub fact_client: FactClient,
}

impl FromRef<AppState> for ExpensePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            expense_page: state.expense_page.clone(),
            dialogs: state.dialogs.clone(),
            fact_client: state.fact_client.clone(),
        }
    }
}

/// The form data sent by a table checkbox. Browsers omit unchecked checkboxes.
#[derive(Debug, Default, Deserialize)]
pub struct CheckboxForm {
    #[serde(default)]
    checked: Option<String>,
}

impl CheckboxForm {
    fn is_checked(&self) -> bool {
        self.checked.is_some()
    }
}

/// Render the expenses page.
pub async fn get_expenses_page(State(state): State<ExpensePageState>) -> Response {
    match lock_page(&state.expense_page) {
        Ok(page) => expenses_view(&page).into_response(),
        Err(error) => error.into_response(),
    }
}

/// Select or deselect one row and render the updated table.
pub async fn toggle_row(
    Path(row_id): Path<ExpenseId>,
    State(state): State<ExpensePageState>,
    Form(form): Form<CheckboxForm>,
) -> Response {
    let mut page = match lock_page(&state.expense_page) {
        Ok(page) => page,
        Err(error) => return error.into_alert_response(),
    };

    match page.toggle_row(&row_id, form.is_checked()) {
        Ok(()) => page.table().render().into_response(),
        Err(error) => error.into_alert_response(),
    }
}

/// Select or deselect every row and render the updated table.
pub async fn toggle_all_rows(
    State(state): State<ExpensePageState>,
    Form(form): Form<CheckboxForm>,
) -> Response {
    let mut page = match lock_page(&state.expense_page) {
        Ok(page) => page,
        Err(error) => return error.into_alert_response(),
    };

    page.toggle_all(form.is_checked());

    page.table().render().into_response()
}

/// Press a row's button. The edit button responds with the editor dialog for that row.
pub async fn press_row_button(
    Path((column_index, row_id)): Path<(usize, ExpenseId)>,
    State(state): State<ExpensePageState>,
) -> Response {
    let to_edit = match lock_page(&state.expense_page) {
        Ok(mut page) => page.press_button(column_index, &row_id),
        Err(error) => Err(error),
    };

    match to_edit {
        Ok(Some(expense)) => open_dialog(&state.dialogs, &state.fact_client, Some(expense)),
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error.into_alert_response(),
    }
}

/// Delete the selected expenses and render the updated table.
///
/// Responds with an error alert if nothing is selected.
pub async fn delete_selected_expenses(State(state): State<ExpensePageState>) -> Response {
    let mut page = match lock_page(&state.expense_page) {
        Ok(page) => page,
        Err(error) => return error.into_alert_response(),
    };

    match page.delete_selected() {
        Ok(deleted) => {
            tracing::info!("Deleted {deleted} expenses");
            deleted_expenses_view(&page, deleted).into_response()
        }
        Err(error) => error.into_alert_response(),
    }
}
