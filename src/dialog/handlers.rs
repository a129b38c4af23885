//! Route handlers for opening, submitting and closing the expense editor dialog.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    AppState, Error,
    dialog::{
        DialogId, DialogRegistry, FACT_FALLBACK, FactClient,
        view::{dialog_view, fact_view},
    },
    endpoints,
    expense::{Expense, ExpenseForm, FieldErrors},
    page::{ExpensePage, lock_page},
};

/// The state needed by the dialog routes.
#[derive(Debug, Clone)]
pub struct DialogState {
    pub expense_page: Arc<Mutex<ExpensePage>>,
    pub dialogs: DialogRegistry,
    pub fact_client: FactClient,
}

impl FromRef<AppState> for DialogState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            expense_page: state.expense_page.clone(),
            dialogs: state.dialogs.clone(),
            fact_client: state.fact_client.clone(),
        }
    }
}

fn dialog_title(initial: Option<&Expense>) -> &'static str {
    match initial {
        Some(_) => "Edit Expense",
        None => "Add Expense",
    }
}

/// Open a dialog for `initial`, or for a new expense if `initial` is `None`, and render it.
pub fn open_dialog(
    dialogs: &DialogRegistry,
    fact_client: &FactClient,
    initial: Option<Expense>,
) -> Response {
    let form = initial
        .as_ref()
        .map(ExpenseForm::from_expense)
        .unwrap_or_default();
    let title = dialog_title(initial.as_ref());

    match dialogs.open(initial, fact_client) {
        Ok(dialog_id) => dialog_view(dialog_id, title, &form, &FieldErrors::default()).into_response(),
        Err(error) => error.into_alert_response(),
    }
}

/// Open the dialog for adding an expense.
pub async fn get_new_expense_dialog(State(state): State<DialogState>) -> Response {
    open_dialog(&state.dialogs, &state.fact_client, None)
}

/// Save the expense in the dialog's form.
///
/// Invalid input re-renders the dialog with the error messages next to the fields.
/// On success the dialog is closed and the client is redirected to the expenses page.
pub async fn submit_dialog(
    Path(dialog_id): Path<DialogId>,
    State(state): State<DialogState>,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let initial = match state.dialogs.initial(dialog_id) {
        Ok(initial) => initial,
        Err(error) => return error.into_alert_response(),
    };

    let valid_expense = match form.validate() {
        Ok(valid_expense) => valid_expense,
        Err(errors) => {
            let title = dialog_title(initial.as_ref());
            return dialog_view(dialog_id, title, &form, &errors).into_response();
        }
    };

    let result = lock_page(&state.expense_page).and_then(|mut page| match initial {
        Some(expense) => page.update(valid_expense.into_expense_with_id(expense.id)),
        None => page.add(valid_expense.into_new_expense()),
    });

    if let Err(error) = result {
        return error.into_alert_response();
    }

    if let Err(error) = state.dialogs.close(dialog_id) {
        return error.into_alert_response();
    }

    (
        StatusCode::SEE_OTHER,
        HxRedirect(endpoints::EXPENSES_VIEW.to_owned()),
        (),
    )
        .into_response()
}

/// Close the dialog without saving. The response body is empty so the dialog is swapped out.
pub async fn close_dialog(
    Path(dialog_id): Path<DialogId>,
    State(state): State<DialogState>,
) -> Response {
    match state.dialogs.close(dialog_id) {
        Ok(_) => StatusCode::OK.into_response(),
        Err(error) => error.into_alert_response(),
    }
}

/// Wait for the dialog's fact and render it.
///
/// Responds with 204 No Content if the dialog is closed before the fact arrives, so that a late
/// fact is never shown.
pub async fn get_dialog_fact(
    Path(dialog_id): Path<DialogId>,
    State(state): State<DialogState>,
) -> Response {
    let mut receiver = match state.dialogs.fact_receiver(dialog_id) {
        Ok(receiver) => receiver,
        Err(Error::DialogClosed) => return StatusCode::NO_CONTENT.into_response(),
        Err(error) => return error.into_alert_response(),
    };

    let fact = match receiver.wait_for(Option::is_some).await {
        Ok(fact) => fact.as_deref().unwrap_or(FACT_FALLBACK).to_owned(),
        Err(_) => return StatusCode::NO_CONTENT.into_response(),
    };

    match state.dialogs.is_open(dialog_id) {
        Ok(true) => fact_view(&fact).into_response(),
        Ok(false) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error.into_alert_response(),
    }
}
