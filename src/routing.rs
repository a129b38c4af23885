//! Application router configuration.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{get, post},
};

use crate::{
    AppState,
    dialog::{close_dialog, get_dialog_fact, get_new_expense_dialog, submit_dialog},
    endpoints,
    internal_server_error::get_internal_server_error_page,
    logging::logging_middleware,
    not_found::get_404_not_found,
    page::{
        delete_selected_expenses, get_expenses_page, press_row_button, toggle_all_rows,
        toggle_row,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::ROOT,
            get(|| async { Redirect::to(endpoints::EXPENSES_VIEW) }),
        )
        .route(endpoints::EXPENSES_VIEW, get(get_expenses_page))
        .route(endpoints::NEW_EXPENSE_DIALOG, get(get_new_expense_dialog))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        )
        .route(endpoints::TOGGLE_ROW, post(toggle_row))
        .route(endpoints::TOGGLE_ALL_ROWS, post(toggle_all_rows))
        .route(endpoints::PRESS_ROW_BUTTON, post(press_row_button))
        .route(
            endpoints::DELETE_SELECTED_EXPENSES,
            post(delete_selected_expenses),
        )
        .route(endpoints::SUBMIT_DIALOG, post(submit_dialog))
        .route(endpoints::CLOSE_DIALOG, post(close_dialog))
        .route(endpoints::DIALOG_FACT, get(get_dialog_fact))
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}
