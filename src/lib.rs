//! Cat Expense is a small web app for keeping track of what your cat costs you.
//!
//! This library provides a REST API that directly serves HTML pages. The
//! single page lists expenses in a generic, selectable table and highlights
//! the category with the largest total spend.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod db;
mod dialog;
mod endpoints;
mod expense;
mod highlight;
mod html;
mod internal_server_error;
mod logging;
mod not_found;
mod page;
mod routing;
mod storage;
mod table;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use dialog::{DEFAULT_FACT_URL, FactClient};
pub use expense::{Amount, Category, Expense, ExpenseId, ExpenseStore, ItemName, seed_expenses};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;

use crate::{
    alert::Alert, internal_server_error::InternalServerError,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty string, or a string of only whitespace, was used as an item name.
    #[error("Item name is required")]
    EmptyItemName,

    /// The item name is longer than 30 characters.
    ///
    /// The length is counted in user-perceived characters (grapheme clusters).
    #[error("item name has {0} characters, the maximum is 30")]
    ItemNameTooLong(usize),

    /// The string does not name one of the expense categories.
    #[error("\"{0}\" is not a valid category")]
    InvalidCategory(String),

    /// Expense amounts must be finite numbers greater than zero.
    #[error("{0} is not a valid amount, amounts must be greater than zero")]
    InvalidAmount(f64),

    /// The amount is positive but rounds to less than one cent, or is more than the maximum.
    #[error("{0} is out of range, amounts must be from 0.01 to 1,000,000,000")]
    AmountOutOfRange(f64),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while serializing or deserializing JSON.
    #[error("could not (de)serialize JSON: {0}")]
    JSONSerializationError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Could not acquire the lock on the expense page state.
    #[error("could not acquire the page lock")]
    PageLockError,

    /// Could not acquire the lock on the open dialogs.
    #[error("could not acquire the dialog lock")]
    DialogLockError,

    /// Tried to add an expense whose ID is already in the store.
    #[error("an expense with the ID {0} already exists")]
    DuplicateExpenseId(ExpenseId),

    /// Tried to update an expense that does not exist
    #[error("tried to update an expense that is not in the store")]
    UpdateMissingExpense,

    /// Tried to delete an expense that does not exist
    #[error("tried to delete an expense that is not in the store")]
    DeleteMissingExpense,

    /// The user asked to delete the selected expenses without selecting any.
    #[error("no expenses are selected")]
    EmptySelection,

    /// A table operation referred to a row ID that is not displayed.
    #[error("the table has no row with the ID {0}")]
    RowNotFound(String),

    /// A table operation referred to a column index past the last column.
    #[error("the table has no column {0}")]
    ColumnNotFound(usize),

    /// A button was pressed on a column that does not hold buttons.
    #[error("column {0} is not a button column")]
    NotAButtonColumn(usize),

    /// The dialog has already been closed, or never existed.
    #[error("the dialog has been closed")]
    DialogClosed,

    /// The decorative fact could not be fetched.
    ///
    /// This error is never shown to the user, a fallback text is shown instead.
    #[error("could not fetch fact: {0}")]
    FactFetchError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::JSONSerializationError(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound | Error::DialogClosed => get_404_not_found_response(),
            Error::DatabaseLockError | Error::PageLockError | Error::DialogLockError => {
                InternalServerError::default().into_response()
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::EmptySelection => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "No expenses selected".to_owned(),
                    details: "Please select at least one expense to delete.".to_owned(),
                },
            ),
            Error::UpdateMissingExpense => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update expense".to_owned(),
                    details: "The expense could not be found. \
                    Try refreshing the page to see if it has been deleted."
                        .to_owned(),
                },
            ),
            Error::DeleteMissingExpense => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete expense".to_owned(),
                    details: "The expense could not be found. \
                    Try refreshing the page to see if it has already been deleted."
                        .to_owned(),
                },
            ),
            Error::RowNotFound(_) => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Expense not found".to_owned(),
                    details: "Try refreshing the page to see the latest expenses.".to_owned(),
                },
            ),
            Error::ColumnNotFound(_) | Error::NotAButtonColumn(_) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Unknown table action".to_owned(),
                    details: "Try refreshing the page.".to_owned(),
                },
            ),
            Error::DialogClosed => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "The form has been closed".to_owned(),
                    details: "Open the form again and resubmit your changes.".to_owned(),
                },
            ),
            error => {
                tracing::error!("An unexpected error occurred: {error}");

                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Something went wrong".to_owned(),
                        details: "An unexpected error occurred, check the server logs for more details."
                            .to_owned(),
                    },
                )
            }
        };

        (status_code, alert.into_html()).into_response()
    }
}
