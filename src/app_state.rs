//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Error,
    db::initialize,
    dialog::{DialogRegistry, FactClient},
    expense::ExpenseStore,
    page::ExpensePage,
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The expense page: the record store, the table and its selection.
    pub expense_page: Arc<Mutex<ExpensePage>>,

    /// The open editor dialogs.
    pub dialogs: DialogRegistry,

    /// The client for fetching the fact shown in the editor dialog.
    pub fact_client: FactClient,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models and
    /// load the persisted expenses, falling back to the seed expenses if none have been saved.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized or the saved expenses cannot be
    /// read.
    pub fn new(db_connection: Connection, fact_client: FactClient) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let store = ExpenseStore::load(Arc::new(Mutex::new(db_connection)))?;

        Ok(Self {
            expense_page: Arc::new(Mutex::new(ExpensePage::new(store))),
            dialogs: DialogRegistry::new(|dialog_id| {
                tracing::info!("Closed expense dialog {dialog_id}");
            }),
            fact_client,
        })
    }
}
