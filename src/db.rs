//! Sets up the application's SQLite database.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{Error, storage::create_key_value_table};

/// Create the tables for the app's data if they do not exist yet.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_key_value_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
