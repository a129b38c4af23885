//! The expense record store, persisted to a single key-value slot.

use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use rusqlite::Connection;

use crate::{
    Error,
    expense::{Amount, Category, Expense, ExpenseId, ItemName},
    storage::{get_value, set_value},
};

/// The key of the slot holding the serialized expenses.
pub const EXPENSE_KEY: &str = "expense";

/// The expenses shown to a new user before anything has been saved.
pub fn seed_expenses() -> Vec<Expense> {
    [
        ("Whiskers Cat Food", Category::Food, 10.0),
        ("Self Cleaning Cat Litter Box", Category::Furniture, 500.0),
        ("Diamond Cat Collar", Category::Accessory, 1000.0),
    ]
    .into_iter()
    .map(|(name, category, amount)| {
        Expense::new(
            ItemName::new_unchecked(name),
            category,
            Amount::new_unchecked(amount),
        )
    })
    .collect()
}

/// The ordered collection of expenses.
///
/// The collection is read from the key-value slot [EXPENSE_KEY] once when loaded and the whole
/// collection is written back after every mutation. A mutation that cannot be saved is not
/// applied.
#[derive(Debug)]
pub struct ExpenseStore {
    expenses: Vec<Expense>,
    db_connection: Arc<Mutex<Connection>>,
}

impl ExpenseStore {
    /// Load the saved expenses, or the [seed_expenses] if none have been saved.
    ///
    /// The key-value table must already exist, see [crate::initialize_db].
    ///
    /// # Errors
    /// Returns an error if the database lock is poisoned, on SQL errors, or if the saved
    /// expenses are not valid JSON.
    pub fn load(db_connection: Arc<Mutex<Connection>>) -> Result<Self, Error> {
        let saved = {
            let connection = db_connection
                .lock()
                .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
                .map_err(|_| Error::DatabaseLockError)?;

            get_value(EXPENSE_KEY, &connection)?
        };

        let expenses: Vec<Expense> = match saved {
            Some(json) => serde_json::from_str(&json)
                .inspect_err(|error| tracing::error!("Could not parse saved expenses: {error}"))?,
            None => {
                tracing::info!("No saved expenses found, starting with the seed expenses");
                seed_expenses()
            }
        };

        Ok(Self {
            expenses,
            db_connection,
        })
    }

    /// The expenses in the order they were added.
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    /// Append `expense` to the collection.
    ///
    /// # Errors
    /// Returns [Error::DuplicateExpenseId] if an expense with the same ID exists, or an error if
    /// the collection could not be saved.
    pub fn add(&mut self, expense: Expense) -> Result<(), Error> {
        if self.expenses.iter().any(|existing| existing.id == expense.id) {
            return Err(Error::DuplicateExpenseId(expense.id));
        }

        let mut expenses = self.expenses.clone();
        expenses.push(expense);

        self.commit(expenses)
    }

    /// Replace the expense that has the same ID as `expense`, keeping its position.
    ///
    /// # Errors
    /// Returns [Error::UpdateMissingExpense] if there is no expense with the ID, or an error if
    /// the collection could not be saved.
    pub fn update(&mut self, expense: Expense) -> Result<(), Error> {
        let position = self
            .expenses
            .iter()
            .position(|existing| existing.id == expense.id)
            .ok_or(Error::UpdateMissingExpense)?;

        let mut expenses = self.expenses.clone();
        expenses[position] = expense;

        self.commit(expenses)
    }

    /// Remove the expense with the ID `id`.
    ///
    /// # Errors
    /// Returns [Error::DeleteMissingExpense] if there is no expense with the ID, or an error if
    /// the collection could not be saved.
    pub fn delete(&mut self, id: &ExpenseId) -> Result<(), Error> {
        if !self.expenses.iter().any(|expense| &expense.id == id) {
            return Err(Error::DeleteMissingExpense);
        }

        self.delete_many(std::slice::from_ref(id)).map(|_| ())
    }

    /// Remove every expense whose ID is in `ids`, ignoring IDs that are not in the store.
    ///
    /// Returns the number of expenses removed.
    ///
    /// # Errors
    /// Returns an error if the collection could not be saved.
    pub fn delete_many(&mut self, ids: &[ExpenseId]) -> Result<usize, Error> {
        let ids: HashSet<&ExpenseId> = ids.iter().collect();
        let expenses: Vec<Expense> = self
            .expenses
            .iter()
            .filter(|expense| !ids.contains(&expense.id))
            .cloned()
            .collect();
        let removed_count = self.expenses.len() - expenses.len();

        if removed_count > 0 {
            self.commit(expenses)?;
        }

        Ok(removed_count)
    }

    /// Save `expenses` and make them the current collection.
    fn commit(&mut self, expenses: Vec<Expense>) -> Result<(), Error> {
        let json = serde_json::to_string(&expenses)?;

        let connection = self
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        set_value(EXPENSE_KEY, &json, &connection)
            .inspect_err(|error| tracing::error!("Could not save expenses: {error}"))?;

        self.expenses = expenses;

        Ok(())
    }
}
