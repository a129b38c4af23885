//! The state behind the expenses page: the stored expenses and the table that shows them.

use std::{
    collections::BTreeSet,
    sync::{Arc, Mutex, MutexGuard},
};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::{
    Error, endpoints,
    expense::{Category, Expense, ExpenseField, ExpenseId, ExpenseStore},
    highlight::top_categories,
    html::format_currency,
    table::{CellValue, Column, Table, TableRoutes},
};

/// The HTML ID of the expense table.
pub const EXPENSE_TABLE_ID: &str = "expense-table";

const EXPENSE_TABLE_ROUTES: TableRoutes = TableRoutes {
    toggle_row: endpoints::TOGGLE_ROW,
    toggle_all: endpoints::TOGGLE_ALL_ROWS,
    press_button: endpoints::PRESS_ROW_BUTTON,
    table_id: EXPENSE_TABLE_ID,
    button_target: "#dialog-container",
};

/// What the table reports back to the page through its callbacks.
#[derive(Debug)]
enum PageEvent {
    SelectionChanged(Vec<ExpenseId>),
    Edit(ExpenseId),
}

fn format_amount(value: &CellValue) -> String {
    match value {
        CellValue::Number(amount) => format_currency(*amount),
        CellValue::Text(text) => text.clone(),
    }
}

fn expense_columns(events: UnboundedSender<PageEvent>) -> Vec<Column<Expense>> {
    vec![
        Column::checkbox("Select"),
        Column::value("Item", ExpenseField::ItemName),
        Column::value("Category", ExpenseField::Category),
        Column::formatted_value("Amount", ExpenseField::Amount, format_amount),
        Column::button("Edit", move |expense: &Expense| {
            // The page owns the receiver for as long as the table exists.
            let _ = events.send(PageEvent::Edit(expense.id.clone()));
        }),
    ]
}

/// The expenses page.
///
/// Every change to the stored expenses is pushed to the table, along with the
/// categories to highlight.
#[derive(Debug)]
pub struct ExpensePage {
    store: ExpenseStore,
    table: Table<Expense>,
    events: UnboundedReceiver<PageEvent>,
    selected: Vec<ExpenseId>,
}

impl ExpensePage {
    pub fn new(store: ExpenseStore) -> Self {
        let (sender, events) = mpsc::unbounded_channel();
        let selection_events = sender.clone();

        let table = Table::new(expense_columns(sender), EXPENSE_TABLE_ROUTES).on_selection_change(
            move |ids: &[ExpenseId]| {
                let _ = selection_events.send(PageEvent::SelectionChanged(ids.to_vec()));
            },
        );

        let mut page = Self {
            store,
            table,
            events,
            selected: Vec::new(),
        };
        page.sync();

        page
    }

    pub fn expenses(&self) -> &[Expense] {
        self.store.expenses()
    }

    pub fn table(&self) -> &Table<Expense> {
        &self.table
    }

    /// The selected expenses as last reported by the table.
    pub fn selected(&self) -> &[ExpenseId] {
        &self.selected
    }

    pub fn top_categories(&self) -> BTreeSet<Category> {
        top_categories(self.store.expenses())
    }

    pub fn toggle_row(&mut self, id: &ExpenseId, checked: bool) -> Result<(), Error> {
        self.table.toggle(id, checked)?;
        self.drain_events();

        Ok(())
    }

    pub fn toggle_all(&mut self, checked: bool) {
        self.table.toggle_all(checked);
        self.drain_events();
    }

    /// Press a row's button. Returns the expense to edit if the button was an edit button.
    pub fn press_button(
        &mut self,
        column_index: usize,
        id: &ExpenseId,
    ) -> Result<Option<Expense>, Error> {
        self.table.press(column_index, id)?;

        let to_edit = self.drain_events().and_then(|edit_id| {
            self.table
                .rows()
                .iter()
                .find(|expense| expense.id == edit_id)
                .cloned()
        });

        Ok(to_edit)
    }

    /// Delete every selected expense. Returns the number of expenses deleted.
    ///
    /// # Errors
    /// Returns [Error::EmptySelection] if nothing is selected, or an error if the expenses could
    /// not be saved, in which case nothing is deleted.
    pub fn delete_selected(&mut self) -> Result<usize, Error> {
        if self.selected.is_empty() {
            return Err(Error::EmptySelection);
        }

        let deleted = self.store.delete_many(&self.selected)?;
        self.sync();

        Ok(deleted)
    }

    pub fn add(&mut self, expense: Expense) -> Result<(), Error> {
        self.store.add(expense)?;
        self.sync();

        Ok(())
    }

    pub fn update(&mut self, expense: Expense) -> Result<(), Error> {
        self.store.update(expense)?;
        self.sync();

        Ok(())
    }

    fn sync(&mut self) {
        let highlighted = top_categories(self.store.expenses());
        self.table
            .set_highlight(move |expense: &Expense| highlighted.contains(&expense.category));
        self.table.set_rows(self.store.expenses().to_vec());
        self.drain_events();
    }

    /// Apply the events sent by the table. Returns the ID of the last expense to edit, if any.
    fn drain_events(&mut self) -> Option<ExpenseId> {
        let mut to_edit = None;

        while let Ok(event) = self.events.try_recv() {
            match event {
                PageEvent::SelectionChanged(ids) => self.selected = ids,
                PageEvent::Edit(id) => to_edit = Some(id),
            }
        }

        to_edit
    }
}

/// Lock the page, logging a poisoned lock.
pub fn lock_page(page: &Arc<Mutex<ExpensePage>>) -> Result<MutexGuard<'_, ExpensePage>, Error> {
    page.lock().map_err(|error| {
        tracing::error!("could not acquire page lock: {error}");
        Error::PageLockError
    })
}
