//! The table component: rows, columns, selection and rendering.

use std::{collections::HashSet, fmt::Debug};

use maud::{Markup, html};

use crate::{
    Error,
    endpoints::format_endpoint,
    html::{
        BUTTON_LINK_STYLE, CHECKBOX_STYLE, HIGHLIGHTED_ROW_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, TABLE_STYLE,
    },
    table::{Column, Selection, TableRow},
};

/// The endpoints that the table's controls send their requests to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRoutes {
    /// Toggles one row, has a `{row_id}` parameter.
    pub toggle_row: &'static str,
    /// Toggles every row.
    pub toggle_all: &'static str,
    /// Presses a row's button, has a `{column}` and a `{row_id}` parameter.
    pub press_button: &'static str,
    /// The HTML ID of the element wrapping the table.
    ///
    /// Responses to checkbox requests replace this element.
    pub table_id: &'static str,
    /// The CSS selector of the element that receives the response to a button press.
    pub button_target: &'static str,
}

/// A table of `T` records with selectable rows.
pub struct Table<T: TableRow> {
    columns: Vec<Column<T>>,
    rows: Vec<T>,
    selection: Selection<T::Id>,
    highlight: Box<dyn Fn(&T) -> bool + Send>,
    on_selection_change: Box<dyn FnMut(&[T::Id]) + Send>,
    routes: TableRoutes,
}

impl<T: TableRow> Table<T> {
    /// Create an empty table. No row is highlighted until [Table::set_highlight] is called.
    pub fn new(columns: Vec<Column<T>>, routes: TableRoutes) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            selection: Selection::new(),
            highlight: Box::new(|_| false),
            on_selection_change: Box::new(|_| {}),
            routes,
        }
    }

    /// Call `callback` with the selected IDs, in the order they were selected, every time the
    /// selection changes.
    pub fn on_selection_change(mut self, callback: impl FnMut(&[T::Id]) + Send + 'static) -> Self {
        self.on_selection_change = Box::new(callback);
        self
    }

    /// Emphasise the rows for which `predicate` returns `true`.
    pub fn set_highlight(&mut self, predicate: impl Fn(&T) -> bool + Send + 'static) {
        self.highlight = Box::new(predicate);
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    /// Replace the rows, dropping the selected IDs that are no longer present.
    pub fn set_rows(&mut self, rows: Vec<T>) {
        let present: HashSet<T::Id> = rows.iter().map(|row| row.id().clone()).collect();
        self.rows = rows;

        if self.selection.retain(|id| present.contains(id)) {
            self.notify();
        }
    }

    /// The selected IDs in the order they were selected.
    pub fn selected(&self) -> &[T::Id] {
        self.selection.ids()
    }

    pub fn is_selected(&self, id: &T::Id) -> bool {
        self.selection.contains(id)
    }

    /// Whether every row is selected. Always `false` for an empty table.
    pub fn all_selected(&self) -> bool {
        if self.rows.is_empty() || self.selection.is_empty() {
            return false;
        }

        let distinct_ids: HashSet<&T::Id> = self.rows.iter().map(|row| row.id()).collect();

        self.selection.len() == distinct_ids.len()
    }

    /// Select (`checked == true`) or deselect the row with the ID `id`.
    ///
    /// # Errors
    /// Returns [Error::RowNotFound] if no row has the ID `id`.
    pub fn toggle(&mut self, id: &T::Id, checked: bool) -> Result<(), Error> {
        if !self.rows.iter().any(|row| row.id() == id) {
            return Err(Error::RowNotFound(id.to_string()));
        }

        let changed = if checked {
            self.selection.insert(id.clone())
        } else {
            self.selection.remove(id)
        };

        if changed {
            self.notify();
        }

        Ok(())
    }

    /// Select every row, or clear the selection.
    ///
    /// Rows that are already selected keep their place, the rest follow in display order.
    pub fn toggle_all(&mut self, checked: bool) {
        let changed = if checked {
            let mut changed = false;

            for row in &self.rows {
                changed |= self.selection.insert(row.id().clone());
            }

            changed
        } else {
            self.selection.clear()
        };

        if changed {
            self.notify();
        }
    }

    /// Press the button in the column at `column_index` of the row with the ID `id`.
    ///
    /// # Errors
    /// Returns an error if the column does not exist or does not hold buttons, or if no row has
    /// the ID `id`.
    pub fn press(&self, column_index: usize, id: &T::Id) -> Result<(), Error> {
        let action = match self.columns.get(column_index) {
            Some(Column::Button { action, .. }) => action,
            Some(Column::Value { .. } | Column::Checkbox { .. }) => {
                return Err(Error::NotAButtonColumn(column_index));
            }
            None => return Err(Error::ColumnNotFound(column_index)),
        };

        let row = self
            .rows
            .iter()
            .find(|row| row.id() == id)
            .ok_or_else(|| Error::RowNotFound(id.to_string()))?;

        action(row);

        Ok(())
    }

    fn notify(&mut self) {
        (self.on_selection_change)(self.selection.ids());
    }

    pub fn render(&self) -> Markup {
        html! {
            div id=(self.routes.table_id) class="w-full overflow-x-auto rounded-md"
            {
                table class=(TABLE_STYLE)
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        (self.render_header())
                    }

                    tbody
                    {
                        @for row in &self.rows {
                            (self.render_row(row))
                        }

                        @if self.rows.is_empty() {
                            tr
                            {
                                td
                                    colspan=(self.columns.len())
                                    class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                                {
                                    "Nothing to show yet."
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    fn render_header(&self) -> Markup {
        let table_target = format!("#{}", self.routes.table_id);

        html! {
            tr
            {
                @for column in &self.columns {
                    th scope="col" class=(TABLE_CELL_STYLE)
                    {
                        @match column {
                            Column::Checkbox { label } => {
                                input
                                    type="checkbox"
                                    name="checked"
                                    aria-label=(label)
                                    class=(CHECKBOX_STYLE)
                                    checked[self.all_selected()]
                                    disabled[self.rows.is_empty()]
                                    hx-post=(self.routes.toggle_all)
                                    hx-target=(table_target)
                                    hx-swap="outerHTML"
                                    hx-target-error="#alert-container";
                            }
                            Column::Value { .. } | Column::Button { .. } => {
                                (column.label())
                            }
                        }
                    }
                }
            }
        }
    }

    fn render_row(&self, row: &T) -> Markup {
        let is_highlighted = (self.highlight)(row);
        let row_style = if is_highlighted {
            HIGHLIGHTED_ROW_STYLE
        } else {
            TABLE_ROW_STYLE
        };

        html! {
            tr
                class=(row_style)
                data-row-id=(row.id().to_string())
                data-highlighted=[is_highlighted.then_some("true")]
            {
                @for (column_index, column) in self.columns.iter().enumerate() {
                    td class=(TABLE_CELL_STYLE)
                    {
                        (self.render_cell(column_index, column, row))
                    }
                }
            }
        }
    }

    fn render_cell(&self, column_index: usize, column: &Column<T>, row: &T) -> Markup {
        let id = row.id();

        match column {
            Column::Value { .. } => html! {
                (column.text(row).unwrap_or_default())
            },
            Column::Checkbox { label } => {
                let toggle_endpoint = format_endpoint(self.routes.toggle_row, id);

                html! {
                    input
                        type="checkbox"
                        name="checked"
                        aria-label=(format!("{label} {id}"))
                        class=(CHECKBOX_STYLE)
                        checked[self.is_selected(id)]
                        hx-post=(toggle_endpoint)
                        hx-target=(format!("#{}", self.routes.table_id))
                        hx-swap="outerHTML"
                        hx-target-error="#alert-container";
                }
            }
            Column::Button { label, .. } => {
                let press_endpoint =
                    format_endpoint(&format_endpoint(self.routes.press_button, column_index), id);

                html! {
                    button
                        type="button"
                        class=(BUTTON_LINK_STYLE)
                        hx-post=(press_endpoint)
                        hx-target=(self.routes.button_target)
                        hx-target-error="#alert-container"
                    {
                        (label)
                    }
                }
            }
        }
    }
}

impl<T> Debug for Table<T>
where
    T: TableRow + Debug,
    T::Id: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("columns", &self.columns)
            .field("rows", &self.rows)
            .field("selection", &self.selection)
            .field("routes", &self.routes)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use scraper::{Html, Selector};

    use crate::{
        Error,
        table::{CellValue, Column, Table, TableRoutes, TableRow},
        test_utils::assert_valid_html,
    };

    #[derive(Debug, Clone, PartialEq)]
    struct Toy {
        id: u32,
        name: &'static str,
        price: f64,
    }

    #[derive(Debug, Clone, Copy)]
    enum ToyField {
        Name,
        Price,
    }

    impl TableRow for Toy {
        type Id = u32;
        type Field = ToyField;

        fn id(&self) -> &u32 {
            &self.id
        }

        fn value(&self, field: ToyField) -> CellValue {
            match field {
                ToyField::Name => CellValue::Text(self.name.to_owned()),
                ToyField::Price => CellValue::Number(self.price),
            }
        }
    }

    const ROUTES: TableRoutes = TableRoutes {
        toggle_row: "/rows/{row_id}/selection",
        toggle_all: "/selection",
        press_button: "/columns/{column}/rows/{row_id}",
        table_id: "toy-table",
        button_target: "#dialog",
    };

    fn toys() -> Vec<Toy> {
        vec![
            Toy {
                id: 1,
                name: "Mouse",
                price: 3.0,
            },
            Toy {
                id: 2,
                name: "Feather",
                price: 5.5,
            },
            Toy {
                id: 3,
                name: "Ball",
                price: 2.0,
            },
        ]
    }

    /// A table over [toys] and the log of every selection it reported.
    fn get_test_table() -> (Table<Toy>, Arc<Mutex<Vec<Vec<u32>>>>) {
        let reported = Arc::new(Mutex::new(Vec::new()));
        let log = reported.clone();
        let columns: Vec<Column<Toy>> = vec![
            Column::checkbox("Select"),
            Column::value("Name", ToyField::Name),
            Column::formatted_value("Price", ToyField::Price, |value| format!("{value}$")),
        ];
        let mut table = Table::new(columns, ROUTES)
            .on_selection_change(move |ids| log.lock().unwrap().push(ids.to_vec()));
        table.set_rows(toys());

        (table, reported)
    }

    #[test]
    fn toggle_then_untoggle_leaves_selection_unchanged() {
        let (mut table, _) = get_test_table();
        table.toggle(&2, true).unwrap();
        let before = table.selected().to_vec();

        table.toggle(&3, true).unwrap();
        table.toggle(&3, false).unwrap();

        assert_eq!(table.selected(), before);
    }

    #[test]
    fn reports_selection_in_insertion_order() {
        let (mut table, reported) = get_test_table();

        table.toggle(&3, true).unwrap();
        table.toggle(&1, true).unwrap();
        table.toggle(&3, false).unwrap();

        assert_eq!(*reported.lock().unwrap(), vec![vec![3], vec![3, 1], vec![1]]);
    }

    #[test]
    fn toggle_without_change_does_not_report() {
        let (mut table, reported) = get_test_table();

        table.toggle(&1, false).unwrap();
        table.toggle(&1, true).unwrap();
        table.toggle(&1, true).unwrap();

        assert_eq!(reported.lock().unwrap().len(), 1);
    }

    #[test]
    fn toggle_unknown_row_fails() {
        let (mut table, reported) = get_test_table();

        let result = table.toggle(&42, true);

        assert_eq!(result, Err(Error::RowNotFound("42".to_owned())));
        assert!(table.selected().is_empty());
        assert!(reported.lock().unwrap().is_empty());
    }

    #[test]
    fn select_all_only_when_every_row_is_selected() {
        let (mut table, _) = get_test_table();

        table.toggle(&1, true).unwrap();
        table.toggle(&2, true).unwrap();
        assert!(!table.all_selected());

        table.toggle(&3, true).unwrap();
        assert!(table.all_selected());
    }

    #[test]
    fn toggle_all_keeps_existing_order_then_display_order() {
        let (mut table, _) = get_test_table();
        table.toggle(&2, true).unwrap();

        table.toggle_all(true);

        assert_eq!(table.selected(), [2, 1, 3]);
        assert!(table.all_selected());

        table.toggle_all(false);

        assert!(table.selected().is_empty());
        assert!(!table.all_selected());
    }

    #[test]
    fn removing_a_row_after_select_all_drops_only_that_row() {
        let (mut table, reported) = get_test_table();
        table.toggle_all(true);

        let remaining = toys().into_iter().filter(|toy| toy.id != 2).collect();
        table.set_rows(remaining);

        assert_eq!(table.selected(), [1, 3]);
        assert_eq!(reported.lock().unwrap().last(), Some(&vec![1, 3]));
    }

    #[test]
    fn adding_a_row_after_select_all_clears_select_all() {
        let (mut table, _) = get_test_table();
        table.toggle_all(true);

        let mut rows = toys();
        rows.push(Toy {
            id: 4,
            name: "Laser",
            price: 9.0,
        });
        table.set_rows(rows);

        assert_eq!(table.selected(), [1, 2, 3]);
        assert!(!table.all_selected());
    }

    #[test]
    fn empty_rows_clear_selection_and_select_all() {
        let (mut table, reported) = get_test_table();
        table.toggle_all(true);

        table.set_rows(Vec::new());

        assert!(table.selected().is_empty());
        assert!(!table.all_selected());
        assert_eq!(reported.lock().unwrap().last(), Some(&vec![]));
    }

    #[test]
    fn new_instances_of_the_same_rows_keep_selection() {
        let (mut table, reported) = get_test_table();
        table.toggle(&1, true).unwrap();

        table.set_rows(toys());

        assert_eq!(table.selected(), [1]);
        assert_eq!(reported.lock().unwrap().len(), 1);
    }

    #[test]
    fn press_calls_action_with_row() {
        let pressed = Arc::new(Mutex::new(Vec::new()));
        let log = pressed.clone();
        let mut table = Table::new(
            vec![
                Column::value("Name", ToyField::Name),
                Column::button("Buy", move |toy: &Toy| log.lock().unwrap().push(toy.clone())),
            ],
            ROUTES,
        );
        table.set_rows(toys());

        table.press(1, &2).unwrap();

        assert_eq!(*pressed.lock().unwrap(), vec![toys()[1].clone()]);
        assert!(table.selected().is_empty());
    }

    #[test]
    fn press_rejects_bad_column_or_row() {
        let mut table = Table::new(
            vec![
                Column::value("Name", ToyField::Name),
                Column::button("Buy", |_: &Toy| {}),
            ],
            ROUTES,
        );
        table.set_rows(toys());

        assert_eq!(table.press(0, &1), Err(Error::NotAButtonColumn(0)));
        assert_eq!(table.press(5, &1), Err(Error::ColumnNotFound(5)));
        assert_eq!(table.press(1, &9), Err(Error::RowNotFound("9".to_owned())));
    }

    fn render_fragment(table: &Table<Toy>) -> Html {
        let html = Html::parse_fragment(&table.render().into_string());
        assert_valid_html(&html);
        html
    }

    #[test]
    fn renders_header_labels_and_select_all() {
        let (mut table, _) = get_test_table();
        table.toggle_all(true);

        let html = render_fragment(&table);

        let headers = html
            .select(&Selector::parse("th").unwrap())
            .map(|th| th.text().collect::<String>().trim().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(headers, ["", "Name", "Price"]);

        let select_all = html
            .select(&Selector::parse("th input[type=checkbox]").unwrap())
            .next()
            .expect("No select all checkbox");
        assert_eq!(select_all.value().attr("hx-post"), Some("/selection"));
        assert!(select_all.value().attr("checked").is_some());
    }

    #[test]
    fn renders_rows_in_column_order_with_formatter() {
        let (table, _) = get_test_table();

        let html = render_fragment(&table);

        let first_row = html
            .select(&Selector::parse("tbody tr").unwrap())
            .next()
            .expect("No rows");
        let cells = first_row
            .select(&Selector::parse("td").unwrap())
            .map(|td| td.text().collect::<String>().trim().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(cells, ["", "Mouse", "3$"]);
    }

    #[test]
    fn row_checkbox_reflects_selection() {
        let (mut table, _) = get_test_table();
        table.toggle(&2, true).unwrap();

        let html = render_fragment(&table);

        let checkboxes = html
            .select(&Selector::parse("td input[type=checkbox]").unwrap())
            .collect::<Vec<_>>();
        assert_eq!(checkboxes.len(), 3);
        assert!(checkboxes[0].value().attr("checked").is_none());
        assert!(checkboxes[1].value().attr("checked").is_some());
        assert_eq!(
            checkboxes[1].value().attr("hx-post"),
            Some("/rows/2/selection")
        );
    }

    #[test]
    fn renders_buttons_with_column_and_row() {
        let mut table = Table::new(
            vec![
                Column::value("Name", ToyField::Name),
                Column::button("Buy", |_: &Toy| {}),
            ],
            ROUTES,
        );
        table.set_rows(toys());

        let html = render_fragment(&table);

        let buttons = html
            .select(&Selector::parse("td button").unwrap())
            .collect::<Vec<_>>();
        assert_eq!(buttons.len(), 3);
        assert_eq!(
            buttons[2].value().attr("hx-post"),
            Some("/columns/1/rows/3")
        );
        assert_eq!(buttons[2].value().attr("hx-target"), Some("#dialog"));
        assert_eq!(buttons[2].text().collect::<String>().trim(), "Buy");
    }

    #[test]
    fn highlights_rows_matching_predicate() {
        let (mut table, _) = get_test_table();
        table.set_highlight(|toy| toy.price > 4.0);

        let html = render_fragment(&table);

        let highlighted = html
            .select(&Selector::parse("tr[data-highlighted=true]").unwrap())
            .map(|tr| tr.value().attr("data-row-id").unwrap_or_default().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(highlighted, ["2"]);
    }

    #[test]
    fn empty_table_renders_placeholder_and_disables_select_all() {
        let (mut table, _) = get_test_table();
        table.set_rows(Vec::new());

        let html = render_fragment(&table);

        let select_all = html
            .select(&Selector::parse("th input[type=checkbox]").unwrap())
            .next()
            .expect("No select all checkbox");
        assert!(select_all.value().attr("disabled").is_some());
        assert!(select_all.value().attr("checked").is_none());

        let placeholder = html
            .select(&Selector::parse("tbody td").unwrap())
            .next()
            .expect("No placeholder");
        assert_eq!(placeholder.value().attr("colspan"), Some("3"));
    }
}
