//! Column specifications for [crate::table::Table].

use std::fmt::{Debug, Display};
use std::hash::Hash;

/// A record that can be shown as a row of a table.
pub trait TableRow {
    /// The stable, unique identity of a row. Selection is tracked by this value.
    type Id: Clone + Eq + Hash + Display;

    /// Names the fields that value columns can show.
    type Field: Copy;

    fn id(&self) -> &Self::Id;

    fn value(&self, field: Self::Field) -> CellValue;
}

/// The raw value of one field of a record.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

impl Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Text(text) => f.write_str(text),
            CellValue::Number(number) => write!(f, "{number}"),
        }
    }
}

/// Turns a field value into the text shown in a cell.
pub type Formatter = fn(&CellValue) -> String;

/// The callback of a button column, called with the row whose button was pressed.
pub type RowAction<T> = Box<dyn Fn(&T) + Send>;

/// One column of a table. Columns are rendered left to right in the order they are given.
pub enum Column<T: TableRow> {
    /// Shows one field of each record.
    Value {
        label: String,
        field: T::Field,
        formatter: Option<Formatter>,
    },
    /// A checkbox per row for selecting it, and a "select all" checkbox in the header.
    Checkbox { label: String },
    /// A button per row that calls `action` with the row's record.
    Button { label: String, action: RowAction<T> },
}

impl<T: TableRow> Column<T> {
    pub fn value(label: &str, field: T::Field) -> Self {
        Column::Value {
            label: label.to_owned(),
            field,
            formatter: None,
        }
    }

    /// A value column that shows each value as `formatter` formats it.
    pub fn formatted_value(label: &str, field: T::Field, formatter: Formatter) -> Self {
        Column::Value {
            label: label.to_owned(),
            field,
            formatter: Some(formatter),
        }
    }

    pub fn checkbox(label: &str) -> Self {
        Column::Checkbox {
            label: label.to_owned(),
        }
    }

    pub fn button(label: &str, action: impl Fn(&T) + Send + 'static) -> Self {
        Column::Button {
            label: label.to_owned(),
            action: Box::new(action),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Column::Value { label, .. } => label,
            Column::Checkbox { label } => label,
            Column::Button { label, .. } => label,
        }
    }

    /// The text of the cell for `row`.
    ///
    /// Only value columns have text, the other columns render controls.
    pub fn text(&self, row: &T) -> Option<String> {
        match self {
            Column::Value {
                field, formatter, ..
            } => {
                let value = row.value(*field);

                Some(match formatter {
                    Some(format) => format(&value),
                    None => value.to_string(),
                })
            }
            Column::Checkbox { .. } | Column::Button { .. } => None,
        }
    }
}

impl<T: TableRow> Debug for Column<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Column::Value {
                label, formatter, ..
            } => f
                .debug_struct("Value")
                .field("label", label)
                .field("has_formatter", &formatter.is_some())
                .finish(),
            Column::Checkbox { label } => f.debug_struct("Checkbox").field("label", label).finish(),
            Column::Button { label, .. } => f.debug_struct("Button").field("label", label).finish(),
        }
    }
}
