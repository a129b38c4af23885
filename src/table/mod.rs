//! A generic table that renders any collection of records as HTML.
//!
//! The table is described by a list of [Column]s. It owns which rows are
//! selected, derives the state of the "select all" checkbox, and tells its
//! owner about every change to the selection.

mod column;
mod component;
mod selection;

pub use column::{CellValue, Column, TableRow};
pub use component::{Table, TableRoutes};
pub use selection::Selection;
