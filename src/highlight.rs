//! Finds the categories the most money is spent on.

use std::collections::{BTreeMap, BTreeSet};

use crate::expense::{Category, Expense};

/// The total amount spent in each category that has at least one expense.
pub fn category_totals(expenses: &[Expense]) -> BTreeMap<Category, f64> {
    expenses
        .iter()
        .fold(BTreeMap::new(), |mut totals, expense| {
            *totals.entry(expense.category).or_insert(0.0) += expense.amount.value();
            totals
        })
}

/// The categories with the largest total amount.
///
/// Every category that ties for the largest total is included, and the set is
/// empty when there are no expenses.
pub fn top_categories(expenses: &[Expense]) -> BTreeSet<Category> {
    let totals = category_totals(expenses);

    let Some(max_total) = totals.values().copied().reduce(f64::max) else {
        return BTreeSet::new();
    };

    totals
        .into_iter()
        .filter(|(_, total)| *total == max_total)
        .map(|(category, _)| category)
        .collect()
}
