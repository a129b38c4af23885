use maud::{Markup, html};

use crate::{
    alert::Alert,
    dialog::DIALOG_CONTAINER_ID,
    endpoints,
    highlight::category_totals,
    html::{BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, PAGE_CONTAINER_STYLE, base, format_currency},
    page::{EXPENSE_TABLE_ID, ExpensePage},
};

const SUMMARY_ID: &str = "expense-summary";

/// The full expenses page.
pub fn expenses_view(page: &ExpensePage) -> Markup {
    let table_target = format!("#{EXPENSE_TABLE_ID}");
    let dialog_target = format!("#{DIALOG_CONTAINER_ID}");

    let content = html! {
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-5xl space-y-4"
            {
                h1 class="text-2xl font-bold" { "Cat Expense" }

                div class="flex gap-2"
                {
                    button
                        type="button"
                        id="add-expense"
                        class=(BUTTON_PRIMARY_STYLE)
                        hx-get=(endpoints::NEW_EXPENSE_DIALOG)
                        hx-target=(dialog_target)
                        hx-swap="innerHTML"
                        hx-target-error="#alert-container"
                    {
                        "Add Expense"
                    }

                    button
                        type="button"
                        id="delete-expenses"
                        class=(BUTTON_SECONDARY_STYLE)
                        hx-post=(endpoints::DELETE_SELECTED_EXPENSES)
                        hx-target=(table_target)
                        hx-swap="outerHTML"
                        hx-target-error="#alert-container"
                    {
                        "Delete Expense"
                    }
                }

                (page.table().render())

                (summary_view(page, false))
            }

            div id=(DIALOG_CONTAINER_ID) {}
        }
    };

    base("Expenses", &content)
}

/// A line naming the categories with the largest total and that total.
///
/// With `swap_out_of_band` set, the element replaces the summary already on the page when it is
/// part of a response that targets another element.
pub fn summary_view(page: &ExpensePage, swap_out_of_band: bool) -> Markup {
    let top_categories = page.top_categories();
    let top_total = category_totals(page.expenses())
        .into_iter()
        .find(|(category, _)| top_categories.contains(category))
        .map(|(_, total)| total);

    let category_names = top_categories
        .iter()
        .map(|category| category.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    html! {
        p
            id=(SUMMARY_ID)
            class="text-sm text-gray-700 dark:text-gray-300"
            hx-swap-oob=[swap_out_of_band.then_some("true")]
        {
            @match top_total {
                Some(total) if top_categories.len() > 1 => {
                    "Most spent on " strong { (category_names) } ": " (format_currency(total)) " each"
                }
                Some(total) => {
                    "Most spent on " strong { (category_names) } ": " (format_currency(total))
                }
                None => { "No expenses yet." }
            }
        }
    }
}

/// The response to deleting expenses: the table, plus the summary and a success alert swapped in
/// out of band.
pub fn deleted_expenses_view(page: &ExpensePage, deleted: usize) -> Markup {
    let message = match deleted {
        1 => "Deleted 1 expense".to_owned(),
        count => format!("Deleted {count} expenses"),
    };
    let alert = Alert::Success {
        message,
        details: String::new(),
    };

    html! {
        (page.table().render())
        (summary_view(page, true))
        div hx-swap-oob="innerHTML:#alert-container" { (alert.into_markup()) }
    }
}
