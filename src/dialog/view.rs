use maud::{Markup, html};

use crate::{
    dialog::DialogId,
    endpoints::{self, format_endpoint},
    expense::{Category, ExpenseForm, FieldErrors},
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_ERROR_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE,
    },
};

/// The ID of the element that holds the open dialog, if any.
pub const DIALOG_CONTAINER_ID: &str = "dialog-container";

const FACT_PLACEHOLDER: &str = "loading...";

/// The editor dialog: the expense form on one side and a fact on the other.
///
/// Submitting the form, pressing the close button, pressing Escape, or clicking the backdrop
/// send a request that replaces the `#dialog` element.
pub fn dialog_view(
    dialog_id: DialogId,
    title: &str,
    form: &ExpenseForm,
    errors: &FieldErrors,
) -> Markup {
    let submit_endpoint = format_endpoint(endpoints::SUBMIT_DIALOG, dialog_id);
    let close_endpoint = format_endpoint(endpoints::CLOSE_DIALOG, dialog_id);
    let fact_endpoint = format_endpoint(endpoints::DIALOG_FACT, dialog_id);

    html! {
        div id="dialog" data-dialog-id=(dialog_id.to_string())
        {
            div
                id="dialog-backdrop"
                class="fixed inset-0 z-50 flex items-center justify-center bg-black/50 p-4"
                hx-post=(close_endpoint)
                hx-trigger="click target:#dialog-backdrop, keyup[key=='Escape'] from:body"
                hx-target="#dialog"
                hx-swap="outerHTML"
            {
                div
                    role="dialog"
                    aria-modal="true"
                    aria-labelledby="dialog-title"
                    class="w-full max-w-3xl rounded-lg bg-white dark:bg-gray-800 shadow-xl"
                {
                    div class="flex items-center justify-between border-b px-6 py-4 dark:border-gray-700"
                    {
                        h2 id="dialog-title" class="text-xl font-semibold text-gray-900 dark:text-white"
                        {
                            (title)
                        }

                        button
                            type="button"
                            aria-label="Close"
                            class=(BUTTON_SECONDARY_STYLE)
                            hx-post=(close_endpoint)
                            hx-target="#dialog"
                            hx-swap="outerHTML"
                        {
                            "✕"
                        }
                    }

                    div class="grid gap-6 p-6 md:grid-cols-2"
                    {
                        (expense_form(&submit_endpoint, form, errors))

                        aside class="rounded bg-gray-50 p-4 dark:bg-gray-700"
                        {
                            h3 class="mb-2 font-semibold text-gray-900 dark:text-white"
                            {
                                "Random cat fact"
                            }

                            p
                                id="fact"
                                class="text-gray-700 dark:text-gray-200"
                                hx-get=(fact_endpoint)
                                hx-trigger="load"
                                hx-target="this"
                                hx-swap="outerHTML"
                            {
                                (FACT_PLACEHOLDER)
                            }
                        }
                    }
                }
            }
        }
    }
}

fn expense_form(submit_endpoint: &str, form: &ExpenseForm, errors: &FieldErrors) -> Markup {
    html! {
        form
            hx-post=(submit_endpoint)
            hx-target="#dialog"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="space-y-4"
            novalidate
        {
            div
            {
                label for="item-name" class=(FORM_LABEL_STYLE) { "Item" }

                input
                    id="item-name"
                    name="item_name"
                    type="text"
                    value=(form.item_name)
                    placeholder="Whiskers Cat Food"
                    required
                    autofocus
                    aria-invalid=[errors.item_name.map(|_| "true")]
                    class=(FORM_TEXT_INPUT_STYLE);

                (field_error("item-name-error", errors.item_name))
            }

            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }

                select
                    id="category"
                    name="category"
                    required
                    aria-invalid=[errors.category.map(|_| "true")]
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" selected[form.category.is_empty()] { "Select category" }

                    @for category in Category::ALL {
                        option
                            value=(category.as_str())
                            selected[form.category == category.as_str()]
                        {
                            (category.as_str())
                        }
                    }
                }

                (field_error("category-error", errors.category))
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                input
                    id="amount"
                    name="amount"
                    type="number"
                    step="any"
                    value=(form.amount)
                    placeholder="0.00"
                    required
                    aria-invalid=[errors.amount.map(|_| "true")]
                    class=(FORM_TEXT_INPUT_STYLE);

                (field_error("amount-error", errors.amount))
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Submit" }
        }
    }
}

fn field_error(id: &str, message: Option<&str>) -> Markup {
    html! {
        @if let Some(message) = message {
            p id=(id) class=(FORM_ERROR_STYLE) { (message) }
        }
    }
}

/// The fact, replacing the placeholder once it has been fetched.
pub fn fact_view(fact: &str) -> Markup {
    html! {
        p id="fact" class="text-gray-700 dark:text-gray-200" { (fact) }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{ElementRef, Html, Selector};

    use crate::{
        dialog::DialogId,
        expense::{ExpenseForm, FieldErrors},
        test_utils::{
            assert_form_input_with_value, assert_form_submit_button_with_text, assert_hx_endpoint,
            assert_valid_html, must_get_form,
        },
    };

    use super::dialog_view;

    fn dialog_id() -> DialogId {
        serde_json::from_str("\"67e55044-10b1-426f-9247-bb680e5fe0c8\"").unwrap()
    }

    fn render(form: &ExpenseForm, errors: &FieldErrors) -> Html {
        let markup = dialog_view(dialog_id(), "Add Expense", form, errors);

        Html::parse_fragment(&markup.into_string())
    }

    fn text_of(element: ElementRef<'_>) -> String {
        element.text().collect::<String>().trim().to_owned()
    }

    /// The value of `attribute` that htmx uses for `element`: its own, or else the closest
    /// ancestor's.
    fn inherited_attr<'a>(element: ElementRef<'a>, attribute: &str) -> Option<&'a str> {
        std::iter::once(element)
            .chain(element.ancestors().filter_map(ElementRef::wrap))
            .find_map(|element| element.value().attr(attribute))
    }

    #[test]
    fn empty_form_has_placeholders() {
        let html = render(&ExpenseForm::default(), &FieldErrors::default());
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_form_input_with_value(&form, "item_name", "text", "");
        assert_form_input_with_value(&form, "amount", "number", "");
        assert_form_submit_button_with_text(&form, "Submit");

        let selected = html
            .select(&Selector::parse("select[name=category] option[selected]").unwrap())
            .map(text_of)
            .collect::<Vec<_>>();
        assert_eq!(selected, vec!["Select category"]);

        let fact = html
            .select(&Selector::parse("#fact").unwrap())
            .next()
            .expect("No fact element");
        assert_eq!(text_of(fact), "loading...");
        assert_eq!(
            fact.value().attr("hx-get"),
            Some("/api/dialogs/67e55044-10b1-426f-9247-bb680e5fe0c8/fact")
        );
    }

    #[test]
    fn form_posts_to_dialog_endpoint() {
        let html = render(&ExpenseForm::default(), &FieldErrors::default());

        let form = must_get_form(&html);

        assert_hx_endpoint(
            &form,
            "/api/dialogs/67e55044-10b1-426f-9247-bb680e5fe0c8",
            "hx-post",
        );
    }

    #[test]
    fn prefilled_form_selects_category() {
        let form = ExpenseForm {
            item_name: "Diamond Cat Collar".to_owned(),
            category: "Accessory".to_owned(),
            amount: "1000".to_owned(),
        };

        let html = render(&form, &FieldErrors::default());
        assert_valid_html(&html);

        let form_element = must_get_form(&html);
        assert_form_input_with_value(&form_element, "item_name", "text", "Diamond Cat Collar");
        assert_form_input_with_value(&form_element, "amount", "number", "1000");

        let selected = html
            .select(&Selector::parse("select[name=category] option[selected]").unwrap())
            .map(|option| option.value().attr("value").unwrap_or_default().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(selected, vec!["Accessory"]);
    }

    #[test]
    fn shows_field_errors_inline() {
        let errors = FieldErrors {
            item_name: Some("Item name is required"),
            category: None,
            amount: Some("Amount must be positive"),
        };

        let html = render(&ExpenseForm::default(), &errors);
        assert_valid_html(&html);

        let item_name_error = html
            .select(&Selector::parse("#item-name-error").unwrap())
            .next()
            .expect("No item name error");
        assert_eq!(text_of(item_name_error), "Item name is required");

        let amount_error = html
            .select(&Selector::parse("#amount-error").unwrap())
            .next()
            .expect("No amount error");
        assert_eq!(text_of(amount_error), "Amount must be positive");

        assert!(
            html.select(&Selector::parse("#category-error").unwrap())
                .next()
                .is_none()
        );
    }

    #[test]
    fn close_controls_post_to_close_endpoint() {
        let html = render(&ExpenseForm::default(), &FieldErrors::default());
        let close_endpoint = "/api/dialogs/67e55044-10b1-426f-9247-bb680e5fe0c8/close";

        let backdrop = html
            .select(&Selector::parse("#dialog-backdrop").unwrap())
            .next()
            .expect("No backdrop");
        assert_eq!(backdrop.value().attr("hx-post"), Some(close_endpoint));

        let close_button = html
            .select(&Selector::parse("button[aria-label=Close]").unwrap())
            .next()
            .expect("No close button");
        assert_eq!(close_button.value().attr("hx-post"), Some(close_endpoint));
    }

    #[test]
    fn fact_replaces_only_itself() {
        let html = render(&ExpenseForm::default(), &FieldErrors::default());

        let fact = html
            .select(&Selector::parse("#fact").unwrap())
            .next()
            .expect("No fact element");

        assert_eq!(inherited_attr(fact, "hx-target"), Some("this"));
        assert_eq!(inherited_attr(fact, "hx-swap"), Some("outerHTML"));
    }

    #[test]
    fn only_dialog_controls_replace_the_dialog() {
        let html = render(&ExpenseForm::default(), &FieldErrors::default());

        let requesters = html
            .select(&Selector::parse("[hx-get], [hx-post]").unwrap())
            .filter(|element| inherited_attr(*element, "hx-target") == Some("#dialog"))
            .map(|element| element.value().attr("id").unwrap_or(element.value().name()))
            .collect::<Vec<_>>();

        assert_eq!(requesters, vec!["dialog-backdrop", "button", "form"]);
    }
}
