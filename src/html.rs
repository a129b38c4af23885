use maud::{DOCTYPE, Markup, html};

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

// Button styles
pub const BUTTON_PRIMARY_STYLE: &str = "px-4 py-2 bg-blue-500 \
    dark:bg-blue-600 disabled:bg-blue-700 hover:enabled:bg-blue-600 \
    hover:enabled:dark:bg-blue-700 text-white rounded";

pub const BUTTON_SECONDARY_STYLE: &str = "py-2 px-4 text-sm font-medium \
    text-gray-900 bg-white rounded border border-gray-200 hover:bg-gray-100 \
    hover:text-blue-700 focus:z-10 dark:bg-gray-800 dark:text-gray-400 \
    dark:border-gray-600 dark:hover:text-white dark:hover:bg-gray-700";

pub const BUTTON_LINK_STYLE: &str = "text-blue-600 hover:text-blue-500 \
    dark:text-blue-500 dark:hover:text-blue-400 underline bg-transparent \
    border-none cursor-pointer";

// Form styles
pub const FORM_LABEL_STYLE: &str = "block mb-2 text-sm font-medium text-gray-900 dark:text-white";
pub const FORM_TEXT_INPUT_STYLE: &str = "block w-full p-2.5 rounded text-sm \
    text-gray-900 dark:text-white disabled:text-gray-500 bg-gray-50 \
    dark:bg-gray-700 border border-gray-300 dark:border-gray-600 \
    dark:placeholder-gray-400 focus:ring-blue-600 focus:border-blue-600 \
    focus:dark:border-blue-500 focus:dark:ring-blue-500";
pub const FORM_ERROR_STYLE: &str = "mt-1 text-sm text-red-600 dark:text-red-400";
pub const CHECKBOX_STYLE: &str = "size-5 rounded border-gray-300 cursor-pointer";

// Table styles
pub const TABLE_STYLE: &str = "w-full text-sm text-left rtl:text-right \
    text-gray-500 dark:text-gray-400";

pub const TABLE_HEADER_STYLE: &str = "text-xs text-gray-700 uppercase \
    bg-gray-50 dark:bg-gray-700 dark:text-gray-400";

pub const TABLE_ROW_STYLE: &str = "bg-white border-b dark:bg-gray-800 dark:border-gray-700";

pub const HIGHLIGHTED_ROW_STYLE: &str = "bg-amber-100 text-gray-900 font-semibold border-b \
    dark:bg-amber-900/40 dark:text-white dark:border-gray-700";

pub const TABLE_CELL_STYLE: &str = "px-6 py-4 whitespace-nowrap";

// Page container
pub const PAGE_CONTAINER_STYLE: &str =
    "flex flex-col items-center px-6 py-8 mx-auto lg:py-5 text-gray-900 dark:text-white";

pub fn base(title: &str, content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Cat Expense" }

                script src="https://cdn.tailwindcss.com" {}
                script src="https://unpkg.com/htmx.org@2.0.8/dist/htmx.min.js" {}
                script src="https://unpkg.com/htmx-ext-response-targets@2.0.4/dist/response-targets.min.js" {}
            }

            body
                hx-ext="response-targets"
                class="container max-w-full min-h-screen bg-gray-50 dark:bg-gray-900"
            {
                (content)

                // Alert container for error responses and out-of-band swaps
                div
                    id="alert-container"
                    class="w-full max-w-md px-4"
                    style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
                {}
            }
        }
    }
}

pub fn error_view(title: &str, header: &str, description: &str, fix: &str) -> Markup {
    // Template adapted from https://flowbite.com/blocks/marketing/404/
    let content = html!(
        section class="bg-white dark:bg-gray-900"
        {
            div class="py-8 px-4 mx-auto max-w-screen-xl lg:py-16 lg:px-6"
            {
                div class="mx-auto max-w-screen-sm text-center"
                {
                    h1
                        class="mb-4 text-7xl tracking-tight font-extrabold
                            lg:text-9xl text-blue-600 dark:text-blue-500"
                    {
                        (header)
                    }

                    p
                        class="mb-4 text-3xl md:text-4xl tracking-tight
                            font-bold text-gray-900 dark:text-white"
                    {
                        (description)
                    }

                    p
                        class="mb-4 text-1xl md:text-2xl tracking-tight
                            text-gray-900 dark:text-white"
                    {
                        (fix)
                    }

                    a
                        href="/"
                        class="inline-flex text-white bg-blue-600
                            hover:bg-blue-800 focus:ring-4 focus:outline-hidden
                            focus:ring-blue-300 font-medium rounded text-sm px-5
                            py-2.5 text-center dark:focus:ring-blue-900 my-4"
                    {
                        "Back to Homepage"
                    }
                }
            }
        }
    );

    base(title, &content)
}

const NUMFMT_SCIENTIFIC_CUTOFF: f64 = 1e12;

pub fn format_currency(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("$")
            .ok()
            .map(|formatter| formatter.precision(Precision::Decimals(2)))
    });

    let Some(positive_fmt) = positive_fmt else {
        return format!("${number:.2}");
    };

    // numfmt truncates extra decimals, so round to cents first.
    let number = (number * 100.0).round() / 100.0;

    if number < 0.01 {
        return "$0.00".to_owned();
    }

    // numfmt switches to scientific notation from 12 integer digits.
    if number >= NUMFMT_SCIENTIFIC_CUTOFF {
        return format!("${number:.2}");
    }

    let mut formatted_string = positive_fmt.fmt_string(number);

    // numfmt omits trailing zeros, so we must add them ourselves.
    // For example, "12.30" is rendered as "12.3" so we append "0".
    match formatted_string.rfind('.') {
        Some(point) => {
            let decimals = formatted_string.len() - point - 1;
            for _ in decimals..2 {
                formatted_string.push('0');
            }
        }
        None => formatted_string.push_str(".00"),
    }

    formatted_string
}
