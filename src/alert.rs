//! Alert system for displaying success and error messages to users.
//!
//! Alerts are rendered into the page's `#alert-container`, either as the
//! target of a request or via the htmx `response-targets` extension for error
//! responses.

use axum::response::{Html, IntoResponse, Response};
use maud::{Markup, html};

/// An alert message with its styling.
#[derive(Debug, Clone)]
pub enum Alert {
    /// A success message with a short description.
    Success { message: String, details: String },
    /// An error message with a hint on how to fix it.
    Error { message: String, details: String },
}

impl Alert {
    pub fn into_html(self) -> Html<String> {
        Html(self.into_markup().into_string())
    }

    pub fn into_markup(self) -> Markup {
        let (container_style, message, details) = match self {
            Alert::Success { message, details } => (
                "p-4 text-sm text-green-800 rounded-lg bg-green-50 \
                dark:bg-gray-800 dark:text-green-400 shadow",
                message,
                details,
            ),
            Alert::Error { message, details } => (
                "p-4 text-sm text-red-800 rounded-lg bg-red-50 \
                dark:bg-gray-800 dark:text-red-400 shadow",
                message,
                details,
            ),
        };

        html! {
            div
                role="alert"
                class=(container_style)
            {
                div class="flex items-start justify-between gap-4"
                {
                    div
                    {
                        p class="font-medium" { (message) }

                        @if !details.is_empty() {
                            span { (details) }
                        }
                    }

                    button
                        type="button"
                        aria-label="Dismiss"
                        class="font-bold"
                        onclick="this.closest('[role=alert]').remove()"
                    {
                        "×"
                    }
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}
