//! Alerts that are swapped into part of a page, e.g. when an HTMX request fails.

use maud::{Markup, html};

/// An error message to show the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    /// An error with a short message and details on how to fix it.
    Error {
        /// A short summary of the error.
        message: String,
        /// What went wrong and what the user can do about it.
        details: String,
    },
    /// An error with only a short message.
    ErrorSimple {
        /// A short summary of the error.
        message: String,
    },
}

impl Alert {
    /// Render the alert.
    pub fn into_html(self) -> Markup {
        let (message, details) = match self {
            Alert::Error { message, details } => (message, Some(details)),
            Alert::ErrorSimple { message } => (message, None),
        };

        html!(
            div
                role="alert"
                class="p-4 mb-4 text-sm rounded-lg border text-red-800 bg-red-50
                    border-red-300 dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
            {
                p class="font-semibold" { (message) }

                @if let Some(details) = details {
                    p class="mt-1" { (details) }
                }
            }
        )
    }
}
