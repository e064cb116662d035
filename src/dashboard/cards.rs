//! Summary cards shown above the dashboard charts.

use maud::{Markup, html};

use crate::{
    aggregation::BudgetVsActual,
    html::{CARD_STYLE, format_currency, format_percentage},
};

const UNAVAILABLE: &str = "Unavailable";

/// The headline figures of the dashboard.
///
/// A figure is `None` when the records it is calculated from could not be
/// fetched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct SummaryFigures {
    pub net_worth: Option<f64>,
    pub budget_vs_actual: Option<BudgetVsActual>,
}

/// Renders the net worth and budget cards.
pub(super) fn summary_cards_view(figures: &SummaryFigures) -> Markup {
    let budget = figures.budget_vs_actual;
    let percent_spent = match budget {
        Some(budget) => budget
            .percent_spent()
            .map(format_percentage)
            .unwrap_or_else(|| "N/A".to_owned()),
        None => UNAVAILABLE.to_owned(),
    };

    html! {
        section id="summary" class="w-full mx-auto mb-4" {
            div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4" {
                (card("Net Worth", &currency_or_unavailable(figures.net_worth)))
                (card("Monthly Budget", &currency_or_unavailable(budget.map(|budget| budget.budget))))
                (card("Total Spent", &currency_or_unavailable(budget.map(|budget| budget.spent))))
                (card("Budget Spent", &percent_spent))
            }
        }
    }
}

fn currency_or_unavailable(amount: Option<f64>) -> String {
    amount
        .map(format_currency)
        .unwrap_or_else(|| UNAVAILABLE.to_owned())
}

fn card(title: &str, value: &str) -> Markup {
    html! {
        div class=(CARD_STYLE) aria-label=(format!("{title}: {value}")) {
            h4 class="text-sm font-semibold text-gray-600 dark:text-gray-400 mb-1" {
                (title)
            }

            div class="text-2xl font-bold" {
                (value)
            }
        }
    }
}
