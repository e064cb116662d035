//! The `{labels, datasets}` shape that dashboard charts are drawn from.
//!
//! Each builder maps one aggregation result onto [ChartData] without doing
//! any arithmetic of its own.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    aggregation::{BudgetVsActual, CategoryTotals, FlowTotals, MonthKey},
    models::{Account, BudgetCategory},
};

/// The colours assigned to chart segments, in order.
pub(super) const PALETTE: [&str; 6] = [
    "#FF6384", "#36A2EB", "#FFCE56", "#4BC0C0", "#C9CB3A", "#FF9F40",
];

const INCOME_COLOUR: &str = "#36A2EB";
const EXPENSES_COLOUR: &str = "#FF6384";
const DEBT_COLOUR: &str = "#FFCE56";

/// Labelled series of values for a single chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

/// One series of a [ChartData], with a value and colour per label.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct Dataset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub data: Vec<f64>,
    pub background_color: Vec<String>,
}

impl ChartData {
    fn single(label: Option<&str>, labels: Vec<String>, data: Vec<f64>, colours: Vec<String>) -> Self {
        Self {
            labels,
            datasets: vec![Dataset {
                label: label.map(str::to_owned),
                data,
                background_color: colours,
            }],
        }
    }

    /// One segment per account, sized by its balance.
    pub fn from_accounts<'a>(accounts: impl IntoIterator<Item = &'a Account>) -> Self {
        let (labels, data): (Vec<String>, Vec<f64>) = accounts
            .into_iter()
            .map(|account| (account.name.clone(), account.balance))
            .unzip();
        let colours = palette_colours(labels.len());

        Self::single(Some("Balance"), labels, data, colours)
    }

    /// The "Needs" and "Wants" budget totals.
    pub fn from_category_totals(totals: &CategoryTotals) -> Self {
        let categories = [BudgetCategory::Needs, BudgetCategory::Wants];

        Self::single(
            Some("Monthly Budget"),
            categories.iter().map(|category| category.label().to_owned()).collect(),
            categories.iter().map(|category| totals.get(*category)).collect(),
            palette_colours(categories.len()),
        )
    }

    /// Income, expenses and debt.
    pub fn from_flow_totals(totals: &FlowTotals) -> Self {
        Self::single(
            Some("Amount"),
            vec!["Income".to_owned(), "Expenses".to_owned(), "Debt".to_owned()],
            vec![totals.credit, totals.debit, totals.debt],
            vec![
                INCOME_COLOUR.to_owned(),
                EXPENSES_COLOUR.to_owned(),
                DEBT_COLOUR.to_owned(),
            ],
        )
    }

    /// The monthly budget next to the total spent.
    pub fn from_budget_vs_actual(comparison: &BudgetVsActual) -> Self {
        Self::single(
            Some("Amount"),
            vec!["Monthly Budget".to_owned(), "Total Spent".to_owned()],
            vec![comparison.budget, comparison.spent],
            vec![INCOME_COLOUR.to_owned(), EXPENSES_COLOUR.to_owned()],
        )
    }

    /// One segment per key, e.g. per transaction description.
    pub fn from_sums(label: &str, sums: &BTreeMap<String, f64>) -> Self {
        Self::single(
            Some(label),
            sums.keys().cloned().collect(),
            sums.values().copied().collect(),
            palette_colours(sums.len()),
        )
    }

    /// One point per month, labelled like "Jan 2024".
    pub fn from_running_balances(balances: &[(MonthKey, f64)]) -> Self {
        Self::single(
            Some("Balance"),
            balances.iter().map(|(month, _)| month.short_label()).collect(),
            balances.iter().map(|(_, balance)| *balance).collect(),
            vec![INCOME_COLOUR.to_owned()],
        )
    }

    /// Whether there is nothing worth drawing: no labels or only zeros.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() || self.values().all(|value| value == 0.0)
    }

    /// Every value of every dataset.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.datasets
            .iter()
            .flat_map(|dataset| dataset.data.iter().copied())
    }
}

/// Colours for `count` segments, cycling through [PALETTE].
fn palette_colours(count: usize) -> Vec<String> {
    PALETTE
        .iter()
        .cycle()
        .take(count)
        .map(|colour| (*colour).to_owned())
        .collect()
}
