//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - The route handler for displaying the dashboard
//! - HTML view functions for rendering the dashboard UI
//! - State and query types used by the handlers

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use axum_htmx::HxRequest;
use maud::{Markup, PreEscaped, html};
use serde::Deserialize;
use time::UtcOffset;

use crate::{
    AppState, Error,
    aggregation::{
        DebtClassifier, MonthKey, budget_vs_actual, category_totals, filter_to_month,
        flow_totals, group_by_month_at, monthly_net_flow_at, running_balances, sum_by_description,
        sum_by_type, total_net_worth,
    },
    api::{ApiClient, BearerToken, FetchError, FetchedRecords},
    dashboard::{
        cards::{SummaryFigures, summary_cards_view},
        chart_data::ChartData,
        charts::{DashboardChart, charts_init_script, charts_script, charts_view},
        tables::recent_transactions_view,
    },
    endpoints,
    html::{
        FORM_LABEL_STYLE, FORM_SELECT_STYLE, HeadElement, PAGE_CONTAINER_STYLE, base,
        loading_spinner,
    },
    models::{Account, BudgetLine, Timestamped, Transaction},
    timezone::get_local_offset,
};

const ACCOUNTS_CHART: &str = "accounts-chart";
const BUDGET_CHART: &str = "budget-chart";
const BUDGET_SPENT_CHART: &str = "budget-spent-chart";
const INCOME_EXPENSES_CHART: &str = "income-expenses-chart";
const TRANSACTIONS_CHART: &str = "recent-transactions-chart";
const TRANSACTION_TYPES_CHART: &str = "transactions-by-type-chart";
const NET_BALANCE_CHART: &str = "net-balance-chart";

/// The state needed for displaying the dashboard page.
///
/// Contains the API client and timezone information required by dashboard
/// handlers.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The client for fetching the user's records.
    pub api_client: ApiClient,
    /// Decides which accounts count as debt.
    pub debt_classifier: DebtClassifier,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api_client: state.api_client.clone(),
            debt_classifier: state.debt_classifier.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query string of the dashboard page.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// The month to show as "YYYY-MM". Blank or missing shows all records.
    #[serde(default)]
    pub month: Option<String>,
}

/// A collection narrowed down to the selected month, or the reason it
/// could not be fetched.
type Selected<'a, R> = Result<Vec<&'a R>, &'a FetchError>;

/// Holds all the data needed to render the dashboard.
struct DashboardData {
    selected_month: Option<MonthKey>,
    available_months: Vec<MonthKey>,
    summary: SummaryFigures,
    charts: Vec<DashboardChart>,
    recent_transactions: Markup,
}

/// Display a page with an overview of the user's finances.
///
/// HTMX requests, e.g. from the month selector, get only the page content.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    HxRequest(is_htmx): HxRequest,
    token: Result<BearerToken, Error>,
    Query(query): Query<DashboardQuery>,
) -> Response {
    match render_dashboard(&state, is_htmx, token, &query).await {
        Ok(response) => response,
        Err(error) if is_htmx => error.into_alert_response(),
        Err(error) => error.into_response(),
    }
}

async fn render_dashboard(
    state: &DashboardState,
    is_htmx: bool,
    token: Result<BearerToken, Error>,
    query: &DashboardQuery,
) -> Result<Response, Error> {
    let token = token?;
    let local_timezone = get_local_offset(&state.local_timezone)?;
    let selected_month = parse_month(query.month.as_deref())?;

    let records = state.api_client.fetch_all(&token).await;
    if let Some(error) = records.all_failed() {
        tracing::error!("could not fetch any records: {error}");
        return Err(Error::Fetch(error.clone()));
    }
    log_fetch_failures(&records);

    let data = build_dashboard_data(
        &records,
        selected_month,
        local_timezone,
        &state.debt_classifier,
    );

    if is_htmx {
        Ok(dashboard_content_partial(&data).into_response())
    } else {
        Ok(dashboard_view(&data).into_response())
    }
}

/// A blank month means "all time".
fn parse_month(month: Option<&str>) -> Result<Option<MonthKey>, Error> {
    match month.map(str::trim) {
        None | Some("") => Ok(None),
        Some(month) => Ok(Some(month.parse()?)),
    }
}

fn log_fetch_failures(records: &FetchedRecords) {
    let results = [
        ("accounts", records.accounts.as_ref().err()),
        ("budget lines", records.budget_lines.as_ref().err()),
        ("transactions", records.transactions.as_ref().err()),
    ];

    for (collection, error) in results {
        if let Some(error) = error {
            tracing::warn!("could not fetch {collection}, its charts will show an error: {error}");
        }
    }
}

/// The records of `month`, or every record if no month is selected.
fn select<R: Timestamped>(
    records: &Result<Vec<R>, FetchError>,
    month: Option<MonthKey>,
    local_timezone: UtcOffset,
) -> Selected<'_, R> {
    let records = records.as_ref()?;

    Ok(match month {
        Some(month) => filter_to_month(records, month, local_timezone),
        None => records.iter().collect(),
    })
}

/// The months that have transactions, plus the selected month.
fn available_months(
    transactions: &Result<Vec<Transaction>, FetchError>,
    selected_month: Option<MonthKey>,
    local_timezone: UtcOffset,
) -> Vec<MonthKey> {
    let mut months = match transactions {
        Ok(transactions) => {
            let groups = group_by_month_at(transactions, local_timezone);

            if !groups.dropped.is_empty() {
                tracing::warn!(
                    "{} transactions have no usable timestamp and are only shown under \"All time\"",
                    groups.dropped.len()
                );
                tracing::debug!("dropped transactions: {:?}", groups.dropped);
            }

            groups.month_keys()
        }
        Err(_) => Vec::new(),
    };

    if let Some(month) = selected_month {
        if !months.contains(&month) {
            months.push(month);
            months.sort();
        }
    }

    months
}

fn build_dashboard_data(
    records: &FetchedRecords,
    selected_month: Option<MonthKey>,
    local_timezone: UtcOffset,
    debt_classifier: &DebtClassifier,
) -> DashboardData {
    let accounts = select(&records.accounts, selected_month, local_timezone);
    let budget_lines = select(&records.budget_lines, selected_month, local_timezone);
    let transactions = select(&records.transactions, selected_month, local_timezone);

    let summary = SummaryFigures {
        net_worth: accounts
            .as_ref()
            .ok()
            .map(|accounts| total_net_worth(accounts.iter().copied(), debt_classifier)),
        budget_vs_actual: match (&budget_lines, &transactions) {
            (Ok(budget_lines), Ok(transactions)) => Some(budget_vs_actual(
                budget_lines.iter().copied(),
                transactions.iter().copied(),
            )),
            _ => None,
        },
    };

    let charts = vec![
        accounts_chart(&accounts),
        budget_chart(&budget_lines),
        budget_spent_chart(&budget_lines, &transactions),
        income_expenses_chart(&transactions),
        transactions_chart(&transactions),
        transaction_types_chart(&transactions),
        net_balance_chart(records, local_timezone, debt_classifier),
    ];

    let recent_transactions = recent_transactions_view(transactions.as_deref().ok());

    DashboardData {
        selected_month,
        available_months: available_months(&records.transactions, selected_month, local_timezone),
        summary,
        charts,
        recent_transactions,
    }
}

fn failed_chart(id: &'static str, title: &'static str, collection: &str) -> DashboardChart {
    DashboardChart::failed(id, title, format!("Could not load {collection}."))
}

fn accounts_chart(accounts: &Selected<'_, Account>) -> DashboardChart {
    const TITLE: &str = "Accounts";

    match accounts {
        Ok(accounts) => DashboardChart::doughnut(
            ACCOUNTS_CHART,
            TITLE,
            &ChartData::from_accounts(accounts.iter().copied()),
        ),
        Err(_) => failed_chart(ACCOUNTS_CHART, TITLE, "accounts"),
    }
}

fn budget_chart(budget_lines: &Selected<'_, BudgetLine>) -> DashboardChart {
    const TITLE: &str = "Monthly Budget";

    match budget_lines {
        Ok(budget_lines) => DashboardChart::doughnut(
            BUDGET_CHART,
            TITLE,
            &ChartData::from_category_totals(&category_totals(budget_lines.iter().copied())),
        ),
        Err(_) => failed_chart(BUDGET_CHART, TITLE, "budget lines"),
    }
}

fn budget_spent_chart(
    budget_lines: &Selected<'_, BudgetLine>,
    transactions: &Selected<'_, Transaction>,
) -> DashboardChart {
    const TITLE: &str = "Budget vs Spent";

    match (budget_lines, transactions) {
        (Ok(budget_lines), Ok(transactions)) => {
            let comparison =
                budget_vs_actual(budget_lines.iter().copied(), transactions.iter().copied());

            DashboardChart::doughnut(
                BUDGET_SPENT_CHART,
                TITLE,
                &ChartData::from_budget_vs_actual(&comparison),
            )
        }
        (Err(_), _) => failed_chart(BUDGET_SPENT_CHART, TITLE, "budget lines"),
        (_, Err(_)) => failed_chart(BUDGET_SPENT_CHART, TITLE, "transactions"),
    }
}

fn income_expenses_chart(transactions: &Selected<'_, Transaction>) -> DashboardChart {
    const TITLE: &str = "Income vs Expenses";

    match transactions {
        Ok(transactions) => DashboardChart::doughnut(
            INCOME_EXPENSES_CHART,
            TITLE,
            &ChartData::from_flow_totals(&flow_totals(transactions.iter().copied())),
        ),
        Err(_) => failed_chart(INCOME_EXPENSES_CHART, TITLE, "transactions"),
    }
}

fn transactions_chart(transactions: &Selected<'_, Transaction>) -> DashboardChart {
    const TITLE: &str = "Transactions by Description";

    match transactions {
        Ok(transactions) => DashboardChart::doughnut(
            TRANSACTIONS_CHART,
            TITLE,
            &ChartData::from_sums(
                "Transactions",
                &sum_by_description(transactions.iter().copied()),
            ),
        )
        .with_empty_message("No transactions yet."),
        Err(_) => failed_chart(TRANSACTIONS_CHART, TITLE, "transactions"),
    }
}

fn transaction_types_chart(transactions: &Selected<'_, Transaction>) -> DashboardChart {
    const TITLE: &str = "Transactions by Type";

    match transactions {
        Ok(transactions) => DashboardChart::doughnut(
            TRANSACTION_TYPES_CHART,
            TITLE,
            &ChartData::from_sums("Transactions", &sum_by_type(transactions.iter().copied())),
        ),
        Err(_) => failed_chart(TRANSACTION_TYPES_CHART, TITLE, "transactions"),
    }
}

/// Net balance over every month, ignoring the month selector.
fn net_balance_chart(
    records: &FetchedRecords,
    local_timezone: UtcOffset,
    debt_classifier: &DebtClassifier,
) -> DashboardChart {
    const TITLE: &str = "Net Balance";

    match (&records.accounts, &records.transactions) {
        (Ok(accounts), Ok(transactions)) => {
            let current_balance = total_net_worth(accounts, debt_classifier);
            let balances = running_balances(
                current_balance,
                &monthly_net_flow_at(transactions, local_timezone),
            );

            DashboardChart::line(
                NET_BALANCE_CHART,
                TITLE,
                &ChartData::from_running_balances(&balances),
            )
        }
        (Err(_), _) => failed_chart(NET_BALANCE_CHART, TITLE, "accounts"),
        (_, Err(_)) => failed_chart(NET_BALANCE_CHART, TITLE, "transactions"),
    }
}

/// Renders the full dashboard page.
fn dashboard_view(data: &DashboardData) -> Markup {
    let content = html!(
        div id="alert-container" class="w-full" {}

        div
            id="dashboard-content"
            class=(PAGE_CONTAINER_STYLE)
        {
            (dashboard_content(data))
        }
    );

    let scripts = [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        charts_script(&data.charts),
    ];

    base("Dashboard", &scripts, &content)
}

/// Renders the dashboard content for HTMX updates.
///
/// The chart script runs as soon as HTMX inserts it, so it is not wrapped
/// in a `DOMContentLoaded` listener.
fn dashboard_content_partial(data: &DashboardData) -> Markup {
    html!(
        (dashboard_content(data))

        script { (PreEscaped(charts_init_script(&data.charts))) }
    )
}

fn dashboard_content(data: &DashboardData) -> Markup {
    html!(
        (month_selector(data.selected_month, &data.available_months))
        (summary_cards_view(&data.summary))
        (charts_view(&data.charts))
        (data.recent_transactions)
        (advice_placeholder())
    )
}

fn month_selector(selected_month: Option<MonthKey>, months: &[MonthKey]) -> Markup {
    let endpoint = endpoints::DASHBOARD_VIEW;

    html!(
        form
            method="get"
            action=(endpoint)
            hx-get=(endpoint)
            hx-trigger="change"
            hx-target="#dashboard-content"
            hx-target-error="#alert-container"
            hx-push-url="true"
            class="w-full mb-4 flex flex-wrap items-end justify-between gap-4"
        {
            h2 class="text-2xl font-bold" { "Dashboard" }

            div
            {
                label for="month" class=(FORM_LABEL_STYLE) { "Month" }

                select id="month" name="month" class=(FORM_SELECT_STYLE)
                {
                    option value="" selected[selected_month.is_none()] { "All time" }

                    @for month in months.iter().rev() {
                        option
                            value=(month.to_string())
                            selected[selected_month == Some(*month)]
                        {
                            (month.long_label())
                        }
                    }
                }
            }

            noscript
            {
                button type="submit" class="px-4 py-2 rounded bg-blue-600 text-white"
                {
                    "Show"
                }
            }
        }
    )
}

fn advice_placeholder() -> Markup {
    html!(
        section
            id="advice"
            class="w-full mb-8"
            hx-get=(endpoints::DASHBOARD_ADVICE)
            hx-trigger="load"
            hx-target-error="#advice"
        {
            p class="text-gray-600 dark:text-gray-400"
            {
                (loading_spinner())
                "Loading financial insights..."
            }
        }
    )
}
