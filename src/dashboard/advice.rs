//! The financial advice fragment loaded by the dashboard.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error,
    api::{BearerToken, FinancialData},
    dashboard::DashboardState,
    html::CARD_STYLE,
};

const INCOMPLETE_DATA_MESSAGE: &str =
    "Ensure all data categories are populated to receive financial advice.";
const NO_ADVICE_MESSAGE: &str = "No Insights Yet.";

/// Get advice on the user's finances as an HTML fragment.
///
/// The advice is only requested when the user has at least one account,
/// budget line and transaction.
pub async fn get_advice(
    State(state): State<DashboardState>,
    token: Result<BearerToken, Error>,
) -> Response {
    let token = match token {
        Ok(token) => token,
        Err(error) => return error.into_alert_response(),
    };

    let records = state.api_client.fetch_all(&token).await;
    let (accounts, budget_lines, transactions) =
        match (records.accounts, records.budget_lines, records.transactions) {
            (Ok(accounts), Ok(budget_lines), Ok(transactions)) => {
                (accounts, budget_lines, transactions)
            }
            (Err(error), _, _) | (_, Err(error), _) | (_, _, Err(error)) => {
                return Error::Fetch(error).into_alert_response();
            }
        };

    if accounts.is_empty() || budget_lines.is_empty() || transactions.is_empty() {
        return advice_view(&[], INCOMPLETE_DATA_MESSAGE).into_response();
    }

    let data = FinancialData {
        accounts: &accounts,
        transactions: &transactions,
        expenses: &budget_lines,
    };

    match state.api_client.request_advice(&token, &data).await {
        Ok(lines) => advice_view(&lines, NO_ADVICE_MESSAGE).into_response(),
        Err(error) => Error::Fetch(error).into_alert_response(),
    }
}

/// Renders advice lines, or `empty_message` if there are none.
fn advice_view(lines: &[String], empty_message: &str) -> Markup {
    html! {
        div class=(CARD_STYLE) {
            h3 class="text-xl font-semibold mb-3" { "Financial Insights" }

            @if lines.is_empty() {
                p class="text-gray-600 dark:text-gray-400" { (empty_message) }
            } @else {
                div class="space-y-2" {
                    @for line in lines {
                        (advice_line(line))
                    }
                }
            }
        }
    }
}

/// Lines marked up with `**` are shown in bold without the markers.
fn advice_line(line: &str) -> Markup {
    if line.contains("**") {
        html!(p { strong { (line.replace("**", "")) } })
    } else {
        html!(p { (line) })
    }
}

#[cfg(test)]
mod tests {
    use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
    use scraper::Html;
    use serde_json::{Value, json};

    use crate::{
        Error,
        api::BearerToken,
        test_utils::{
            TEST_TOKEN, assert_element_exists, dashboard_state, parse_html_fragment,
            records_router, select_text, spawn_mock_api,
        },
    };

    use super::{INCOMPLETE_DATA_MESSAGE, NO_ADVICE_MESSAGE, advice_view, get_advice};

    fn router_with_expenses(expenses: Value) -> Router {
        records_router(
            json!([{"name": "Checking", "balance": 10}]),
            expenses,
            json!([{"description": "Pay", "amount": 5, "type": "credit"}]),
        )
    }

    fn token() -> Result<BearerToken, Error> {
        Ok(BearerToken::new(TEST_TOKEN).unwrap())
    }

    #[tokio::test]
    async fn asks_for_complete_data_before_requesting_advice() {
        let base_url = spawn_mock_api(router_with_expenses(json!([]))).await;

        let response = get_advice(State(dashboard_state(&base_url)), token()).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_eq!(select_text(&html, "p"), vec![INCOMPLETE_DATA_MESSAGE]);
    }

    #[tokio::test]
    async fn renders_advice_lines() {
        let router = router_with_expenses(json!([
            {"description": "Rent", "amount": 100, "category": "Needs"}
        ]))
        .route(
            "/advice",
            post(|| async {
                Json(json!({"message": {"content": "**Overview**\n\nSpend less on coffee."}}))
            }),
        );
        let base_url = spawn_mock_api(router).await;

        let response = get_advice(State(dashboard_state(&base_url)), token()).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_eq!(
            select_text(&html, "p"),
            vec!["Overview", "Spend less on coffee."]
        );
        assert_eq!(select_text(&html, "p strong"), vec!["Overview"]);
    }

    #[tokio::test]
    async fn fetch_failure_renders_alert() {
        let base_url = spawn_mock_api(Router::new()).await;

        let response = get_advice(State(dashboard_state(&base_url)), token()).await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let html = parse_html_fragment(response).await;
        assert_element_exists(&html, "div[role='alert']");
    }

    #[tokio::test]
    async fn missing_token_renders_alert() {
        let base_url = spawn_mock_api(Router::new()).await;

        let response = get_advice(
            State(dashboard_state(&base_url)),
            Err(Error::MissingBearerToken),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn empty_advice_shows_message() {
        let html = Html::parse_fragment(&advice_view(&[], NO_ADVICE_MESSAGE).into_string());

        assert_eq!(select_text(&html, "p"), vec![NO_ADVICE_MESSAGE]);
    }
}
