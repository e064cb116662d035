//! A local stand-in for the finance API.

use std::time::Duration;

use axum::{Json, Router, routing::get};
use serde_json::Value;
use tokio::net::TcpListener;

use crate::{
    aggregation::DebtClassifier,
    api::{ApiClient, ApiConfig},
    dashboard::DashboardState,
};

pub(crate) const TEST_TOKEN: &str = "test-token";

/// Serves `router` on a random local port and returns its base URL.
pub(crate) async fn spawn_mock_api(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Could not bind mock API listener");
    let address = listener
        .local_addr()
        .expect("Could not get mock API address");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Mock API stopped unexpectedly");
    });

    format!("http://{address}")
}

/// A router that serves fixed JSON for the three record collections.
pub(crate) fn records_router(accounts: Value, expenses: Value, transactions: Value) -> Router {
    Router::new()
        .route("/accounts", get(move || async move { Json(accounts) }))
        .route("/expenses", get(move || async move { Json(expenses) }))
        .route(
            "/transactions",
            get(move || async move { Json(transactions) }),
        )
}

pub(crate) fn dashboard_state(base_url: &str) -> DashboardState {
    DashboardState {
        api_client: ApiClient::new(ApiConfig {
            base_url: base_url.to_owned(),
            timeout: Duration::from_secs(5),
        })
        .expect("Could not create API client"),
        debt_classifier: DebtClassifier::default(),
        local_timezone: "Etc/UTC".to_owned(),
    }
}
