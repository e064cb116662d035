use std::time::Duration;

use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
    api::{BearerToken, FetchError},
    models::{Account, BudgetLine, Transaction},
};

/// The finance API used when none is configured.
pub const DEFAULT_API_URL: &str = "https://api.spendsense.ca/api";
/// How long to wait for the API when no timeout is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const ACCOUNTS_ENDPOINT: &str = "/accounts";
const BUDGET_LINES_ENDPOINT: &str = "/expenses";
const TRANSACTIONS_ENDPOINT: &str = "/transactions";
const ADVICE_ENDPOINT: &str = "/advice";

/// Where the finance API lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// The URL that endpoint paths are appended to, e.g. "https://example.com/api".
    pub base_url: String,
    /// The timeout for each request.
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// The three record collections, each fetched independently.
#[derive(Debug)]
pub struct FetchedRecords {
    /// The result of `GET /accounts`.
    pub accounts: Result<Vec<Account>, FetchError>,
    /// The result of `GET /expenses`.
    pub budget_lines: Result<Vec<BudgetLine>, FetchError>,
    /// The result of `GET /transactions`.
    pub transactions: Result<Vec<Transaction>, FetchError>,
}

impl FetchedRecords {
    /// The first error if every collection failed, `None` otherwise.
    pub fn all_failed(&self) -> Option<&FetchError> {
        match (&self.accounts, &self.budget_lines, &self.transactions) {
            (Err(error), Err(_), Err(_)) => Some(error),
            _ => None,
        }
    }
}

/// The records sent to the advice endpoint.
///
/// The API expects budget lines under their API name, "expenses".
///
/// The records are sent as parsed, with the API's field names. Fields the
/// models do not hold are not sent.
#[derive(Debug, Serialize)]
pub struct FinancialData<'a> {
    /// The user's accounts.
    pub accounts: &'a [Account],
    /// The user's transactions.
    pub transactions: &'a [Transaction],
    /// The user's budget lines.
    pub expenses: &'a [BudgetLine],
}

#[derive(Debug, Deserialize)]
struct AdviceResponse {
    message: AdviceMessage,
}

#[derive(Debug, Deserialize)]
struct AdviceMessage {
    content: String,
}

/// A client for the finance API.
///
/// Cloning is cheap, clones share the same connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the API described by `config`.
    ///
    /// # Errors
    /// Returns [FetchError::InvalidBaseUrl] if the base URL is not an
    /// absolute HTTP(S) URL, or [FetchError::Client] if the HTTP client
    /// could not be set up.
    pub fn new(config: ApiConfig) -> Result<Self, FetchError> {
        let base_url = config.base_url.trim_end_matches('/').to_owned();
        let invalid_url = |message: String| FetchError::InvalidBaseUrl {
            url: config.base_url.clone(),
            message,
        };

        let url = Url::parse(&base_url).map_err(|error| invalid_url(error.to_string()))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid_url(format!(
                "unsupported scheme \"{}\", expected http or https",
                url.scheme()
            )));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|error| FetchError::Client(error.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// The base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the user's accounts.
    pub async fn fetch_accounts(&self, token: &BearerToken) -> Result<Vec<Account>, FetchError> {
        self.get_json(ACCOUNTS_ENDPOINT, token).await
    }

    /// Get the user's budget lines, which the API calls expenses.
    pub async fn fetch_budget_lines(
        &self,
        token: &BearerToken,
    ) -> Result<Vec<BudgetLine>, FetchError> {
        self.get_json(BUDGET_LINES_ENDPOINT, token).await
    }

    /// Get the user's transactions.
    pub async fn fetch_transactions(
        &self,
        token: &BearerToken,
    ) -> Result<Vec<Transaction>, FetchError> {
        self.get_json(TRANSACTIONS_ENDPOINT, token).await
    }

    /// Get all three collections concurrently.
    ///
    /// A failure in one collection does not affect the others.
    pub async fn fetch_all(&self, token: &BearerToken) -> FetchedRecords {
        let (accounts, budget_lines, transactions) = tokio::join!(
            self.fetch_accounts(token),
            self.fetch_budget_lines(token),
            self.fetch_transactions(token),
        );

        FetchedRecords {
            accounts,
            budget_lines,
            transactions,
        }
    }

    /// Ask the API for advice on the user's finances.
    ///
    /// # Returns
    /// The non-blank lines of the advice text.
    pub async fn request_advice(
        &self,
        token: &BearerToken,
        data: &FinancialData<'_>,
    ) -> Result<Vec<String>, FetchError> {
        let request = self.client.post(self.url(ADVICE_ENDPOINT)).json(data);
        let response: AdviceResponse = self.send(ADVICE_ENDPOINT, request, token).await?;

        Ok(format_advice(&response.message.content))
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        token: &BearerToken,
    ) -> Result<T, FetchError> {
        let request = self.client.get(self.url(endpoint));

        self.send(endpoint, request, token).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: RequestBuilder,
        token: &BearerToken,
    ) -> Result<T, FetchError> {
        tracing::debug!("requesting {endpoint} from {}", self.base_url);

        let response = request
            .bearer_auth(token.secret())
            .send()
            .await
            .map_err(|error| FetchError::Transport {
                endpoint: endpoint.to_owned(),
                message: error.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                endpoint: endpoint.to_owned(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|error| FetchError::Transport {
            endpoint: endpoint.to_owned(),
            message: error.to_string(),
        })?;

        serde_json::from_str(&body).map_err(|error| FetchError::Decode {
            endpoint: endpoint.to_owned(),
            message: error.to_string(),
        })
    }
}

/// Splits advice text into lines, dropping blank ones.
pub fn format_advice(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod format_advice_tests {
    use super::format_advice;

    #[test]
    fn drops_blank_lines() {
        let text = "**Summary**\n\nYou spend a lot on coffee.\n   \r\nSave more.\n";

        assert_eq!(
            format_advice(text),
            vec!["**Summary**", "You spend a lot on coffee.", "Save more."]
        );
    }

    #[test]
    fn empty_text_has_no_lines() {
        assert!(format_advice("").is_empty());
        assert!(format_advice("\n\n").is_empty());
    }
}

#[cfg(test)]
mod client_tests {
    use std::time::Duration;

    use axum::{
        Json, Router,
        http::{HeaderMap, StatusCode, header},
        response::IntoResponse,
        routing::{get, post},
    };
    use serde_json::{Value, json};
    use tokio::net::TcpListener;

    use crate::{
        api::{BearerToken, FetchError},
        models::{Account, BudgetLine, Transaction, TransactionKind},
    };

    use super::{ApiClient, ApiConfig, FinancialData};

    const TOKEN: &str = "test-token";

    async fn serve(router: Router) -> ApiClient {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        ApiClient::new(ApiConfig {
            base_url: format!("http://{address}/api/"),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    fn token() -> BearerToken {
        BearerToken::new(TOKEN).unwrap()
    }

    fn is_authorized(headers: &HeaderMap) -> bool {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            == Some("Bearer test-token")
    }

    async fn accounts(headers: HeaderMap) -> impl IntoResponse {
        if !is_authorized(&headers) {
            return StatusCode::UNAUTHORIZED.into_response();
        }

        Json(json!([
            {"_id": "a1", "name": "Checking", "balance": 100.5},
            {"_id": "a2", "name": "Visa", "balance": 20}
        ]))
        .into_response()
    }

    async fn transactions() -> Json<Value> {
        Json(json!([
            {"_id": "t1", "description": "Pay", "amount": 500, "type": "credit", "timestamp": "2024-01-01T00:00:00Z"}
        ]))
    }

    #[test]
    fn rejects_invalid_base_urls() {
        for url in ["not a url", "ftp://example.com/api", ""] {
            let result = ApiClient::new(ApiConfig {
                base_url: url.to_owned(),
                ..Default::default()
            });

            assert!(
                matches!(result, Err(FetchError::InvalidBaseUrl { .. })),
                "expected {url:?} to be rejected, got {result:?}"
            );
        }
    }

    #[test]
    fn trims_trailing_slash_from_base_url() {
        let client = ApiClient::new(ApiConfig {
            base_url: "https://example.com/api/".to_owned(),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(client.base_url(), "https://example.com/api");
    }

    #[tokio::test]
    async fn fetches_records_with_bearer_token() {
        let client = serve(Router::new().route("/api/accounts", get(accounts))).await;

        let accounts = client.fetch_accounts(&token()).await.unwrap();

        assert_eq!(
            accounts,
            vec![
                Account::build("Checking", 100.5).id("a1"),
                Account::build("Visa", 20.0).id("a2"),
            ]
        );
    }

    #[tokio::test]
    async fn non_success_status_is_a_typed_error() {
        let client = serve(Router::new().route("/api/accounts", get(accounts))).await;
        let wrong_token = BearerToken::new("wrong").unwrap();

        let result = client.fetch_accounts(&wrong_token).await;

        let error = result.unwrap_err();
        assert_eq!(
            error,
            FetchError::Status {
                endpoint: "/accounts".to_owned(),
                status: 401
            }
        );
        assert!(error.is_unauthorized());
    }

    #[tokio::test]
    async fn bad_json_is_a_decode_error() {
        let client = serve(Router::new().route(
            "/api/expenses",
            get(|| async { Json(json!({"not": "a list"})) }),
        ))
        .await;

        let result = client.fetch_budget_lines(&token()).await;

        assert!(
            matches!(&result, Err(FetchError::Decode { endpoint, .. }) if endpoint == "/expenses"),
            "got {result:?}"
        );
    }

    #[tokio::test]
    async fn fetch_all_keeps_failures_separate() {
        let client = serve(
            Router::new()
                .route("/api/accounts", get(accounts))
                .route("/api/transactions", get(transactions)),
        )
        .await;

        let records = client.fetch_all(&token()).await;

        assert_eq!(records.accounts.map(|accounts| accounts.len()), Ok(2));
        assert_eq!(
            records.budget_lines.map(|lines| lines.len()),
            Err(FetchError::Status {
                endpoint: "/expenses".to_owned(),
                status: 404
            })
        );
        let transactions = records.transactions.unwrap();
        assert_eq!(transactions[0].kind, TransactionKind::Credit);
    }

    #[tokio::test]
    async fn all_failed_only_when_every_collection_failed() {
        let client = serve(Router::new()).await;

        let records = client.fetch_all(&token()).await;

        assert!(records.all_failed().is_some());
    }

    #[tokio::test]
    async fn unreachable_api_is_a_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);
        let client = ApiClient::new(ApiConfig {
            base_url: format!("http://{address}"),
            timeout: Duration::from_secs(1),
        })
        .unwrap();

        let result = client.fetch_transactions(&token()).await;

        assert!(
            matches!(result, Err(FetchError::Transport { .. })),
            "got {result:?}"
        );
    }

    #[tokio::test]
    async fn request_advice_posts_records_and_splits_lines() {
        async fn advice(headers: HeaderMap, Json(body): Json<Value>) -> impl IntoResponse {
            if !is_authorized(&headers) {
                return StatusCode::UNAUTHORIZED.into_response();
            }

            let account_count = body["accounts"].as_array().map_or(0, Vec::len);
            let has_expenses = body["expenses"].is_array();
            Json(json!({
                "message": {
                    "content": format!("**Accounts: {account_count}**\n\nExpenses sent: {has_expenses}\n")
                }
            }))
            .into_response()
        }

        let client = serve(Router::new().route("/api/advice", post(advice))).await;
        let accounts = vec![Account::build("Checking", 1.0)];
        let data = FinancialData {
            accounts: &accounts,
            transactions: &[],
            expenses: &[],
        };

        let lines = client.request_advice(&token(), &data).await.unwrap();

        assert_eq!(lines, vec!["**Accounts: 1**", "Expenses sent: true"]);
    }

    #[tokio::test]
    async fn advice_payload_uses_api_field_names() {
        async fn advice(Json(body): Json<Value>) -> impl IntoResponse {
            let transaction = &body["transactions"][0];
            let expense = &body["expenses"][0];
            let content = format!(
                "{} {} {} {} {}",
                body["accounts"][0]["_id"],
                transaction["_id"],
                transaction["type"],
                transaction["accountId"],
                expense["category"],
            );

            Json(json!({"message": {"content": content}}))
        }

        let client = serve(Router::new().route("/api/advice", post(advice))).await;
        let accounts: Vec<Account> =
            serde_json::from_value(json!([{"_id": "a1", "name": "Checking", "balance": 1}])).unwrap();
        let transactions: Vec<Transaction> = serde_json::from_value(json!([
            {"_id": "t1", "accountId": "a1", "description": "Pay", "amount": 5, "type": "credit"}
        ]))
        .unwrap();
        let expenses: Vec<BudgetLine> = serde_json::from_value(json!([
            {"_id": "e1", "description": "Rent", "amount": 100, "category": "Needs"}
        ]))
        .unwrap();
        let data = FinancialData {
            accounts: &accounts,
            transactions: &transactions,
            expenses: &expenses,
        };

        let lines = client.request_advice(&token(), &data).await.unwrap();

        assert_eq!(lines, vec![r#""a1" "t1" "credit" "a1" "Needs""#]);
    }
}
