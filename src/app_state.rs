//! Implements a struct that holds the state of the REST server.

use crate::{
    Error,
    aggregation::DebtClassifier,
    api::{ApiClient, ApiConfig},
    timezone::get_local_offset,
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The client for the finance API.
    pub api_client: ApiClient,

    /// Decides which accounts count as debt when calculating net worth.
    pub debt_classifier: DebtClassifier,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl AppState {
    /// Create a new [AppState] that fetches records from the API in `api_config`.
    ///
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns an error if the API base URL is invalid or the timezone is unknown.
    pub fn new(
        api_config: ApiConfig,
        debt_classifier: DebtClassifier,
        local_timezone: &str,
    ) -> Result<Self, Error> {
        get_local_offset(local_timezone)?;

        let api_client = ApiClient::new(api_config)
            .inspect_err(|error| tracing::error!("could not create the API client: {error}"))?;

        Ok(Self {
            api_client,
            debt_classifier,
            local_timezone: local_timezone.to_owned(),
        })
    }
}
