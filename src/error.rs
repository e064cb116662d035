//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{aggregation::InvalidMonthKey, alert::Alert, api::FetchError, error_page::ErrorPage};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request had neither an `Authorization: Bearer` header nor a
    /// session cookie.
    #[error("the request does not have a bearer token")]
    MissingBearerToken,

    /// A request to the finance API failed.
    #[error("could not fetch data from the finance API: {0}")]
    Fetch(#[from] FetchError),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The month in the query string is not in the format YYYY-MM.
    #[error(transparent)]
    InvalidMonth(#[from] InvalidMonthKey),

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => ErrorPage::not_found().into_response(),
            Error::MissingBearerToken => ErrorPage::unauthorized(
                "You are not logged in.",
                "Log in to SpendSense and try again.",
            )
            .into_response(),
            Error::Fetch(error) if error.is_unauthorized() => {
                tracing::warn!("the finance API rejected the bearer token: {error}");
                ErrorPage::unauthorized(
                    "Your session has expired.",
                    "Log in to SpendSense again to refresh your session.",
                )
                .into_response()
            }
            Error::Fetch(error) => {
                tracing::error!("could not fetch data from the finance API: {error}");
                ErrorPage::bad_gateway(
                    "Could not reach the finance API.",
                    "Try again later or check the server logs.",
                )
                .into_response()
            }
            Error::InvalidTimezoneError(timezone) => ErrorPage::internal_server_error(
                "Invalid Timezone Settings",
                &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            )
            .into_response(),
            Error::InvalidMonth(error) => ErrorPage::bad_request(
                "Invalid month.",
                &format!("{error}. Pick a month from the list on the dashboard."),
            )
            .into_response(),
        }
    }
}

impl Error {
    /// Render the error as an alert to be swapped into part of a page.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::MissingBearerToken => (
                StatusCode::UNAUTHORIZED,
                Alert::Error {
                    message: "Not logged in".to_owned(),
                    details: "Log in to SpendSense and try again.".to_owned(),
                },
            ),
            Error::Fetch(error) if error.is_unauthorized() => {
                tracing::warn!("the finance API rejected the bearer token: {error}");
                (
                    StatusCode::UNAUTHORIZED,
                    Alert::Error {
                        message: "Session expired".to_owned(),
                        details: "Log in to SpendSense again to refresh your session.".to_owned(),
                    },
                )
            }
            Error::Fetch(error) => {
                tracing::error!("could not fetch data from the finance API: {error}");
                (
                    StatusCode::BAD_GATEWAY,
                    Alert::Error {
                        message: "Could not reach the finance API".to_owned(),
                        details: "Try again later or check the server logs.".to_owned(),
                    },
                )
            }
            Error::InvalidMonth(error) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid month".to_owned(),
                    details: error.to_string(),
                },
            ),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert::ErrorSimple {
                    message: "The requested resource could not be found.".to_owned(),
                },
            ),
        };

        (status_code, alert.into_html()).into_response()
    }
}
