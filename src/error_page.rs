//! Full-page error responses, e.g. the 404 and 500 pages.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// A page explaining what went wrong and how to fix it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPage<'a> {
    pub status: StatusCode,
    pub title: &'a str,
    pub description: &'a str,
    pub fix: &'a str,
}

impl<'a> ErrorPage<'a> {
    pub fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            title: "Not Found",
            description: "Something's missing.",
            fix: "Sorry, we can't find that page. You'll find lots to explore on the dashboard.",
        }
    }

    pub fn bad_request(description: &'a str, fix: &'a str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            title: "Bad Request",
            description,
            fix,
        }
    }

    pub fn unauthorized(description: &'a str, fix: &'a str) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            title: "Unauthorized",
            description,
            fix,
        }
    }

    pub fn internal_server_error(description: &'a str, fix: &'a str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            title: "Internal Server Error",
            description,
            fix,
        }
    }

    pub fn bad_gateway(description: &'a str, fix: &'a str) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            title: "Bad Gateway",
            description,
            fix,
        }
    }

    pub fn into_html(self) -> Html<String> {
        Html(
            error_view(
                self.title,
                self.status.as_str(),
                self.description,
                self.fix,
            )
            .into_string(),
        )
    }
}

impl Default for ErrorPage<'_> {
    fn default() -> Self {
        Self::internal_server_error(
            "Sorry, something went wrong.",
            "Try again later or check the server logs",
        )
    }
}

impl IntoResponse for ErrorPage<'_> {
    fn into_response(self) -> Response {
        (self.status, self.into_html()).into_response()
    }
}

pub async fn get_404_not_found() -> Response {
    ErrorPage::not_found().into_response()
}

pub async fn get_internal_server_error_page() -> Response {
    ErrorPage::default().into_response()
}
