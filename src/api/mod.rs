//! A client for the remote finance API.
//!
//! All requests carry the user's [BearerToken]. Failures are returned as
//! [FetchError]s for the caller to render, none of them are fatal.

mod client;
mod error;
mod token;

pub use client::{
    ApiClient, ApiConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT, FetchedRecords, FinancialData,
    format_advice,
};
pub use error::FetchError;
pub use token::{BearerToken, SESSION_COOKIE};
