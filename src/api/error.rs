/// The ways a request to the finance API can fail.
///
/// Every variant is recoverable: the dashboard renders these as notices and
/// keeps going.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The configured base URL is not an absolute HTTP(S) URL.
    #[error("invalid API base URL \"{url}\": {message}")]
    InvalidBaseUrl {
        /// The configured URL.
        url: String,
        /// Why the URL was rejected.
        message: String,
    },

    /// The HTTP client could not be created.
    #[error("could not create the HTTP client: {0}")]
    Client(String),

    /// The request did not complete, e.g. the connection was refused or
    /// timed out.
    #[error("request to {endpoint} failed: {message}")]
    Transport {
        /// The API path that was requested, e.g. "/accounts".
        endpoint: String,
        /// The underlying error message.
        message: String,
    },

    /// The API responded with a non-2xx status code.
    #[error("{endpoint} responded with status {status}")]
    Status {
        /// The API path that was requested, e.g. "/accounts".
        endpoint: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The response body was not the expected JSON.
    #[error("could not decode the response from {endpoint}: {message}")]
    Decode {
        /// The API path that was requested, e.g. "/accounts".
        endpoint: String,
        /// The underlying error message.
        message: String,
    },
}

impl FetchError {
    /// Whether the API rejected the bearer token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401 | 403, .. })
    }
}
