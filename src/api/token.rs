use std::fmt::Debug;

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    TypedHeader,
    extract::CookieJar,
    headers::{Authorization, authorization::Bearer},
};

use crate::Error;

/// The name of the cookie the identity provider stores the session token in.
pub const SESSION_COOKIE: &str = "DS";

/// A credential that is forwarded to the finance API as `Authorization: Bearer`.
///
/// The token is never logged: its [Debug] output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wrap a token, returning `None` if it is blank.
    pub fn new(token: &str) -> Option<Self> {
        let token = token.trim();

        if token.is_empty() {
            None
        } else {
            Some(Self(token.to_owned()))
        }
    }

    /// The raw token.
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

/// Reads the token from the `Authorization: Bearer` header, falling back to
/// the session cookie set by the identity provider.
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header_token =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .ok()
                .and_then(|TypedHeader(Authorization(bearer))| BearerToken::new(bearer.token()));

        if let Some(token) = header_token {
            return Ok(token);
        }

        CookieJar::from_headers(&parts.headers)
            .get(SESSION_COOKIE)
            .and_then(|cookie| BearerToken::new(cookie.value()))
            .ok_or_else(|| {
                tracing::debug!("request has neither a bearer token nor a session cookie");
                Error::MissingBearerToken
            })
    }
}
