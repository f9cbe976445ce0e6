//! Visitor authentication extractors.
//!
//! The storefront never validates tokens itself. It forwards the visitor's
//! bearer token to the backend, which answers `401` when it is missing or
//! stale. The token comes from the `Authorization` header or, for browser
//! requests, the `token` cookie set by the login flow.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use secrecy::SecretString;
use tower_sessions::cookie::Cookie;

use crate::api::ApiClient;
use crate::error::AppError;
use crate::state::AppState;

/// Cookie holding the visitor's backend token.
pub const TOKEN_COOKIE_NAME: &str = "token";

/// Pull the bearer token out of the request headers.
fn token_from_headers(headers: &HeaderMap) -> Option<SecretString> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from);

    bearer
        .or_else(|| {
            headers
                .get_all(header::COOKIE)
                .iter()
                .filter_map(|v| v.to_str().ok())
                .flat_map(Cookie::split_parse)
                .filter_map(Result::ok)
                .find(|c| c.name() == TOKEN_COOKIE_NAME && !c.value().is_empty())
                .map(|c| c.value().to_string())
        })
        .map(SecretString::from)
}

/// Backend client acting as the current visitor.
///
/// Anonymous visitors get a client without a token; the backend decides
/// which endpoints need one.
///
/// # Example
///
/// ```rust,ignore
/// async fn cart(VisitorApi(api): VisitorApi) -> Result<Json<CartView>> {
///     Ok(Json(api.get_cart().await?.into()))
/// }
/// ```
pub struct VisitorApi(pub ApiClient);

impl FromRequestParts<AppState> for VisitorApi {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(state.api().with_token(token_from_headers(&parts.headers))))
    }
}

/// Like [`VisitorApi`] but rejects anonymous visitors with `401` before
/// any backend call.
pub struct RequireAuth(pub ApiClient);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_headers(&parts.headers)
            .ok_or_else(|| AppError::Unauthorized("login required".to_string()))?;
        Ok(Self(state.api().with_token(Some(token))))
    }
}
