//! Bearer token extractors.
//!
//! Handlers that need a signed-in user take [`RequireUser`]; handlers where a
//! user is optional take [`OptionalUser`].

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};

use hotspots_core::UserId;

use crate::error::{ApiError, set_sentry_user};
use crate::state::AppState;

/// Extractor that requires a valid bearer token.
///
/// Rejects with `401 Unauthorized` if the `Authorization` header is missing,
/// is not a bearer token, or the token fails verification. It does not check
/// that the user still exists; handlers that load the user map a miss to 404.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireUser(user_id): RequireUser) -> String {
///     format!("Hello, user {user_id}!")
/// }
/// ```
pub struct RequireUser(pub UserId);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_owned()))?;

        let user_id = state.tokens().verify(token).map_err(|e| {
            tracing::debug!(error = %e, "rejected bearer token");
            ApiError::Unauthorized("Invalid or expired token".to_owned())
        })?;

        set_sentry_user(&user_id);
        Ok(Self(user_id))
    }
}

/// Extractor that optionally identifies the caller.
///
/// Unlike `RequireUser`, this never rejects: a missing or invalid token
/// yields `None`.
pub struct OptionalUser(pub Option<UserId>);

impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user_id = bearer_token(&parts.headers).and_then(|t| state.tokens().verify(t).ok());

        Ok(Self(user_id))
    }
}

/// The token from an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
