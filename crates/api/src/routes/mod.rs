//! HTTP route handlers for the hotspots API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (store ping)
//!
//! # Accounts
//! POST /api/signup             - Create account, returns {token, user}
//! POST /api/login              - Log in, returns {token, user}
//! POST /api/logout             - Echoes the body (tokens are stateless)
//! GET  /api/users              - All users
//! GET  /api/user               - Current user (bearer)
//! PUT  /api/user               - Replace liked/added locations (bearer)
//!
//! # Directory
//! GET  /api/location           - All locations
//! POST /api/location           - Create location
//! GET  /api/fish-species       - All fish species
//! POST /api/fish-species       - Create fish species
//! ```

pub mod auth;
pub mod fish;
pub mod health;
pub mod locations;
pub mod users;

use axum::{
    Router,
    extract::FromRequest,
    middleware::from_fn,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::middleware::{make_span, request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// JSON body extractor whose rejections are `ApiError` validation errors.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Create the `/api` router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/users", get(users::list))
        .route("/user", get(users::show).put(users::update))
        .route("/location", get(locations::list).post(locations::create))
        .route("/fish-species", get(fish::list).post(fish::create))
}

/// Create the full application router with tracing, request ids and
/// security headers.
///
/// Sentry and CORS layers are added by the server binary on top of this.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api", api_routes())
        .layer(from_fn(security_headers_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_span))
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Names of fields that are absent or blank.
fn missing_fields(fields: &[(&str, Option<&str>)]) -> Vec<String> {
    fields
        .iter()
        .filter(|(_, value)| value.is_none_or(|v| v.trim().is_empty()))
        .map(|(name, _)| (*name).to_owned())
        .collect()
}

/// Fields holding a NUL character, which `PostgreSQL` text columns reject.
fn nul_fields(fields: &[(&str, Option<&str>)]) -> Vec<String> {
    fields
        .iter()
        .filter(|(_, value)| value.is_some_and(|v| v.contains('\0')))
        .map(|(name, _)| format!("{name} must not contain NUL characters"))
        .collect()
}

/// `"<field> must be at most <max> characters"` if `value` is too long.
fn too_long(field: &str, value: Option<&str>, max: usize) -> Option<String> {
    value
        .filter(|v| !hotspots_core::fits(v, max))
        .map(|_| format!("{field} must be at most {max} characters"))
}
