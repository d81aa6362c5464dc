//! Signup, login and logout.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use super::{ApiJson, missing_fields, nul_fields};
use crate::error::{ApiError, Result};
use crate::models::User;
use crate::services::{AuthError, AuthService, Signup};
use crate::state::AppState;

/// Signup request body.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(alias = "user_name")]
    pub username: Option<String>,
    pub zipcode: Option<i32>,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Successful signup/login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Create an account.
///
/// POST /api/signup
///
/// # Errors
///
/// Returns 400 if a field is missing, the email is invalid, or the email is
/// already registered.
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let missing = missing_fields(&[
        ("email", req.email.as_deref()),
        ("password", req.password.as_deref()),
        ("username", req.username.as_deref()),
    ]);
    if !missing.is_empty() {
        return Err(ApiError::validation("Missing required fields", missing));
    }

    let invalid = nul_fields(&[("username", req.username.as_deref())]);
    if !invalid.is_empty() {
        return Err(ApiError::validation("Invalid signup", invalid));
    }

    let auth = AuthService::new(state.store());
    let user = auth
        .signup(Signup {
            email: req.email.as_deref().unwrap_or_default(),
            password: req.password.as_deref().unwrap_or_default(),
            user_name: req.username.as_deref().unwrap_or_default().trim(),
            zipcode: req.zipcode,
        })
        .await
        .map_err(|e| match e {
            AuthError::UserAlreadyExists => {
                ApiError::Conflict("User already exists, please login!".to_owned())
            }
            other => ApiError::Auth(other),
        })?;

    let token = issue_token(&state, &user)?;
    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

/// Log in.
///
/// POST /api/login
///
/// # Errors
///
/// Returns 400 if a field is missing, the email is unknown, or the password
/// is wrong.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let missing = missing_fields(&[
        ("email", req.email.as_deref()),
        ("password", req.password.as_deref()),
    ]);
    if !missing.is_empty() {
        return Err(ApiError::validation("Missing required fields", missing));
    }

    let auth = AuthService::new(state.store());
    let user = auth
        .login(
            req.email.as_deref().unwrap_or_default(),
            req.password.as_deref().unwrap_or_default(),
        )
        .await?;

    let token = issue_token(&state, &user)?;
    tracing::info!(user_id = %user.id, "user logged in");
    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

/// Log out.
///
/// POST /api/logout
///
/// Tokens are stateless, so there is nothing to revoke; the request body is
/// echoed back. An empty body echoes `{}`.
///
/// # Errors
///
/// Returns 400 if the body is not JSON.
pub async fn logout(body: Bytes) -> Result<(StatusCode, Json<serde_json::Value>)> {
    let echoed = if body.iter().all(u8::is_ascii_whitespace) {
        serde_json::Value::Object(serde_json::Map::new())
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::validation(format!("Invalid JSON body: {e}"), vec![]))?
    };

    Ok((StatusCode::CREATED, Json(echoed)))
}

fn issue_token(state: &AppState, user: &User) -> Result<String> {
    state.tokens().issue(user.id).map_err(|e| {
        tracing::error!(error = %e, user_id = %user.id, "failed to issue token");
        ApiError::Internal(e.to_string())
    })
}
