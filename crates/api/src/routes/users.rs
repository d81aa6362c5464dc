//! User listing, profile, and location associations.

use std::collections::BTreeMap;

use axum::{Json, extract::State};
use serde::Serialize;
use serde_json::{Map, Value};

use hotspots_core::{Email, LocationId};

use super::ApiJson;
use crate::db::RepositoryError;
use crate::error::{ApiError, Result};
use crate::middleware::RequireUser;
use crate::models::{Location, LocationAssociationUpdate, User};
use crate::state::AppState;

/// Profile returned by `GET /api/user`.
#[derive(Debug, Serialize)]
pub struct Profile {
    pub user_name: String,
    pub email: Email,
}

/// Result of `PUT /api/user`.
#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub message: String,
    /// Resulting locations per updated field.
    pub updated: BTreeMap<&'static str, Vec<Location>>,
}

/// List all users.
///
/// GET /api/users
///
/// # Errors
///
/// Returns 500 if the store fails.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    Ok(Json(state.store().list_users().await?))
}

/// The signed-in user's profile.
///
/// GET /api/user
///
/// # Errors
///
/// Returns 401 without a valid token and 404 if the user no longer exists.
pub async fn show(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
) -> Result<Json<Profile>> {
    let user = state
        .store()
        .get_user(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_owned()))?;

    Ok(Json(Profile {
        user_name: user.user_name,
        email: user.email,
    }))
}

/// Replace the signed-in user's liked and/or added locations.
///
/// PUT /api/user
///
/// Accepts `liked_locations` and `added_locations`, each an array of location
/// ids. Unknown ids are ignored. All updates commit together.
///
/// # Errors
///
/// Returns 501 for any other field, 400 if a field is not an array of ids or
/// nothing is given, 401 without a valid token, and 404 if the user no
/// longer exists.
pub async fn update(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    ApiJson(body): ApiJson<Map<String, Value>>,
) -> Result<Json<UpdateResponse>> {
    let updates = parse_updates(&body)?;

    let results = state
        .store()
        .update_location_associations(user_id, &updates)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => ApiError::NotFound("User not found".to_owned()),
            other => ApiError::Database(other),
        })?;

    let updated = updates
        .iter()
        .map(LocationAssociationUpdate::field)
        .zip(results)
        .collect();

    tracing::info!(user_id = %user_id, fields = updates.len(), "updated user locations");
    Ok(Json(UpdateResponse {
        message: "User updated".to_owned(),
        updated,
    }))
}

/// Turn a request body into tagged association updates.
fn parse_updates(body: &Map<String, Value>) -> Result<Vec<LocationAssociationUpdate>> {
    let unsupported: Vec<&str> = body
        .keys()
        .map(String::as_str)
        .filter(|key| LocationAssociationUpdate::for_field(key, Vec::new()).is_none())
        .collect();
    if !unsupported.is_empty() {
        return Err(ApiError::NotImplemented(format!(
            "Updating {} is not supported",
            unsupported.join(", ")
        )));
    }

    if body.is_empty() {
        return Err(ApiError::validation(
            "Nothing to update",
            vec![
                LocationAssociationUpdate::LIKED_FIELD.to_owned(),
                LocationAssociationUpdate::ADDED_FIELD.to_owned(),
            ],
        ));
    }

    let mut updates = Vec::with_capacity(body.len());
    let mut errors = Vec::new();
    for (field, value) in body {
        match location_ids(value) {
            Some(ids) => {
                if let Some(update) = LocationAssociationUpdate::for_field(field, ids) {
                    updates.push(update);
                }
            }
            None => errors.push(format!("{field} must be an array of location ids")),
        }
    }

    if errors.is_empty() {
        Ok(updates)
    } else {
        Err(ApiError::validation("Invalid location lists", errors))
    }
}

/// An array of integer ids, or `None` if `value` is anything else.
fn location_ids(value: &Value) -> Option<Vec<LocationId>> {
    value
        .as_array()?
        .iter()
        .map(|v| {
            v.as_i64()
                .and_then(|id| i32::try_from(id).ok())
                .map(LocationId::new)
        })
        .collect()
}
