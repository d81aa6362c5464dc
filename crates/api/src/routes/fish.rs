//! Fish species listing and creation.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use super::{ApiJson, missing_fields, nul_fields, too_long};
use crate::error::{ApiError, Result};
use crate::models::Fish;
use crate::models::fish::{LINK_MAX_LEN, NAME_MAX_LEN, NewFish};
use crate::state::AppState;

/// Fish creation request body.
#[derive(Debug, Deserialize)]
pub struct FishRequest {
    pub name: Option<String>,
    pub wiki_link: Option<String>,
    pub image_link: Option<String>,
}

/// List all fish species.
///
/// GET /api/fish-species
///
/// # Errors
///
/// Returns 500 if the store fails.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Fish>>> {
    Ok(Json(state.store().list_fish().await?))
}

/// Create a fish species. Duplicate names are allowed here.
///
/// POST /api/fish-species
///
/// # Errors
///
/// Returns 400 if a field is missing, too long, or holds a NUL character.
pub async fn create(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<FishRequest>,
) -> Result<(StatusCode, Json<Fish>)> {
    let missing = missing_fields(&[
        ("name", req.name.as_deref()),
        ("wiki_link", req.wiki_link.as_deref()),
        ("image_link", req.image_link.as_deref()),
    ]);
    if !missing.is_empty() {
        return Err(ApiError::validation("Missing required fields", missing));
    }

    let fields = [
        ("name", req.name.as_deref()),
        ("wiki_link", req.wiki_link.as_deref()),
        ("image_link", req.image_link.as_deref()),
    ];
    let mut invalid = nul_fields(&fields);
    invalid.extend(
        [
            too_long("name", req.name.as_deref(), NAME_MAX_LEN),
            too_long("wiki_link", req.wiki_link.as_deref(), LINK_MAX_LEN),
            too_long("image_link", req.image_link.as_deref(), LINK_MAX_LEN),
        ]
        .into_iter()
        .flatten(),
    );
    if !invalid.is_empty() {
        return Err(ApiError::validation("Invalid fish species", invalid));
    }

    let fish = state
        .store()
        .create_fish(NewFish {
            name: req.name.unwrap_or_default().trim().to_owned(),
            wiki_link: req.wiki_link,
            image_link: req.image_link,
        })
        .await?;

    tracing::info!(fish_id = %fish.id, name = %fish.name, "fish species created");
    Ok((StatusCode::CREATED, Json(fish)))
}
