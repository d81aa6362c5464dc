//! Location listing and creation.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::Value;

use hotspots_core::{LocationKind, Position, UserId, check_latitude, check_longitude};

use super::{ApiJson, nul_fields, too_long};
use crate::error::{ApiError, Result};
use crate::middleware::OptionalUser;
use crate::models::Location;
use crate::models::location::{DIRECTIONS_MAX_LEN, NAME_MAX_LEN, NewLocation};
use crate::state::AppState;

/// Location creation request body.
///
/// Fields are kept as raw JSON so a wrongly typed field is reported by name.
#[derive(Debug, Default, Deserialize)]
pub struct LocationRequest {
    pub name: Option<Value>,
    #[serde(rename = "type")]
    pub kind: Option<Value>,
    pub position: Option<Value>,
    pub directions: Option<Value>,
}

/// List all locations.
///
/// GET /api/location
///
/// # Errors
///
/// Returns 500 if the store fails.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Location>>> {
    Ok(Json(state.store().list_locations().await?))
}

/// Create a location.
///
/// POST /api/location
///
/// When the request carries a valid bearer token the caller becomes the
/// location's creator.
///
/// # Errors
///
/// Returns 400 listing every invalid field.
pub async fn create(
    State(state): State<AppState>,
    OptionalUser(creator): OptionalUser,
    ApiJson(req): ApiJson<LocationRequest>,
) -> Result<(StatusCode, Json<Location>)> {
    let new_location = validate(req, creator)
        .map_err(|errors| ApiError::validation("Invalid location", errors))?;

    let location = state.store().create_location(new_location).await?;

    tracing::info!(location_id = %location.id, name = %location.name, "location created");
    Ok((StatusCode::CREATED, Json(location)))
}

/// Check a request and build the insert form, or list what is wrong with it.
fn validate(
    req: LocationRequest,
    creator_id: Option<UserId>,
) -> std::result::Result<NewLocation, Vec<String>> {
    let mut errors = Vec::new();

    let name = match string_field("name", req.name) {
        Ok(Some(name)) if !name.trim().is_empty() => Some(name.trim().to_owned()),
        Ok(_) => {
            errors.push("name is required".to_owned());
            None
        }
        Err(e) => {
            errors.push(e);
            None
        }
    };
    errors.extend(too_long("name", name.as_deref(), NAME_MAX_LEN));

    let kind = match string_field("type", req.kind) {
        Ok(raw) => match raw.as_deref().map(str::trim) {
            None | Some("") => Some(LocationKind::default()),
            Some(raw) => raw.parse::<LocationKind>().map_or_else(
                |e| {
                    errors.push(e.to_string());
                    None
                },
                Some,
            ),
        },
        Err(e) => {
            errors.push(e);
            None
        }
    };

    let position = parse_position(req.position.as_ref()).map_or_else(
        |mut position_errors| {
            errors.append(&mut position_errors);
            None
        },
        Some,
    );

    let directions = string_field("directions", req.directions)
        .unwrap_or_else(|e| {
            errors.push(e);
            None
        })
        .filter(|d| !d.trim().is_empty());
    errors.extend(too_long("directions", directions.as_deref(), DIRECTIONS_MAX_LEN));

    errors.extend(nul_fields(&[
        ("name", name.as_deref()),
        ("directions", directions.as_deref()),
    ]));

    match (name, kind, position) {
        (Some(name), Some(kind), Some(position)) if errors.is_empty() => Ok(NewLocation {
            name,
            kind,
            position,
            directions,
            creator_id,
        }),
        _ => Err(errors),
    }
}

/// An optional string field; `null` counts as absent.
fn string_field(
    field: &str,
    value: Option<Value>,
) -> std::result::Result<Option<String>, String> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(format!("{field} must be a string")),
    }
}

/// Read `{lat, lng}` as JSON numbers within range.
fn parse_position(value: Option<&Value>) -> std::result::Result<Position, Vec<String>> {
    let object = match value {
        None | Some(Value::Null) => return Err(vec!["position is required".to_owned()]),
        Some(Value::Object(object)) => object,
        Some(_) => {
            return Err(vec![
                "position must be an object with lat and lng".to_owned(),
            ]);
        }
    };

    let lat = object
        .get("lat")
        .and_then(Value::as_f64)
        .ok_or_else(|| "position.lat must be a number".to_owned())
        .and_then(|lat| check_latitude(lat).map_err(|e| format!("position.lat: {e}")));
    let lng = object
        .get("lng")
        .and_then(Value::as_f64)
        .ok_or_else(|| "position.lng must be a number".to_owned())
        .and_then(|lng| check_longitude(lng).map_err(|e| format!("position.lng: {e}")));

    match (lat, lng) {
        (Ok(lat), Ok(lng)) => Ok(Position { lat, lng }),
        (lat, lng) => Err(lat.err().into_iter().chain(lng.err()).collect()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn request(value: Value) -> LocationRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_valid_request() {
        let location = validate(
            request(json!({
                "name": "Lake X",
                "type": "hunting",
                "position": {"lat": 40.0, "lng": -75.0},
                "directions": "North shore"
            })),
            Some(UserId::new(9)),
        )
        .unwrap();

        assert_eq!(location.name, "Lake X");
        assert_eq!(location.kind, LocationKind::Hunting);
        assert_eq!(location.position, Position { lat: 40.0, lng: -75.0 });
        assert_eq!(location.directions.as_deref(), Some("North shore"));
        assert_eq!(location.creator_id, Some(UserId::new(9)));
    }

    #[test]
    fn test_type_defaults_to_fishing() {
        let location = validate(
            request(json!({"name": "Pond", "position": {"lat": 0, "lng": 0}})),
            None,
        )
        .unwrap();
        assert_eq!(location.kind, LocationKind::Fishing);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(parse_position(Some(&json!({"lat": 90, "lng": -180}))).is_ok());
        assert!(parse_position(Some(&json!({"lat": -90, "lng": 180}))).is_ok());
    }

    #[test]
    fn test_out_of_range_position() {
        let errors = parse_position(Some(&json!({"lat": 90.5, "lng": -181}))).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].starts_with("position.lat"));
        assert!(errors[1].starts_with("position.lng"));
    }

    #[test]
    fn test_string_coordinates_rejected() {
        let errors = parse_position(Some(&json!({"lat": "40", "lng": -75}))).unwrap_err();
        assert_eq!(errors, vec!["position.lat must be a number"]);
    }

    #[test]
    fn test_every_problem_reported() {
        let errors = validate(
            request(json!({"type": "skiing", "directions": "x".repeat(256)})),
            None,
        )
        .unwrap_err();

        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&"name is required".to_owned()));
        assert!(errors.contains(&"position is required".to_owned()));
        assert!(errors.iter().any(|e| e.contains("skiing")));
        assert!(errors.iter().any(|e| e.starts_with("directions")));
    }

    #[test]
    fn test_wrongly_typed_fields_reported_by_name() {
        let errors = validate(
            request(json!({
                "name": 7,
                "type": 5,
                "position": {"lat": 1, "lng": 1},
                "directions": []
            })),
            None,
        )
        .unwrap_err();

        assert_eq!(
            errors,
            vec![
                "name must be a string",
                "type must be a string",
                "directions must be a string",
            ]
        );
    }

    #[test]
    fn test_nul_characters_rejected() {
        let errors = validate(
            request(json!({
                "name": "a\u{0}b",
                "position": {"lat": 1, "lng": 1},
                "directions": "left\u{0}"
            })),
            None,
        )
        .unwrap_err();

        assert_eq!(
            errors,
            vec![
                "name must not contain NUL characters",
                "directions must not contain NUL characters",
            ]
        );
    }

    #[test]
    fn test_name_too_long() {
        let errors = validate(
            request(json!({"name": "x".repeat(101), "position": {"lat": 1, "lng": 1}})),
            None,
        )
        .unwrap_err();
        assert_eq!(errors, vec!["name must be at most 100 characters"]);
    }
}
