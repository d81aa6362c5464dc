//! Locations, fish species and a user's liked/added locations over HTTP.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use hotspots_core::UserId;
use hotspots_integration_tests::TestApp;
use serde_json::{Value, json};

async fn create_location(app: &TestApp, name: &str, token: Option<&str>) -> Value {
    let (status, body) = app
        .post(
            "/api/location",
            &json!({"name": name, "type": "fishing", "position": {"lat": 45.0, "lng": -93.0}}),
            token,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

#[tokio::test]
async fn test_create_location() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/api/location",
            &json!({"name": "Lake X", "type": "fishing", "position": {"lat": 40.0, "lng": -75.0}}),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Lake X");
    assert_eq!(body["type"], "fishing");
    assert_eq!(body["position"], json!({"lat": 40.0, "lng": -75.0}));
    assert_eq!(body["creator_id"], Value::Null);

    let (status, list) = app.get("/api/location", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["id"], body["id"]);
}

#[tokio::test]
async fn test_location_position_out_of_range() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/api/location",
            &json!({"name": "Pole", "type": "fishing", "position": {"lat": 91.0, "lng": 0.0}}),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = body["errors"].as_array().unwrap();
    assert!(errors[0].as_str().unwrap().starts_with("position.lat"));

    let (_, list) = app.get("/api/location", None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_location_records_signed_in_creator() {
    let app = TestApp::new();
    let token = app.signup("guide@example.com", "pw-guide", "guide").await;

    let location = create_location(&app, "Mille Lacs", Some(&token)).await;

    let (_, users) = app.get("/api/users", None).await;
    assert_eq!(location["creator_id"], users[0]["id"]);
}

#[tokio::test]
async fn test_create_fish_species() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/api/fish-species",
            &json!({
                "name": "Muskellunge",
                "wiki_link": "https://en.wikipedia.org/wiki/Muskellunge",
                "image_link": "https://upload.wikimedia.org/musky.jpg"
            }),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Muskellunge");

    let (status, body) = app
        .post("/api/fish-species", &json!({"name": "Carp"}), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"], json!(["wiki_link", "image_link"]));

    let (_, list) = app.get("/api/fish-species", None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_liked_and_added_locations() {
    let app = TestApp::new();
    let token = app.signup("angler@example.com", "hunter22", "angler").await;
    let first = create_location(&app, "First Lake", None).await;
    let second = create_location(&app, "Second Lake", None).await;

    let (status, body) = app
        .put(
            "/api/user",
            &json!({
                "liked_locations": [first["id"], second["id"], 9999],
                "added_locations": [second["id"]]
            }),
            Some(&token),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "User updated");
    assert_eq!(body["updated"]["liked_locations"].as_array().unwrap().len(), 2);
    assert_eq!(body["updated"]["added_locations"][0]["name"], "Second Lake");

    // Replacing with an empty list clears the likes
    let (status, body) = app
        .put("/api/user", &json!({"liked_locations": []}), Some(&token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"]["liked_locations"], json!([]));
}

#[tokio::test]
async fn test_update_user_rejections() {
    let app = TestApp::new();
    let token = app.signup("angler@example.com", "hunter22", "angler").await;

    let (status, _) = app
        .put("/api/user", &json!({"liked_locations": []}), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .put("/api/user", &json!({"email": "new@example.com"}), Some(&token))
        .await;
    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);

    let (status, _) = app.put("/api/user", &json!({}), Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .put("/api/user", &json!({"liked_locations": "1,2"}), Some(&token))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_nul_characters_are_field_errors() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/api/location",
            &json!({"name": "a\u{0}b", "position": {"lat": 1.0, "lng": 1.0}}),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"], json!(["name must not contain NUL characters"]));

    let (status, body) = app
        .post(
            "/api/fish-species",
            &json!({
                "name": "a\u{0}b",
                "wiki_link": "https://en.wikipedia.org/wiki/Pike",
                "image_link": "https://example.org/pike.jpg"
            }),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"], json!(["name must not contain NUL characters"]));

    let (_, list) = app.get("/api/location", None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_wrongly_typed_location_field_is_named() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/api/location",
            &json!({"name": "Pond", "type": 5, "position": {"lat": 1.0, "lng": 1.0}}),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"], json!(["type must be a string"]));
}

#[tokio::test]
async fn test_token_for_missing_user_cannot_create_location() {
    let app = TestApp::new();
    let token = app.state.tokens().issue(UserId::new(999)).unwrap();

    let (status, body) = app
        .post(
            "/api/location",
            &json!({"name": "Ghost Lake", "position": {"lat": 1.0, "lng": 1.0}}),
            Some(&token),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
}
