//! Fixture seeding against the in-memory store, checked through the API.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use hotspots_api::db::{FishStore, LocationStore, MemoryStore};
use hotspots_api::seed::{self, SeedOptions};
use hotspots_integration_tests::{TestApp, fixture};
use serde_json::json;

#[tokio::test]
async fn test_seed_fish_fixture() {
    let app = TestApp::new();
    let items = seed::load_fixture(fixture("fish.json")).await.unwrap();

    let report = seed::seed_fish(app.store.as_ref(), &items, SeedOptions::default())
        .await
        .unwrap();

    assert_eq!(report.created, 3);
    assert_eq!(report.skipped_no_name, 1);
    assert_eq!(report.skipped_existing, 1);
    assert_eq!(report.failed, 1);

    let (status, body) = app.get("/api/fish-species", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["name"], "Northern Pike");
    assert_eq!(body[0]["image_link"], "https://upload.wikimedia.org/pike_200.jpg");
    assert_eq!(body[1]["image_link"], "https://upload.wikimedia.org/perch_150.jpg");
    assert_eq!(body[2]["image_link"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_seed_fish_is_idempotent() {
    let store = MemoryStore::new();
    let items = seed::load_fixture(fixture("fish.json")).await.unwrap();

    seed::seed_fish(&store, &items, SeedOptions::default())
        .await
        .unwrap();
    let again = seed::seed_fish(&store, &items, SeedOptions::default())
        .await
        .unwrap();

    assert_eq!(again.created, 0);
    assert_eq!(store.list_fish().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_seed_fish_truncates_long_names() {
    let store = MemoryStore::new();
    let long_name = "a".repeat(150);
    let items = vec![json!({"name": long_name, "url": "https://example.org"})];

    let report = seed::seed_fish(&store, &items, SeedOptions::default())
        .await
        .unwrap();

    assert_eq!(report.truncated, 1);
    let fish = store.list_fish().await.unwrap();
    assert_eq!(fish[0].name, "a".repeat(100));
}

#[tokio::test]
async fn test_seed_cities_fixture() {
    let app = TestApp::new();
    let items = seed::load_fixture(fixture("cities.json")).await.unwrap();

    let report = seed::seed_cities(app.store.as_ref(), &items, SeedOptions::default())
        .await
        .unwrap();

    assert_eq!(report.created, 3);
    assert_eq!(report.invalid_position, 2);
    assert_eq!(report.skipped_no_name, 1);
    assert_eq!(report.skipped_existing, 1);

    let (_, body) = app.get("/api/location", None).await;
    assert_eq!(body[1]["name"], "Los Angeles");
    assert_eq!(body[1]["type"], "hunting");
    assert_eq!(body[2]["type"], "fishing");
}

#[tokio::test]
async fn test_clear_then_reseed_cities() {
    let store = MemoryStore::new();
    let items = seed::load_fixture(fixture("cities.json")).await.unwrap();
    seed::seed_cities(&store, &items, SeedOptions::default())
        .await
        .unwrap();

    let report = seed::seed_cities(
        &store,
        &items,
        SeedOptions {
            clear: true,
            batch_size: 1,
        },
    )
    .await
    .unwrap();

    assert_eq!(report.cleared, 3);
    assert_eq!(report.created, 3);
    assert_eq!(store.list_locations().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_seeded_test_user_can_log_in() {
    let app = TestApp::new();
    seed::insert_test_users(app.store.as_ref(), 2).await.unwrap();

    let (status, body) = app
        .post(
            "/api/login",
            &json!({"email": "test_user2@test.com", "password": seed::TEST_USER_PASSWORD}),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["user_name"], "test_user2");
}
