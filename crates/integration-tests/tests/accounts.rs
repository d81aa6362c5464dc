//! Signup, login, profile and logout over HTTP.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use hotspots_core::UserId;
use hotspots_integration_tests::TestApp;
use serde_json::json;

#[tokio::test]
async fn test_signup_returns_token_and_user() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/api/signup",
            &json!({"email": "angler@example.com", "password": "hunter22", "username": "angler"}),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(body["user"]["email"], "angler@example.com");
    assert_eq!(body["user"]["user_name"], "angler");
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let app = TestApp::new();
    app.signup("angler@example.com", "hunter22", "angler").await;

    let (status, body) = app
        .post(
            "/api/signup",
            &json!({"email": "angler@example.com", "password": "other", "username": "again"}),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User already exists, please login!");
}

#[tokio::test]
async fn test_signup_missing_fields() {
    let app = TestApp::new();

    let (status, body) = app
        .post("/api/signup", &json!({"email": "a@b.com"}), None)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"], json!(["password", "username"]));
}

#[tokio::test]
async fn test_login_outcomes() {
    let app = TestApp::new();
    app.signup("angler@example.com", "hunter22", "angler").await;

    let (status, body) = app
        .post(
            "/api/login",
            &json!({"email": "angler@example.com", "password": "hunter22"}),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["user_name"], "angler");

    let (status, body) = app
        .post(
            "/api/login",
            &json!({"email": "angler@example.com", "password": "wrong"}),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Incorrect password");

    let (status, body) = app
        .post(
            "/api/login",
            &json!({"email": "nobody@example.com", "password": "hunter22"}),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email not found");
}

#[tokio::test]
async fn test_profile_requires_valid_token() {
    let app = TestApp::new();
    let token = app.signup("angler@example.com", "hunter22", "angler").await;

    let (status, body) = app.get("/api/user", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"user_name": "angler", "email": "angler@example.com"}));

    let (status, _) = app.get("/api/user", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/api/user", Some("not-a-token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_of_missing_user() {
    let app = TestApp::new();
    let token = app.state.tokens().issue(UserId::new(404)).unwrap();

    let (status, body) = app.get("/api/user", Some(&token)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");
}

#[tokio::test]
async fn test_list_users() {
    let app = TestApp::new();
    app.signup("one@example.com", "pw-one", "one").await;
    app.signup("two@example.com", "pw-two", "two").await;

    let (status, body) = app.get("/api/users", None).await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["user_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["one", "two"]);
}

#[tokio::test]
async fn test_logout_echoes_body() {
    let app = TestApp::new();

    let (status, body) = app
        .post("/api/logout", &json!({"bye": true}), None)
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"bye": true}));
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new();

    let (status, body) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");

    let (status, _) = app.get("/health/ready", None).await;
    assert_eq!(status, StatusCode::OK);
}
