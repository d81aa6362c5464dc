//! Integration tests for Hotspots.
//!
//! The tests drive the real router in-process over a fresh [`MemoryStore`],
//! so no database or running server is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p hotspots-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

use hotspots_api::db::MemoryStore;
use hotspots_api::routes;
use hotspots_api::services::TokenService;
use hotspots_api::state::AppState;

const TEST_SIGNING_KEY: &str = "integration-tests-signing-key-9f8e7d6c5b4a";

/// A router wired to an empty in-memory store.
pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub state: AppState,
    router: Router,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let tokens = TokenService::new(
            &SecretString::from(TEST_SIGNING_KEY),
            chrono::Duration::minutes(60),
        );
        let state = AppState::new(store.clone(), tokens);

        Self {
            store,
            router: routes::router(state.clone()),
            state,
        }
    }

    /// Send a request and return the status with the body parsed as JSON.
    ///
    /// Bodies that are not JSON come back as a JSON string; empty bodies as
    /// `null`.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");

        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None, token).await
    }

    pub async fn post(&self, uri: &str, body: &Value, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body), token).await
    }

    pub async fn put(&self, uri: &str, body: &Value, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(body), token).await
    }

    /// Sign up a user and return their bearer token.
    pub async fn signup(&self, email: &str, password: &str, username: &str) -> String {
        let (status, body) = self
            .post(
                "/api/signup",
                &serde_json::json!({
                    "email": email,
                    "password": password,
                    "username": username,
                }),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");

        body["token"]
            .as_str()
            .expect("signup returns a token")
            .to_owned()
    }
}

/// Path of a file under `tests/fixtures`.
#[must_use]
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

