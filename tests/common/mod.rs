// SPDX-License-Identifier: MIT

use adhikaar_api::config::Config;
use adhikaar_api::db::FirestoreDb;
use adhikaar_api::routes::create_router;
use adhikaar_api::AppState;
use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use std::sync::Arc;
use tower::ServiceExt;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection (emulator).
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(Config::test_default(), test_db_offline()));
    (create_router(state.clone()), state)
}

/// Create a test app backed by the Firestore emulator.
#[allow(dead_code)]
pub async fn create_emulator_app() -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(Config::test_default(), test_db().await));
    (create_router(state.clone()), state)
}

/// A unique email per test run for isolation on a shared emulator.
#[allow(dead_code)]
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.in", prefix, uuid::Uuid::new_v4())
}

/// Read the response body as JSON.
#[allow(dead_code)]
pub async fn json_body(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

/// All Set-Cookie header values of a response.
#[allow(dead_code)]
pub fn set_cookie_headers(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

/// The `name=value` pair of a Set-Cookie header, for replay in a
/// follow-up request's Cookie header.
#[allow(dead_code)]
pub fn cookie_pair(response: &Response, name: &str) -> String {
    set_cookie_headers(response)
        .iter()
        .find(|value| value.starts_with(&format!("{name}=")))
        .and_then(|value| value.split(';').next().map(str::to_string))
        .unwrap_or_else(|| panic!("missing Set-Cookie header for {name}"))
}

/// Sign in through the API and return (cookie pair, user id).
#[allow(dead_code)]
pub async fn sign_in(app: &axum::Router, email: &str, token: &str) -> (String, String) {
    let body = serde_json::json!({
        "session_token": token,
        "email": email,
        "name": "Test User",
        "picture": "https://example.in/pic.jpg",
    });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/session")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.status(),
        axum::http::StatusCode::OK,
        "sign-in should succeed"
    );

    let cookie = cookie_pair(&response, "session_token");
    let body = json_body(response).await;
    let user_id = body["user"]["id"].as_str().expect("user id").to_string();

    (cookie, user_id)
}
