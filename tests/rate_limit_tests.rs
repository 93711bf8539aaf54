// SPDX-License-Identifier: MIT

//! Ask-endpoint rate limiting tests (offline).
//!
//! Invalid bodies still count against the per-address window, so the
//! limit can be exercised without reaching any upstream provider.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

fn ask_from(addr: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/ask")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-forwarded-for", addr)
        .body(Body::from(serde_json::json!({"query": ""}).to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_eleventh_request_within_window_is_rejected() {
    let (app, _) = common::create_test_app();

    for i in 0..10 {
        let response = app.clone().oneshot(ask_from("203.0.113.7")).await.unwrap();
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "request {} should pass the limiter and fail validation",
            i + 1
        );
    }

    let response = app.clone().oneshot(ask_from("203.0.113.7")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    let body = common::json_body(response).await;
    assert_eq!(body["error"], "rate_limited");
}

#[tokio::test]
async fn test_limit_is_per_address() {
    let (app, _) = common::create_test_app();

    for _ in 0..10 {
        app.clone().oneshot(ask_from("198.51.100.1")).await.unwrap();
    }
    let blocked = app.clone().oneshot(ask_from("198.51.100.1")).await.unwrap();
    assert_eq!(blocked.status(), StatusCode::TOO_MANY_REQUESTS);

    // A different client address still gets through.
    let other = app.clone().oneshot(ask_from("198.51.100.2")).await.unwrap();
    assert_eq!(other.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_other_routes_are_not_rate_limited() {
    let (app, _) = common::create_test_app();

    for _ in 0..10 {
        app.clone().oneshot(ask_from("192.0.2.9")).await.unwrap();
    }

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/v1/library/search")
                .header("x-forwarded-for", "192.0.2.9")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
