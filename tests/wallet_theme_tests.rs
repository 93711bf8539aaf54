// SPDX-License-Identifier: MIT

//! Wallet and theme ownership-scoping tests.
//!
//! These tests require the Firestore emulator to be running.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

fn json_request(method: &str, uri: &str, cookie: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn bare_request(method: &str, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_wallet_save_list_delete_round_trip() {
    require_emulator!();

    let (app, _) = common::create_emulator_app().await;
    let email = common::unique_email("wallet");
    let (cookie, _) = common::sign_in(&app, &email, "tok-wallet").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/wallet/save",
            Some(&cookie),
            serde_json::json!({
                "title": "Rent agreement",
                "content": "Scanned copy of the agreement.",
                "tags": ["housing"],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::json_body(response).await;
    let doc_id = body["id"].as_str().unwrap().to_string();
    assert_eq!(body["message"], "Saved to wallet");

    // The saved document shows up in the owner's listing.
    let response = app
        .clone()
        .oneshot(bare_request("GET", "/v1/wallet/list", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::json_body(response).await;
    let documents = body["documents"].as_array().unwrap();
    assert!(documents.iter().any(|d| d["id"] == doc_id.as_str()));

    // Delete, then it is gone from the listing.
    let response = app
        .clone()
        .oneshot(bare_request(
            "DELETE",
            &format!("/v1/wallet/{}", doc_id),
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(bare_request("GET", "/v1/wallet/list", Some(&cookie)))
        .await
        .unwrap();
    let body = common::json_body(response).await;
    let documents = body["documents"].as_array().unwrap();
    assert!(!documents.iter().any(|d| d["id"] == doc_id.as_str()));

    // Deleting a missing document is a 404.
    let response = app
        .clone()
        .oneshot(bare_request(
            "DELETE",
            &format!("/v1/wallet/{}", doc_id),
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_wallet_is_scoped_to_owner() {
    require_emulator!();

    let (app, _) = common::create_emulator_app().await;
    let (cookie_a, _) = common::sign_in(&app, &common::unique_email("wallet-a"), "tok-wa").await;
    let (cookie_b, _) = common::sign_in(&app, &common::unique_email("wallet-b"), "tok-wb").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/wallet/save",
            Some(&cookie_a),
            serde_json::json!({"title": "A's note", "content": "private"}),
        ))
        .await
        .unwrap();
    let doc_id = common::json_body(response).await["id"]
        .as_str()
        .unwrap()
        .to_string();

    // B's listing does not contain A's document.
    let response = app
        .clone()
        .oneshot(bare_request("GET", "/v1/wallet/list", Some(&cookie_b)))
        .await
        .unwrap();
    let body = common::json_body(response).await;
    assert!(!body["documents"]
        .as_array()
        .unwrap()
        .iter()
        .any(|d| d["id"] == doc_id.as_str()));

    // Neither B nor an anonymous caller can delete it.
    for cookie in [Some(cookie_b.as_str()), None] {
        let response = app
            .clone()
            .oneshot(bare_request(
                "DELETE",
                &format!("/v1/wallet/{}", doc_id),
                cookie,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn test_theme_lifecycle_and_owner_scoping() {
    require_emulator!();

    let (app, _) = common::create_emulator_app().await;
    let (cookie_a, _) = common::sign_in(&app, &common::unique_email("theme-a"), "tok-ta").await;
    let (cookie_b, _) = common::sign_in(&app, &common::unique_email("theme-b"), "tok-tb").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/themes",
            Some(&cookie_a),
            serde_json::json!({
                "name": "High contrast",
                "tokens": {"background": "#000", "accent": "#ffb300"},
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let theme_id = common::json_body(response).await["theme"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    // Owner sees it; another user does not.
    let response = app
        .clone()
        .oneshot(bare_request("GET", "/v1/themes", Some(&cookie_a)))
        .await
        .unwrap();
    let themes = common::json_body(response).await;
    assert!(themes["themes"]
        .as_array()
        .unwrap()
        .iter()
        .any(|t| t["id"] == theme_id.as_str()));

    let response = app
        .clone()
        .oneshot(bare_request("GET", "/v1/themes", Some(&cookie_b)))
        .await
        .unwrap();
    let themes = common::json_body(response).await;
    assert!(!themes["themes"]
        .as_array()
        .unwrap()
        .iter()
        .any(|t| t["id"] == theme_id.as_str()));

    // Another user cannot update or delete it.
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/v1/themes/{}", theme_id),
            Some(&cookie_b),
            serde_json::json!({"name": "Hijacked"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The owner updates it.
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/v1/themes/{}", theme_id),
            Some(&cookie_a),
            serde_json::json!({"name": "High contrast v2"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::json_body(response).await;
    assert_eq!(body["theme"]["name"], "High contrast v2");

    // Soft delete hides it from the listing; restore brings it back.
    let response = app
        .clone()
        .oneshot(bare_request(
            "DELETE",
            &format!("/v1/themes/{}", theme_id),
            Some(&cookie_a),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(common::json_body(response).await["ok"], true);

    let response = app
        .clone()
        .oneshot(bare_request("GET", "/v1/themes", Some(&cookie_a)))
        .await
        .unwrap();
    let themes = common::json_body(response).await;
    assert!(!themes["themes"]
        .as_array()
        .unwrap()
        .iter()
        .any(|t| t["id"] == theme_id.as_str()));

    let response = app
        .clone()
        .oneshot(bare_request(
            "POST",
            &format!("/v1/themes/{}/restore", theme_id),
            Some(&cookie_a),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(bare_request("GET", "/v1/themes", Some(&cookie_a)))
        .await
        .unwrap();
    let themes = common::json_body(response).await;
    assert!(themes["themes"]
        .as_array()
        .unwrap()
        .iter()
        .any(|t| t["id"] == theme_id.as_str()));
}

#[tokio::test]
async fn test_theme_tokens_must_be_an_object() {
    // Validation rejects before any store call, so this runs offline.
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/v1/themes",
            None,
            serde_json::json!({"name": "Bad", "tokens": "not-an-object"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
