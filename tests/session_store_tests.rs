// SPDX-License-Identifier: MIT

//! Store-level tests for users, email reservations, and sessions.
//!
//! These tests require the Firestore emulator to be running.

use adhikaar_api::middleware::hash_token;
use adhikaar_api::models::{Session, User};
use adhikaar_api::time_utils::{format_utc_rfc3339, now_rfc3339};

mod common;
use common::{test_db, unique_email};

#[tokio::test]
async fn test_user_insert_and_lookup_round_trip() {
    require_emulator!();

    let db = test_db().await;
    let email = unique_email("store-user");

    assert!(db.find_user_by_email(&email).await.unwrap().is_none());

    let user = User::new(email.clone(), "Store User".to_string(), None);
    db.insert_user(&user).await.unwrap();

    let by_id = db.get_user(&user.id).await.unwrap().unwrap();
    assert_eq!(by_id.email, email);

    let by_email = db.find_user_by_email(&email).await.unwrap().unwrap();
    assert_eq!(by_email.id, user.id);

    db.delete_user(&user.id).await.unwrap();
    assert!(db.get_user(&user.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_email_reservation_is_insert_if_absent() {
    require_emulator!();

    let db = test_db().await;
    let email = unique_email("store-reserve");

    // First writer wins the reservation.
    let won = db.reserve_user_email(&email, "user-a").await.unwrap();
    assert_eq!(won, None);

    // Every later writer is told who won.
    let lost = db.reserve_user_email(&email, "user-b").await.unwrap();
    assert_eq!(lost, Some("user-a".to_string()));

    let again = db.reserve_user_email(&email, "user-c").await.unwrap();
    assert_eq!(again, Some("user-a".to_string()));
}

#[tokio::test]
async fn test_sessions_are_keyed_by_token_hash() {
    require_emulator!();

    let db = test_db().await;
    let token = format!("store-tok-{}", uuid::Uuid::new_v4());
    let token_hash = hash_token(&token);

    assert!(db
        .get_session_by_token_hash(&token_hash)
        .await
        .unwrap()
        .is_none());

    let session = Session::new("user-1".to_string(), token_hash.clone());
    db.insert_session(&session).await.unwrap();

    let fetched = db
        .get_session_by_token_hash(&token_hash)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.id, session.id);
    assert_eq!(fetched.user_id, "user-1");

    // Delete is idempotent.
    db.delete_session_by_token_hash(&token_hash).await.unwrap();
    assert!(db
        .get_session_by_token_hash(&token_hash)
        .await
        .unwrap()
        .is_none());
    db.delete_session_by_token_hash(&token_hash).await.unwrap();
}

#[tokio::test]
async fn test_reaper_removes_only_expired_sessions() {
    require_emulator!();

    let db = test_db().await;
    let now = chrono::Utc::now();

    let expired_hash = hash_token(&format!("reaper-old-{}", uuid::Uuid::new_v4()));
    let expired = Session {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: "user-1".to_string(),
        token_hash: expired_hash.clone(),
        expires_at: format_utc_rfc3339(now - chrono::Duration::days(1)),
        created_at: format_utc_rfc3339(now - chrono::Duration::days(8)),
    };
    db.insert_session(&expired).await.unwrap();

    let live_hash = hash_token(&format!("reaper-live-{}", uuid::Uuid::new_v4()));
    let live = Session::new("user-1".to_string(), live_hash.clone());
    db.insert_session(&live).await.unwrap();

    let reaped = db.delete_expired_sessions(&now_rfc3339()).await.unwrap();
    assert!(reaped >= 1, "at least the planted expired session goes");

    assert!(db
        .get_session_by_token_hash(&expired_hash)
        .await
        .unwrap()
        .is_none());
    assert!(db
        .get_session_by_token_hash(&live_hash)
        .await
        .unwrap()
        .is_some());
}
