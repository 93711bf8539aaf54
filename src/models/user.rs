// SPDX-License-Identifier: MIT

//! User and session models for storage and API.

use serde::{Deserialize, Serialize};

use crate::time_utils::now_rfc3339;

/// How long a session stays valid after issuance. Fixed at creation,
/// never extended by use.
pub const SESSION_TTL_DAYS: i64 = 7;

/// User profile stored in Firestore (document ID = `id`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Opaque identifier, generated at first sign-in
    pub id: String,
    /// Unique natural key; detects returning users
    pub email: String,
    /// Display name
    pub name: String,
    /// Profile picture URL
    pub picture: Option<String>,
    /// When the user first signed in (RFC3339, immutable)
    pub created_at: String,
}

impl User {
    /// Build a new user from OAuth profile attributes.
    pub fn new(email: String, name: String, picture: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email,
            name,
            picture,
            created_at: now_rfc3339(),
        }
    }
}

/// One bearer-token session (document ID = `token_hash`).
///
/// Only the hash of the token is ever persisted; the raw token lives in
/// the client's cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    /// Back-reference to the owning user (a user may hold many sessions)
    pub user_id: String,
    /// SHA-256 hex digest of the bearer token
    pub token_hash: String,
    /// Absolute expiry (RFC3339), creation + 7 days
    pub expires_at: String,
    pub created_at: String,
}

impl Session {
    /// Mint a session for a user from an already-hashed token.
    pub fn new(user_id: String, token_hash: String) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            token_hash,
            expires_at: crate::time_utils::format_utc_rfc3339(
                now + chrono::Duration::days(SESSION_TTL_DAYS),
            ),
            created_at: crate::time_utils::format_utc_rfc3339(now),
        }
    }
}

/// Email-uniqueness reservation (document ID = url-encoded email).
///
/// Created with insert-if-absent semantics during first sign-in so that
/// two concurrent issuance calls for a brand-new email cannot both create
/// a user record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailReservation {
    pub email: String,
    pub user_id: String,
    pub created_at: String,
}
