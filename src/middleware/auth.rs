// SPDX-License-Identifier: MIT

//! Cookie session authentication: token hashing and the per-request
//! identity gate.
//!
//! The gate resolves an *optional* identity: a missing, unknown, or
//! expired session cookie is a normal anonymous request, not an error.
//! Routes that need a signed-in user escalate via [`Identity::require`].

use crate::error::AppError;
use crate::models::User;
use crate::time_utils::parse_rfc3339;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Name of the session cookie holding the raw bearer token.
pub const SESSION_COOKIE: &str = "session_token";

/// One-way transform of a bearer token into its storage/lookup key.
///
/// SHA-256, hex encoded. No salt: the token itself is high-entropy, and
/// the digest is only ever compared for equality, never reversed.
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// The resolved identity of a request: a user, or anonymous.
#[derive(Debug, Clone)]
pub struct Identity(Option<User>);

impl Identity {
    pub fn anonymous() -> Self {
        Self(None)
    }

    pub fn user(&self) -> Option<&User> {
        self.0.as_ref()
    }

    /// Owner key for scoping owned-resource queries (`None` = no owner).
    pub fn user_id(&self) -> Option<String> {
        self.0.as_ref().map(|u| u.id.clone())
    }

    /// Escalate an anonymous request to 401. Only `/auth/me` does this;
    /// everywhere else anonymous use is permitted.
    pub fn require(&self) -> Result<&User, AppError> {
        self.0.as_ref().ok_or(AppError::Unauthorized)
    }
}

/// Middleware that resolves the request's identity from its cookie jar
/// and inserts it into the request extensions.
///
/// Store faults propagate as 500; absence of credentials never does.
pub async fn resolve_identity(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let identity = lookup_identity(&state, &jar).await?;
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

async fn lookup_identity(state: &AppState, jar: &CookieJar) -> Result<Identity, AppError> {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Ok(Identity::anonymous());
    };

    let token_hash = hash_token(cookie.value());
    let Some(session) = state.db.get_session_by_token_hash(&token_hash).await? else {
        return Ok(Identity::anonymous());
    };

    // Expired sessions stop resolving but the row is left in place; the
    // background reaper removes it later.
    match parse_rfc3339(&session.expires_at) {
        Some(expires_at) if expires_at > chrono::Utc::now() => {}
        _ => {
            tracing::debug!(session_id = %session.id, "Session expired");
            return Ok(Identity::anonymous());
        }
    }

    let user = state.db.get_user(&session.user_id).await?;
    if user.is_none() {
        tracing::warn!(
            session_id = %session.id,
            user_id = %session.user_id,
            "Session references a missing user"
        );
    }

    Ok(Identity(user))
}
