// SPDX-License-Identifier: MIT

//! Session authentication routes: issuance after OAuth, identity echo,
//! logout.

use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::{hash_token, Identity, SESSION_COOKIE};
use crate::models::user::SESSION_TTL_DAYS;
use crate::models::{Session, User};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/session", post(create_session))
        .route("/auth/me", get(me))
        .route("/auth/logout", post(logout))
}

/// Body posted by the frontend after the OAuth provider hands it a
/// session token and profile.
#[derive(Deserialize, Validate)]
pub struct SessionCreateRequest {
    session_token: String,
    #[validate(email)]
    email: String,
    name: String,
    #[serde(default)]
    picture: Option<String>,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub user: User,
    pub message: String,
}

/// Create-or-reuse the user for this email and mint a new session.
///
/// Issuance always creates a fresh session row, even when the user
/// already holds live ones; each browser gets its own token.
async fn create_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<SessionCreateRequest>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let user = find_or_create_user(&state, &req).await?;

    let session = Session::new(user.id.clone(), hash_token(&req.session_token));
    state.db.insert_session(&session).await?;

    tracing::info!(user_id = %user.id, session_id = %session.id, "Session created");

    // The raw token travels only in the cookie; the store holds its hash.
    let jar = jar.add(session_cookie(req.session_token));

    Ok((
        jar,
        Json(SessionResponse {
            user,
            message: "Session created".to_string(),
        }),
    ))
}

/// Match a returning user by email, or create one.
///
/// Stored attributes of a returning user are kept as-is rather than
/// refreshed from the incoming profile. First-time creation goes through
/// an email reservation so that two concurrent sign-ins for a brand-new
/// email converge on a single user record.
async fn find_or_create_user(state: &AppState, req: &SessionCreateRequest) -> Result<User> {
    if let Some(existing) = state.db.find_user_by_email(&req.email).await? {
        return Ok(existing);
    }

    let user = User::new(req.email.clone(), req.name.clone(), req.picture.clone());
    state.db.insert_user(&user).await?;

    match state.db.reserve_user_email(&req.email, &user.id).await? {
        None => Ok(user),
        Some(winner_id) if winner_id == user.id => Ok(user),
        Some(winner_id) => {
            tracing::info!(
                email = %req.email,
                winner_id = %winner_id,
                "Lost concurrent sign-in race, adopting existing user"
            );
            if let Err(e) = state.db.delete_user(&user.id).await {
                tracing::warn!(error = %e, user_id = %user.id, "Failed to remove duplicate user");
            }
            state.db.get_user(&winner_id).await?.ok_or_else(|| {
                AppError::Database(format!("Reserved user {} not yet visible", winner_id))
            })
        }
    }
}

#[derive(Serialize)]
pub struct UserResponse {
    pub user: User,
}

/// Get the current authenticated user. The only route where anonymous
/// is a hard failure.
async fn me(Extension(identity): Extension<Identity>) -> Result<Json<UserResponse>> {
    let user = identity.require()?;
    Ok(Json(UserResponse { user: user.clone() }))
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Invalidate the presented session and clear the cookie.
///
/// The delete is unconditional on the hash match, and the cookie is
/// cleared whether or not a session existed, so repeated logouts with a
/// dead cookie succeed identically.
async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<MessageResponse>)> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        let token_hash = hash_token(cookie.value());
        if let Err(e) = state.db.delete_session_by_token_hash(&token_hash).await {
            tracing::warn!(error = %e, "Failed to delete session on logout");
        }
    }

    let jar = jar.remove(cleared_session_cookie());

    Ok((
        jar,
        Json(MessageResponse {
            message: "Logged out".to_string(),
        }),
    ))
}

/// Session cookie carrying the raw token. Cross-site capable: the SPA
/// and the API live on different origins.
fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .max_age(time::Duration::days(SESSION_TTL_DAYS))
        .path("/")
        .build()
}

/// Removal cookie with the same attributes as the one set at issuance.
fn cleared_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .path("/")
        .build()
}
