// SPDX-License-Identifier: MIT

//! Theme CRUD: named styling-token sets, soft-deleted and restorable.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::Identity;
use crate::models::theme::{Theme, STATUS_DELETED, STATUS_PUBLISHED};
use crate::time_utils::now_rfc3339;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/v1/themes", get(list).post(create))
        .route("/v1/themes/{theme_id}", put(update).delete(remove))
        .route("/v1/themes/{theme_id}/restore", post(restore))
}

#[derive(Deserialize)]
struct ThemesQuery {
    #[serde(default = "default_scope")]
    scope: String,
}

fn default_scope() -> String {
    "user".to_string()
}

#[derive(Serialize)]
pub struct ThemeListResponse {
    pub themes: Vec<Theme>,
}

async fn list(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Query(params): Query<ThemesQuery>,
) -> Result<Json<ThemeListResponse>> {
    let owner = identity.user_id();
    let themes = state
        .db
        .list_themes(owner.as_deref(), &params.scope)
        .await?;
    Ok(Json(ThemeListResponse { themes }))
}

#[derive(Deserialize, Validate)]
pub struct ThemeCreateRequest {
    #[validate(length(min = 1, max = 100))]
    name: String,
    tokens: serde_json::Value,
    #[serde(default = "default_scope")]
    scope: String,
}

#[derive(Serialize)]
pub struct ThemeResponse {
    pub theme: Theme,
}

async fn create(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<ThemeCreateRequest>,
) -> Result<Json<ThemeResponse>> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    if !req.tokens.is_object() {
        return Err(AppError::BadRequest(
            "tokens must be a JSON object".to_string(),
        ));
    }

    let theme = Theme::new(req.name, req.tokens, identity.user_id(), req.scope);
    state.db.insert_theme(&theme).await?;

    Ok(Json(ThemeResponse { theme }))
}

#[derive(Deserialize)]
pub struct ThemeUpdateRequest {
    name: Option<String>,
    tokens: Option<serde_json::Value>,
}

async fn update(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(theme_id): Path<String>,
    Json(req): Json<ThemeUpdateRequest>,
) -> Result<Json<ThemeResponse>> {
    let mut theme = owned_theme(&state, &identity, &theme_id).await?;

    if let Some(name) = req.name {
        theme.name = name;
    }
    if let Some(tokens) = req.tokens {
        if !tokens.is_object() {
            return Err(AppError::BadRequest(
                "tokens must be a JSON object".to_string(),
            ));
        }
        theme.tokens = tokens;
    }
    theme.updated_at = now_rfc3339();

    state.db.update_theme(&theme).await?;
    Ok(Json(ThemeResponse { theme }))
}

#[derive(Serialize)]
pub struct ThemeDeleteResponse {
    pub ok: bool,
}

/// Soft delete: the theme stops listing but stays restorable.
async fn remove(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(theme_id): Path<String>,
) -> Result<Json<ThemeDeleteResponse>> {
    let mut theme = owned_theme(&state, &identity, &theme_id).await?;

    theme.status = STATUS_DELETED.to_string();
    theme.deleted_at = Some(now_rfc3339());
    theme.updated_at = now_rfc3339();

    state.db.update_theme(&theme).await?;
    Ok(Json(ThemeDeleteResponse { ok: true }))
}

async fn restore(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(theme_id): Path<String>,
) -> Result<Json<ThemeResponse>> {
    let mut theme = owned_theme(&state, &identity, &theme_id).await?;

    theme.status = STATUS_PUBLISHED.to_string();
    theme.deleted_at = None;
    theme.updated_at = now_rfc3339();

    state.db.update_theme(&theme).await?;
    Ok(Json(ThemeResponse { theme }))
}

/// Fetch a theme the current identity owns. A theme owned by someone
/// else is indistinguishable from a missing one.
async fn owned_theme(
    state: &AppState,
    identity: &Identity,
    theme_id: &str,
) -> Result<Theme> {
    let theme = state
        .db
        .get_theme(theme_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Theme not found".to_string()))?;

    if theme.owner_id != identity.user_id() {
        return Err(AppError::NotFound("Theme not found".to_string()));
    }

    Ok(theme)
}
