// SPDX-License-Identifier: MIT

//! Wallet routes: user-saved documents.
//!
//! All routes work anonymously; the identity only scopes which documents
//! a request can see or delete.

use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::Identity;
use crate::models::WalletDocument;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/v1/wallet/save", post(save))
        .route("/v1/wallet/list", get(list))
        .route("/v1/wallet/{doc_id}", delete(remove))
}

#[derive(Deserialize, Validate)]
pub struct WalletSaveRequest {
    #[validate(length(min = 1, max = 200))]
    title: String,
    #[validate(length(min = 1))]
    content: String,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Serialize)]
pub struct WalletSaveResponse {
    pub id: String,
    pub message: String,
}

async fn save(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<WalletSaveRequest>,
) -> Result<Json<WalletSaveResponse>> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let doc = WalletDocument::new(identity.user_id(), req.title, req.content, req.tags);
    state.db.insert_wallet_doc(&doc).await?;

    tracing::debug!(doc_id = %doc.id, anonymous = doc.user_id.is_none(), "Wallet document saved");

    Ok(Json(WalletSaveResponse {
        id: doc.id,
        message: "Saved to wallet".to_string(),
    }))
}

#[derive(Serialize)]
pub struct WalletListResponse {
    pub documents: Vec<WalletDocument>,
}

async fn list(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<WalletListResponse>> {
    let owner = identity.user_id();
    let documents = state.db.list_wallet_docs(owner.as_deref()).await?;
    Ok(Json(WalletListResponse { documents }))
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Delete a document. Ownership is part of the lookup: a document owned
/// by someone else is indistinguishable from a missing one.
async fn remove(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(doc_id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let doc = state
        .db
        .get_wallet_doc(&doc_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Document not found".to_string()))?;

    if doc.user_id != identity.user_id() {
        return Err(AppError::NotFound("Document not found".to_string()));
    }

    state.db.delete_wallet_doc(&doc_id).await?;

    Ok(Json(MessageResponse {
        message: "Document deleted".to_string(),
    }))
}
