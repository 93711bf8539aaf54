// SPDX-License-Identifier: MIT

//! Theme model: a named set of styling tokens, scoped to a user or shared.

use serde::{Deserialize, Serialize};

use crate::time_utils::now_rfc3339;

/// Theme lifecycle status. Deletion is soft so themes can be restored.
pub const STATUS_PUBLISHED: &str = "published";
pub const STATUS_DELETED: &str = "deleted";

/// A theme stored in Firestore (document ID = `id`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub id: String,
    pub name: String,
    /// Styling key-value tokens (free-form JSON object)
    pub tokens: serde_json::Value,
    /// Owning user; `None` for anonymously created themes
    pub owner_id: Option<String>,
    /// "user" or "shared"
    pub scope: String,
    pub visibility: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
    pub version: String,
}

impl Theme {
    pub fn new(
        name: String,
        tokens: serde_json::Value,
        owner_id: Option<String>,
        scope: String,
    ) -> Self {
        let now = now_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            tokens,
            owner_id,
            scope,
            visibility: "private".to_string(),
            status: STATUS_PUBLISHED.to_string(),
            created_at: now.clone(),
            updated_at: now,
            deleted_at: None,
            version: "1.0.0".to_string(),
        }
    }
}
