// SPDX-License-Identifier: MIT

//! Wallet document model.

use serde::{Deserialize, Serialize};

use crate::time_utils::now_rfc3339;

/// A user-saved text artifact with tags (document ID = `id`).
///
/// `user_id` is `None` for documents saved anonymously; listing and
/// deletion are scoped to the owner, with `None` meaning "no owner".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletDocument {
    pub id: String,
    pub user_id: Option<String>,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: String,
}

impl WalletDocument {
    pub fn new(
        user_id: Option<String>,
        title: String,
        content: String,
        tags: Vec<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            title,
            content,
            tags,
            created_at: now_rfc3339(),
        }
    }
}
