// SPDX-License-Identifier: MIT

//! Audit record for answered questions.

use serde::{Deserialize, Serialize};

use crate::time_utils::now_rfc3339;

/// One answered question (document ID = `id`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskLog {
    pub id: String,
    /// Asking user, `None` when anonymous
    pub user_id: Option<String>,
    pub query: String,
    pub lang: String,
    pub use_case: Option<String>,
    pub created_at: String,
}

impl AskLog {
    pub fn new(
        user_id: Option<String>,
        query: String,
        lang: String,
        use_case: Option<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            query,
            lang,
            use_case,
            created_at: now_rfc3339(),
        }
    }
}
