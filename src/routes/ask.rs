// SPDX-License-Identifier: MIT

//! AI-assisted legal Q&A with citations.

use axum::{extract::State, routing::post, Extension, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::Identity;
use crate::models::AskLog;
use crate::services::answer::parse_answer;
use crate::services::search::SourceLink;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/v1/ask", post(ask))
}

const SYSTEM_PROMPT: &str = "\
You are Adhikaar, an AI legal assistant for India. Provide accurate, \
cited guidance based on Indian law in simple, accessible language. \
Always cite specific acts, sections, and official sources; mention the \
jurisdiction (India); avoid definitive legal advice in favor of general \
guidance. Respond with a JSON object in a ```json code fence with the \
keys: title (max 80 chars), summary (2-3 sentences), steps (3-5 \
actionable items), template (a short document template with \
[placeholders], or null).";

#[derive(Deserialize, Validate)]
pub struct AskRequest {
    #[validate(length(min = 1, max = 1000, message = "query must be 1-1000 characters"))]
    query: String,
    #[serde(default = "default_lang")]
    lang: String,
    #[serde(default)]
    context: serde_json::Map<String, serde_json::Value>,
}

fn default_lang() -> String {
    "en".to_string()
}

#[derive(Serialize)]
pub struct AskResponse {
    pub title: String,
    pub summary: String,
    pub steps: Vec<String>,
    pub sources: Vec<SourceLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    pub updated: String,
}

/// Answer a legal question: search for sources, run the completion,
/// extract the structured answer, record the query.
///
/// Rate limiting per client address is applied as a route layer in the
/// router assembly.
async fn ask(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let use_case = req
        .context
        .get("useCase")
        .and_then(|v| v.as_str())
        .map(str::to_string);

    tracing::debug!(
        lang = %req.lang,
        use_case = ?use_case,
        anonymous = identity.user().is_none(),
        "Answering legal query"
    );

    let sources = state
        .search
        .search(&req.query, use_case.as_deref())
        .await?;

    let completion = state
        .llm
        .complete(
            SYSTEM_PROMPT,
            &user_prompt(&req.query, use_case.as_deref(), &sources),
        )
        .await?;

    let answer = parse_answer(&completion, &req.query);

    let log = AskLog::new(
        identity.user_id(),
        req.query.clone(),
        req.lang.clone(),
        use_case,
    );
    state.db.insert_ask_log(&log).await?;

    Ok(Json(AskResponse {
        title: answer.title,
        summary: answer.summary,
        steps: answer.steps,
        sources,
        template: answer.template,
        updated: "Updated: Today".to_string(),
    }))
}

fn user_prompt(query: &str, use_case: Option<&str>, sources: &[SourceLink]) -> String {
    let sources_text = sources
        .iter()
        .map(|s| format!("- {} ({})", s.title, s.url))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Question: {}\n\nUse case: {}\n\nAvailable sources:\n{}\n\n\
         Answer with the JSON object described in your instructions.",
        query,
        use_case.unwrap_or("general"),
        sources_text
    )
}
