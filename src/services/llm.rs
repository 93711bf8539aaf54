// SPDX-License-Identifier: MIT

//! LLM completion client (OpenAI-compatible chat API).
//!
//! Every call is wrapped in a bounded timeout: a slow provider surfaces
//! as a distinct 504-class error instead of hanging the connection, and
//! nothing is retried automatically.

use crate::error::AppError;
use serde::Deserialize;
use std::time::Duration;

/// Upper bound for one completion round trip.
pub const LLM_TIMEOUT: Duration = Duration::from_secs(15);

/// Chat-completion client.
#[derive(Clone)]
pub struct LlmClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl LlmClient {
    pub fn new(base_url: String, api_key: String, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
            model,
        }
    }

    /// Run one system+user completion and return the raw assistant text.
    pub async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, AppError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_prompt},
            ],
        });

        let request = async {
            let response = self
                .http
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await
                .map_err(|e| AppError::Upstream(format!("Completion request failed: {}", e)))?;

            check_response_json::<ChatCompletion>(response).await
        };

        let completion = tokio::time::timeout(LLM_TIMEOUT, request)
            .await
            .map_err(|_| {
                AppError::UpstreamTimeout(format!(
                    "Completion exceeded {}s",
                    LLM_TIMEOUT.as_secs()
                ))
            })??;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AppError::Upstream("Completion returned no choices".to_string()))
    }
}

/// Check response status and parse the JSON body.
async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, AppError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::Upstream(format!("HTTP {}: {}", status, body)));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::Upstream(format!("Malformed completion response: {}", e)))
}

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}
