// SPDX-License-Identifier: MIT

//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup; handlers only ever see the cached
//! `Config` carried in the shared state.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend origins allowed by CORS (comma-separated in env)
    pub cors_origins: Vec<String>,
    /// GCP project ID for Firestore
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,

    // --- Upstream providers ---
    /// API key for the LLM completion provider
    pub llm_api_key: String,
    /// Base URL of the OpenAI-compatible completion API
    pub llm_base_url: String,
    /// Completion model name
    pub llm_model: String,
    /// API key for the web-search provider (empty = curated sources only)
    pub search_api_key: String,
    /// Base URL of the web-search API
    pub search_base_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),

            llm_api_key: env::var("LLM_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("LLM_API_KEY"))?,
            llm_base_url: env::var("LLM_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            llm_model: env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            search_api_key: env::var("SEARCH_API_KEY")
                .map(|v| v.trim().to_string())
                .unwrap_or_default(),
            search_base_url: env::var("SEARCH_BASE_URL")
                .unwrap_or_else(|_| "https://api.search.brave.com".to_string()),
        })
    }

    /// Config for tests: offline providers, localhost origins.
    pub fn test_default() -> Self {
        Self {
            cors_origins: vec!["http://localhost:3000".to_string()],
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            llm_api_key: "test-llm-key".to_string(),
            llm_base_url: "http://localhost:0".to_string(),
            llm_model: "gpt-4o-mini".to_string(),
            search_api_key: String::new(),
            search_base_url: "http://localhost:0".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("LLM_API_KEY", "test-key");
        env::set_var("CORS_ORIGINS", "https://adhikaar.example, http://localhost:3000");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.llm_api_key, "test-key");
        assert_eq!(config.llm_model, "gpt-4o-mini");
        assert_eq!(config.port, 8080);
        assert_eq!(
            config.cors_origins,
            vec![
                "https://adhikaar.example".to_string(),
                "http://localhost:3000".to_string()
            ]
        );
    }
}
