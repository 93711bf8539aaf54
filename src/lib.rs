// SPDX-License-Identifier: MIT

//! Adhikaar: legal-assistance backend for users in India.
//!
//! This crate provides the backend API: cookie-session authentication,
//! AI-assisted legal Q&A with citations, wallet document storage, a
//! curated legal library, and theme preferences.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use middleware::rate_limit::{RateLimiter, ASK_MAX_REQUESTS, ASK_WINDOW};
use services::{LlmClient, WebSearchClient};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub llm: LlmClient,
    pub search: WebSearchClient,
    pub ask_limiter: RateLimiter,
}

impl AppState {
    /// Assemble the state from a loaded config and a connected store.
    pub fn new(config: Config, db: FirestoreDb) -> Self {
        let llm = LlmClient::new(
            config.llm_base_url.clone(),
            config.llm_api_key.clone(),
            config.llm_model.clone(),
        );
        let search = WebSearchClient::new(
            config.search_base_url.clone(),
            config.search_api_key.clone(),
        );

        Self {
            config,
            db,
            llm,
            search,
            ask_limiter: RateLimiter::new(ASK_MAX_REQUESTS, ASK_WINDOW),
        }
    }
}
