// SPDX-License-Identifier: MIT

//! HTTP route handlers.

pub mod ask;
pub mod auth;
pub mod library;
pub mod themes;
pub mod wallet;

use crate::middleware::auth::resolve_identity;
use crate::middleware::rate_limit::limit_ask_rate;
use crate::AppState;
use axum::http::{header, Method};
use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
    })
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS: configured origins plus localhost (for dev), with credentials
    // so the cross-site session cookie flows.
    let cors_origins = state.config.cors_origins.clone();
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::AllowOrigin::predicate(
            move |origin: &axum::http::HeaderValue, _request_parts: &axum::http::request::Parts| {
                let origin_str = origin.to_str().unwrap_or("");
                cors_origins.iter().any(|allowed| allowed == origin_str)
                    || origin_str.starts_with("http://localhost")
                    || origin_str.starts_with("http://127.0.0.1")
            },
        ))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    // The ask endpoint is the only rate-limited route.
    let ask_routes = ask::routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        limit_ask_rate,
    ));

    // Every API route sees the resolved identity; each route decides
    // whether anonymous is acceptable.
    let api_routes = Router::new()
        .merge(auth::routes())
        .merge(ask_routes)
        .merge(wallet::routes())
        .merge(themes::routes())
        .merge(library::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            resolve_identity,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(api_routes)
        .layer(middleware::from_fn(
            crate::middleware::security::add_security_headers,
        ))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
