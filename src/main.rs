// SPDX-License-Identifier: MIT

//! Adhikaar API Server
//!
//! Legal-assistance backend: cookie-session authentication, AI-assisted
//! Q&A with citations, wallet storage, and theme preferences.

use adhikaar_api::{config::Config, db::FirestoreDb, time_utils::now_rfc3339, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How often the background reaper sweeps expired sessions.
const REAPER_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Adhikaar API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Expired sessions are filtered at lookup time regardless; the
    // reaper only keeps the collection from growing without bound.
    spawn_session_reaper(db.clone());

    // Build shared state
    let state = Arc::new(AppState::new(config.clone(), db));

    // Build router
    let app = adhikaar_api::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}

/// Periodically delete sessions past their expiry.
fn spawn_session_reaper(db: FirestoreDb) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(REAPER_INTERVAL);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match db.delete_expired_sessions(&now_rfc3339()).await {
                Ok(0) => {}
                Ok(count) => tracing::info!(count, "Reaped expired sessions"),
                Err(e) => tracing::warn!(error = %e, "Session reaper sweep failed"),
            }
        }
    });
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("adhikaar_api=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
