// SPDX-License-Identifier: MIT

//! Per-client-address request rate limiting for the ask endpoint.
//!
//! Fixed-window counters in a concurrent map. The key is the first
//! `X-Forwarded-For` hop when present (the service runs behind a proxy),
//! falling back to the peer address.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Ask endpoint policy: 10 requests per minute per client address.
pub const ASK_MAX_REQUESTS: u32 = 10;
pub const ASK_WINDOW: Duration = Duration::from_secs(60);

/// Entries older than this are pruned when the map grows large.
const PRUNE_THRESHOLD: usize = 10_000;

struct FixedWindow {
    started: Instant,
    hits: u32,
}

/// Fixed-window rate limiter keyed by client address.
pub struct RateLimiter {
    max_hits: u32,
    window: Duration,
    windows: DashMap<String, FixedWindow>,
}

impl RateLimiter {
    pub fn new(max_hits: u32, window: Duration) -> Self {
        Self {
            max_hits,
            window,
            windows: DashMap::new(),
        }
    }

    /// Record a hit for `key` and report whether it is within the limit.
    pub fn check(&self, key: &str) -> bool {
        let now = Instant::now();

        let mut entry = self
            .windows
            .entry(key.to_string())
            .or_insert_with(|| FixedWindow {
                started: now,
                hits: 0,
            });

        if now.duration_since(entry.started) >= self.window {
            entry.started = now;
            entry.hits = 0;
        }
        entry.hits += 1;
        let allowed = entry.hits <= self.max_hits;
        drop(entry);

        if self.windows.len() > PRUNE_THRESHOLD {
            let window = self.window;
            self.windows
                .retain(|_, w| now.duration_since(w.started) < window);
        }

        allowed
    }
}

/// Middleware enforcing the ask-endpoint rate limit.
pub async fn limit_ask_rate(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let key = client_key(&request);
    if !state.ask_limiter.check(&key) {
        tracing::warn!(client = %key, "Ask rate limit exceeded");
        return Err(AppError::RateLimited);
    }
    Ok(next.run(request).await)
}

/// Client address for rate-limit keying.
fn client_key(request: &Request) -> String {
    if let Some(forwarded) = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_limit_then_rejects() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));

        assert!(limiter.check("1.2.3.4"));
        assert!(limiter.check("1.2.3.4"));
        assert!(limiter.check("1.2.3.4"));
        assert!(!limiter.check("1.2.3.4"));
        assert!(!limiter.check("1.2.3.4"));
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));

        assert!(limiter.check("1.2.3.4"));
        assert!(!limiter.check("1.2.3.4"));
        assert!(limiter.check("5.6.7.8"));
    }

    #[test]
    fn test_window_resets() {
        let limiter = RateLimiter::new(1, Duration::from_millis(20));

        assert!(limiter.check("1.2.3.4"));
        assert!(!limiter.check("1.2.3.4"));
        std::thread::sleep(Duration::from_millis(25));
        assert!(limiter.check("1.2.3.4"));
    }
}
