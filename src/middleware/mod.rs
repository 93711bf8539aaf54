// SPDX-License-Identifier: MIT

//! Middleware modules (authentication gate, rate limiting, security headers).

pub mod auth;
pub mod rate_limit;
pub mod security;

pub use auth::{hash_token, resolve_identity, Identity};
pub use rate_limit::RateLimiter;
