//! Middleware components

pub mod rate_limit;

pub use rate_limit::{rate_limit_middleware, spawn_rate_limit_cleanup, RateLimitState};
