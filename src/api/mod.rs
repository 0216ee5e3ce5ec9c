//! API routes and handlers
//!
//! Everything here is mounted under `/api/v1`.

use axum::{routing::get, Router};

use crate::AppState;

mod bookings;
mod events;
mod extract;
mod health;

pub use extract::ValidatedJson;
pub use health::*;

/// Health endpoints, exempt from rate limiting
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/detailed", get(health::health_check_detailed))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
}

/// Event and booking resources
pub fn resource_routes() -> Router<AppState> {
    Router::new().nest("/events", events::routes())
}
