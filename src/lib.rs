//! DevEvent API library
//!
//! Events, their bookings and the HTTP API that exposes them.

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, Router};

pub mod api;
pub mod config;
pub mod db;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

pub use config::AppConfig;
pub use db::DbPool;

use db::{SqliteBookingStore, SqliteEventStore};
use middleware::RateLimitState;
use services::{BookingService, EventService, ImageStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Database connection pool
    pub db: DbPool,
    pub events: EventService,
    pub bookings: BookingService,
    /// Image host; event creation is refused without one
    pub images: Option<Arc<dyn ImageStore>>,
}

impl AppState {
    /// Wire the SQLite stores and services over `db`
    pub fn new(config: AppConfig, db: DbPool, images: Option<Arc<dyn ImageStore>>) -> Self {
        let event_store = Arc::new(SqliteEventStore::new(db.clone()));
        let booking_store = Arc::new(SqliteBookingStore::new(db.clone()));

        Self {
            config: Arc::new(config),
            db,
            events: EventService::new(event_store.clone()),
            bookings: BookingService::new(booking_store, event_store),
            images,
        }
    }
}

/// Build the `/api/v1` router.
///
/// Event and booking routes are rate limited when a limiter is given;
/// health routes never are.
pub fn build_router(state: AppState, rate_limit: Option<RateLimitState>) -> Router {
    let mut resources = api::resource_routes()
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes()));

    if let Some(rate_limit) = rate_limit {
        resources = resources.layer(axum::middleware::from_fn_with_state(
            rate_limit,
            middleware::rate_limit_middleware,
        ));
    }

    Router::new()
        .nest("/api/v1", api::public_routes().merge(resources))
        .with_state(state)
}
