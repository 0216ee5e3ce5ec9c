//! Booking API endpoints, nested under an event

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};

use super::extract::{parse_id, ValidatedJson};
use crate::{
    models::{Booking, CreateBookingRequest},
    utils::AppResult,
    AppState,
};

/// Create routes for booking endpoints
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/{id}/bookings", get(list_bookings).post(book_event))
        .route("/{id}/bookings/{booking_id}", delete(cancel_booking))
}

/// Book a seat for an email address
async fn book_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<CreateBookingRequest>,
) -> AppResult<(StatusCode, Json<Booking>)> {
    let event_id = parse_id(&id, "event")?;
    let booking = state.bookings.book_event(event_id, &payload.email).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// List the bookings of an event
async fn list_bookings(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Booking>>> {
    let event_id = parse_id(&id, "event")?;
    Ok(Json(state.bookings.get_bookings_for_event(event_id).await?))
}

/// Cancel a booking
async fn cancel_booking(
    State(state): State<AppState>,
    Path((id, booking_id)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    let event_id = parse_id(&id, "event")?;
    let booking_id = parse_id(&booking_id, "booking")?;
    state.bookings.cancel_booking(event_id, booking_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
