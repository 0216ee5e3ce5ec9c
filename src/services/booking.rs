//! Booking service

use std::sync::Arc;

use tracing::info;

use super::event::not_found_by_id;
use super::ServiceError;
use crate::db::{BookingStore, EventStore};
use crate::models::Booking;

/// Booking use cases
#[derive(Clone)]
pub struct BookingService {
    bookings: Arc<dyn BookingStore>,
    events: Arc<dyn EventStore>,
}

impl BookingService {
    pub fn new(bookings: Arc<dyn BookingStore>, events: Arc<dyn EventStore>) -> Self {
        Self { bookings, events }
    }

    async fn ensure_event(&self, event_id: i64) -> Result<(), ServiceError> {
        match self.events.find_by_id(event_id).await? {
            Some(_) => Ok(()),
            None => Err(not_found_by_id(event_id)),
        }
    }

    /// Reserve a seat for `email`; one booking per email and event
    pub async fn book_event(&self, event_id: i64, email: &str) -> Result<Booking, ServiceError> {
        self.ensure_event(event_id).await?;

        let mut booking = Booking::new(event_id, email);
        booking.normalize();
        let booking = self.bookings.save(booking).await?;

        info!(event_id, booking_id = ?booking.id, "Event booked");
        Ok(booking)
    }

    /// Bookings of an event, oldest first
    pub async fn get_bookings_for_event(&self, event_id: i64) -> Result<Vec<Booking>, ServiceError> {
        self.ensure_event(event_id).await?;
        Ok(self.bookings.find_by_event(event_id).await?)
    }

    pub async fn cancel_booking(&self, event_id: i64, booking_id: i64) -> Result<(), ServiceError> {
        let not_found = || {
            ServiceError::NotFound(format!(
                "Booking with id: {booking_id} not found for event {event_id}"
            ))
        };

        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .filter(|b| b.event_id == event_id)
            .ok_or_else(not_found)?;

        // Another request may have cancelled it since the lookup
        if !self.bookings.delete(booking_id).await? {
            return Err(not_found());
        }
        info!(event_id, booking_id, email = %booking.email, "Booking cancelled");
        Ok(())
    }
}
