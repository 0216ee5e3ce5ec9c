//! Booking data model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::normalize::normalize_email;
use crate::utils::validation::validate_email_address;

/// A seat reserved by one email address for one event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Option<i64>,
    /// The booked event; bookings are removed together with their event
    pub event_id: i64,
    pub email: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Booking {
    /// Create an unsaved booking
    pub fn new(event_id: i64, email: impl Into<String>) -> Self {
        Self {
            id: None,
            event_id,
            email: email.into(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Normalize the email before a write
    pub fn normalize(&mut self) {
        self.email = normalize_email(&self.email);
    }
}

/// Request body of `POST /events/{id}/bookings`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBookingRequest {
    #[validate(
        custom(function = "validate_email_address"),
        length(max = 255, message = "Email cannot exceed 255 characters")
    )]
    pub email: String,
}
