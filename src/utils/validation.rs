//! Input validation utilities
//!
//! Format checks applied at the API boundary, before anything reaches the
//! services. The `validate_*` functions plug into `#[validate(custom(...))]`.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use validator::{ValidateEmail, ValidationError};

use crate::models::EventMode;

/// Regex for `YYYY-MM-DD` dates
static DATE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern is valid"));

/// Regex for `HH:MM` with an optional AM/PM marker
static TIME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^([0-1]?[0-9]|2[0-3]):[0-5][0-9](\s*(AM|PM))?$")
        .expect("time pattern is valid")
});

/// Regex for absolute or scheme-relative image URLs
static IMAGE_URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(https?://|//).*\.(jpg|jpeg|png|gif|webp|svg)$")
        .expect("image url pattern is valid")
});

/// Validate a date in `YYYY-MM-DD` form
pub fn is_valid_date(date: &str) -> bool {
    DATE_REGEX.is_match(date)
}

/// Validate a time in `HH:MM` or `HH:MM AM/PM` form
pub fn is_valid_time(time: &str) -> bool {
    TIME_REGEX.is_match(time)
}

/// Validate an image URL
pub fn is_valid_image_url(url: &str) -> bool {
    IMAGE_URL_REGEX.is_match(url)
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("blank", "Value cannot be blank"));
    }
    Ok(())
}

pub fn validate_date(date: &str) -> Result<(), ValidationError> {
    if !is_valid_date(date) {
        return Err(invalid("date_format", "Date must be in YYYY-MM-DD format"));
    }
    Ok(())
}

pub fn validate_time(time: &str) -> Result<(), ValidationError> {
    if !is_valid_time(time) {
        return Err(invalid(
            "time_format",
            "Time must be in HH:MM or HH:MM AM/PM format",
        ));
    }
    Ok(())
}

pub fn validate_image_url(url: &str) -> Result<(), ValidationError> {
    if !is_valid_image_url(url) {
        return Err(invalid("image_url", "Please provide a valid image URL"));
    }
    Ok(())
}

pub fn validate_event_mode(mode: &str) -> Result<(), ValidationError> {
    if mode.parse::<EventMode>().is_err() {
        let valid = EventMode::valid_values();
        let mut err = ValidationError::new("event_mode").with_message(Cow::Owned(format!(
            "Invalid event mode. Valid values are: {valid}"
        )));
        err.add_param(Cow::Borrowed("valid_modes"), &valid);
        return Err(err);
    }
    Ok(())
}

/// Surrounding whitespace is ignored; it is stripped when the booking is saved
pub fn validate_email_address(email: &str) -> Result<(), ValidationError> {
    if !email.trim().validate_email() {
        return Err(invalid("email", "Please provide a valid email address"));
    }
    Ok(())
}

/// Every list item must contain a non-whitespace character
pub fn validate_items_not_blank(items: &[String]) -> Result<(), ValidationError> {
    if items.iter().any(|item| item.trim().is_empty()) {
        return Err(invalid("blank_item", "List items cannot be blank"));
    }
    Ok(())
}
