//! Store error types

use thiserror::Error;

/// Errors surfaced by the event and booking stores
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique, foreign-key or check constraint rejected the write
    #[error("{0}")]
    ConstraintViolation(String),

    /// The record to update does not exist
    #[error("{0}")]
    NotFound(String),

    /// A stored row could not be mapped back to a model
    #[error("Invalid stored record: {0}")]
    InvalidRecord(String),

    /// Any other database failure
    #[error("{0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation() {
                    StoreError::ConstraintViolation(unique_violation_message(db_err.message()))
                } else if db_err.is_foreign_key_violation() {
                    StoreError::ConstraintViolation(
                        "Referenced record does not exist".to_string(),
                    )
                } else if db_err.is_check_violation() {
                    StoreError::ConstraintViolation(format!(
                        "Value rejected by the store: {}",
                        db_err.message()
                    ))
                } else {
                    StoreError::Database(db_err.to_string())
                }
            }
            other => StoreError::Database(other.to_string()),
        }
    }
}

/// Turn `UNIQUE constraint failed: events.slug` into a readable message
fn unique_violation_message(raw: &str) -> String {
    let columns: Vec<&str> = raw
        .split_once("UNIQUE constraint failed:")
        .map(|(_, cols)| {
            cols.split(',')
                .filter_map(|c| c.trim().rsplit('.').next())
                .filter(|c| !c.is_empty())
                .collect()
        })
        .unwrap_or_default();

    match columns.as_slice() {
        [] => "A record with the same unique value already exists".to_string(),
        ["event_id", "email"] => "This email has already booked this event".to_string(),
        cols => format!("An event with this {} already exists", cols.join(", ")),
    }
}
