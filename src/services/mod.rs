//! Business logic services

pub mod booking;
pub mod event;
pub mod image;

pub use booking::BookingService;
pub use event::EventService;
pub use image::{CloudinaryImageStore, ImageStore, ImageUploadError};

use thiserror::Error;

use crate::db::StoreError;

/// Errors returned by the event and booking services
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The caller supplied an unacceptable request
    #[error("{0}")]
    InvalidArgument(String),

    /// The referenced record does not exist
    #[error("{0}")]
    NotFound(String),

    /// A uniqueness or referential rule rejected the write
    #[error("{0}")]
    ConstraintViolation(String),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ConstraintViolation(msg) => ServiceError::ConstraintViolation(msg),
            StoreError::NotFound(msg) => ServiceError::NotFound(msg),
            other => ServiceError::Store(other),
        }
    }
}
