//! Shared utilities: errors, input validation and field normalization

pub mod error;
pub mod normalize;
pub mod validation;

pub use error::{AppError, AppResult, ErrorResponse};
