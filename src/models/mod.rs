//! Data models

mod booking;
mod event;

pub use booking::*;
pub use event::*;
