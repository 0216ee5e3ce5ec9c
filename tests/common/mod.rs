//! Common test utilities and helpers
//!
//! Shared test infrastructure:
//! - Payload factories
//! - Mock image store
//! - API test client over a temporary database

#![allow(dead_code)]

pub mod factories;

pub use factories::*;
pub use mocks::*;
pub use test_app::*;

/// Bytes of a 1x1 PNG, enough to stand in for a poster
pub const PNG_BYTES: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89,
];
