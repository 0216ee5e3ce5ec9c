//! Schema inspection
//!
//! Migrations are applied by SQLx from the `migrations/` directory during
//! [`init_pool`](super::init_pool). This module reports whether the tables
//! the stores rely on are present.

use anyhow::{Context, Result};
use sqlx::SqlitePool;

/// Tables created by the bundled migrations
pub const REQUIRED_TABLES: [&str; 4] = ["events", "event_agenda", "event_tags", "bookings"];

/// Return the required tables that are missing from the database
pub async fn missing_tables(pool: &SqlitePool) -> Result<Vec<&'static str>> {
    let existing: Vec<String> =
        sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table'")
            .fetch_all(pool)
            .await
            .context("Failed to list tables")?;

    Ok(REQUIRED_TABLES
        .into_iter()
        .filter(|table| !existing.iter().any(|name| name == table))
        .collect())
}
