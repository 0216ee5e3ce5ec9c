//! Booking repository

use async_trait::async_trait;
use chrono::Utc;

use super::{parse_db_timestamp, DbPool, StoreError};
use crate::models::Booking;

/// Persistence contract for bookings
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Insert when `booking.id` is `None`, update otherwise
    async fn save(&self, booking: Booking) -> Result<Booking, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Booking>, StoreError>;

    /// Bookings of one event, oldest first
    async fn find_by_event(&self, event_id: i64) -> Result<Vec<Booking>, StoreError>;

    async fn delete(&self, id: i64) -> Result<bool, StoreError>;
}

#[derive(Debug, sqlx::FromRow)]
struct BookingRow {
    id: i64,
    event_id: i64,
    email: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<BookingRow> for Booking {
    type Error = StoreError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        Ok(Booking {
            id: Some(row.id),
            event_id: row.event_id,
            email: row.email,
            created_at: Some(parse_db_timestamp(&row.created_at)?),
            updated_at: Some(parse_db_timestamp(&row.updated_at)?),
        })
    }
}

/// SQLite-backed [`BookingStore`]
#[derive(Clone)]
pub struct SqliteBookingStore {
    pool: DbPool,
}

impl SqliteBookingStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingStore for SqliteBookingStore {
    async fn save(&self, mut booking: Booking) -> Result<Booking, StoreError> {
        booking.normalize();
        let now = Utc::now();
        let now_str = now.to_rfc3339();

        match booking.id {
            None => {
                let id: i64 = sqlx::query_scalar(
                    r#"
                    INSERT INTO bookings (event_id, email, created_at, updated_at)
                    VALUES (?, ?, ?, ?)
                    RETURNING id
                    "#,
                )
                .bind(booking.event_id)
                .bind(&booking.email)
                .bind(&now_str)
                .bind(&now_str)
                .fetch_one(&self.pool)
                .await?;

                booking.id = Some(id);
                booking.created_at = Some(now);
            }
            Some(id) => {
                let created: Option<String> = sqlx::query_scalar(
                    r#"
                    UPDATE bookings
                    SET event_id = ?, email = ?, updated_at = ?
                    WHERE id = ?
                    RETURNING created_at
                    "#,
                )
                .bind(booking.event_id)
                .bind(&booking.email)
                .bind(&now_str)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

                let created = created
                    .ok_or_else(|| StoreError::NotFound(format!("Booking with id: {id} not found")))?;
                booking.created_at = Some(parse_db_timestamp(&created)?);
            }
        }

        booking.updated_at = Some(now);
        Ok(booking)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Booking>, StoreError> {
        sqlx::query_as::<_, BookingRow>(
            "SELECT id, event_id, email, created_at, updated_at FROM bookings WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(Booking::try_from)
        .transpose()
    }

    async fn find_by_event(&self, event_id: i64) -> Result<Vec<Booking>, StoreError> {
        sqlx::query_as::<_, BookingRow>(
            r#"
            SELECT id, event_id, email, created_at, updated_at
            FROM bookings
            WHERE event_id = ?
            ORDER BY created_at, id
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Booking::try_from)
        .collect()
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
