//! Event repository

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;

use sqlx::SqliteConnection;

use super::{parse_db_timestamp, DbPool, StoreError};
use crate::models::{Event, EventMode};

/// Persistence contract for events
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Insert when `event.id` is `None`, update otherwise; returns the stored record
    async fn save(&self, event: Event) -> Result<Event, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Event>, StoreError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Event>, StoreError>;

    /// All events ordered by id
    async fn find_all(&self) -> Result<Vec<Event>, StoreError>;

    /// Exact, case-sensitive title match
    async fn exists_by_title(&self, title: &str) -> Result<bool, StoreError>;

    async fn exists_by_slug(&self, slug: &str) -> Result<bool, StoreError>;

    /// Returns `false` when nothing was deleted
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;
}

#[derive(Debug, sqlx::FromRow)]
struct EventRow {
    id: i64,
    title: String,
    slug: String,
    description: String,
    overview: String,
    image: String,
    venue: String,
    location: String,
    date: String,
    time: String,
    mode: String,
    audience: String,
    organizer: String,
    created_at: String,
    updated_at: String,
}

impl EventRow {
    fn into_event(self, agenda: Vec<String>, tags: Vec<String>) -> Result<Event, StoreError> {
        let mode = self
            .mode
            .parse::<EventMode>()
            .map_err(|e| StoreError::InvalidRecord(e.to_string()))?;

        Ok(Event {
            id: Some(self.id),
            title: self.title,
            slug: Some(self.slug),
            description: self.description,
            overview: self.overview,
            image: self.image,
            venue: self.venue,
            location: self.location,
            date: self.date,
            time: self.time,
            mode,
            audience: self.audience,
            agenda,
            organizer: self.organizer,
            tags,
            created_at: Some(parse_db_timestamp(&self.created_at)?),
            updated_at: Some(parse_db_timestamp(&self.updated_at)?),
        })
    }
}

const SELECT_EVENT: &str = r#"
    SELECT id, title, slug, description, overview, image, venue, location,
           date, time, mode, audience, organizer, created_at, updated_at
    FROM events
"#;

/// SQLite-backed [`EventStore`]
#[derive(Clone)]
pub struct SqliteEventStore {
    pool: DbPool,
}

impl SqliteEventStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Agenda items and tags of one event, in position order
async fn load_collections(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<(Vec<String>, Vec<String>), StoreError> {
    let agenda = sqlx::query_scalar(
        "SELECT agenda_item FROM event_agenda WHERE event_id = ? ORDER BY position",
    )
    .bind(id)
    .fetch_all(&mut *conn)
    .await?;

    let tags = sqlx::query_scalar("SELECT tag FROM event_tags WHERE event_id = ? ORDER BY position")
        .bind(id)
        .fetch_all(&mut *conn)
        .await?;

    Ok((agenda, tags))
}

/// Attach the collections of `row`, read on the same connection
async fn hydrate(
    conn: &mut SqliteConnection,
    row: Option<EventRow>,
) -> Result<Option<Event>, StoreError> {
    match row {
        Some(row) => {
            let (agenda, tags) = load_collections(conn, row.id).await?;
            row.into_event(agenda, tags).map(Some)
        }
        None => Ok(None),
    }
}

/// Group `(event_id, value)` pairs, keeping their query order
fn group_by_event(pairs: Vec<(i64, String)>) -> HashMap<i64, Vec<String>> {
    let mut grouped: HashMap<i64, Vec<String>> = HashMap::new();
    for (event_id, value) in pairs {
        grouped.entry(event_id).or_default().push(value);
    }
    grouped
}

#[async_trait]
impl EventStore for SqliteEventStore {
    async fn save(&self, mut event: Event) -> Result<Event, StoreError> {
        event.normalize();
        let slug = event.slug.clone().unwrap_or_default();
        let now = Utc::now();
        let now_str = now.to_rfc3339();

        let mut tx = self.pool.begin().await?;

        let (id, created_at) = match event.id {
            None => {
                let id: i64 = sqlx::query_scalar(
                    r#"
                    INSERT INTO events (title, slug, description, overview, image, venue,
                                        location, date, time, mode, audience, organizer,
                                        created_at, updated_at)
                    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                    RETURNING id
                    "#,
                )
                .bind(&event.title)
                .bind(&slug)
                .bind(&event.description)
                .bind(&event.overview)
                .bind(&event.image)
                .bind(&event.venue)
                .bind(&event.location)
                .bind(&event.date)
                .bind(&event.time)
                .bind(event.mode.as_str())
                .bind(&event.audience)
                .bind(&event.organizer)
                .bind(&now_str)
                .bind(&now_str)
                .fetch_one(&mut *tx)
                .await?;
                (id, now)
            }
            Some(id) => {
                let created: Option<String> = sqlx::query_scalar(
                    r#"
                    UPDATE events
                    SET title = ?, slug = ?, description = ?, overview = ?, image = ?,
                        venue = ?, location = ?, date = ?, time = ?, mode = ?,
                        audience = ?, organizer = ?, updated_at = ?
                    WHERE id = ?
                    RETURNING created_at
                    "#,
                )
                .bind(&event.title)
                .bind(&slug)
                .bind(&event.description)
                .bind(&event.overview)
                .bind(&event.image)
                .bind(&event.venue)
                .bind(&event.location)
                .bind(&event.date)
                .bind(&event.time)
                .bind(event.mode.as_str())
                .bind(&event.audience)
                .bind(&event.organizer)
                .bind(&now_str)
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

                let created = created
                    .ok_or_else(|| StoreError::NotFound(format!("Event with id: {id} not found")))?;
                (id, parse_db_timestamp(&created)?)
            }
        };

        sqlx::query("DELETE FROM event_agenda WHERE event_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        for (position, item) in event.agenda.iter().enumerate() {
            sqlx::query("INSERT INTO event_agenda (event_id, position, agenda_item) VALUES (?, ?, ?)")
                .bind(id)
                .bind(position as i64)
                .bind(item)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query("DELETE FROM event_tags WHERE event_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        for (position, tag) in event.tags.iter().enumerate() {
            sqlx::query("INSERT INTO event_tags (event_id, position, tag) VALUES (?, ?, ?)")
                .bind(id)
                .bind(position as i64)
                .bind(tag)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        event.id = Some(id);
        event.created_at = Some(created_at);
        event.updated_at = Some(now);
        Ok(event)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Event>, StoreError> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query_as::<_, EventRow>(&format!("{SELECT_EVENT} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let event = hydrate(&mut *tx, row).await?;
        tx.commit().await?;
        Ok(event)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Event>, StoreError> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query_as::<_, EventRow>(&format!("{SELECT_EVENT} WHERE slug = ?"))
            .bind(slug)
            .fetch_optional(&mut *tx)
            .await?;
        let event = hydrate(&mut *tx, row).await?;
        tx.commit().await?;
        Ok(event)
    }

    async fn find_all(&self) -> Result<Vec<Event>, StoreError> {
        // One snapshot for rows and collections
        let mut tx = self.pool.begin().await?;
        let rows = sqlx::query_as::<_, EventRow>(&format!("{SELECT_EVENT} ORDER BY id"))
            .fetch_all(&mut *tx)
            .await?;

        let mut agenda = group_by_event(
            sqlx::query_as(
                "SELECT event_id, agenda_item FROM event_agenda ORDER BY event_id, position",
            )
            .fetch_all(&mut *tx)
            .await?,
        );
        let mut tags = group_by_event(
            sqlx::query_as("SELECT event_id, tag FROM event_tags ORDER BY event_id, position")
                .fetch_all(&mut *tx)
                .await?,
        );
        tx.commit().await?;

        rows.into_iter()
            .map(|row| {
                let id = row.id;
                row.into_event(
                    agenda.remove(&id).unwrap_or_default(),
                    tags.remove(&id).unwrap_or_default(),
                )
            })
            .collect()
    }

    async fn exists_by_title(&self, title: &str) -> Result<bool, StoreError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM events WHERE title = ?)")
            .bind(title)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn exists_by_slug(&self, slug: &str) -> Result<bool, StoreError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM events WHERE slug = ?)")
            .bind(slug)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
