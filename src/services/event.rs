//! Event service
//!
//! Business rules for creating, reading, updating and deleting events on
//! top of an [`EventStore`].

use std::sync::Arc;

use tracing::{debug, info};

use super::ServiceError;
use crate::db::EventStore;
use crate::models::Event;

/// Event use cases
#[derive(Clone)]
pub struct EventService {
    store: Arc<dyn EventStore>,
}

impl EventService {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    /// Persist a new event after checking that its title is free
    pub async fn create_event(&self, mut candidate: Event) -> Result<Event, ServiceError> {
        if candidate.id.is_some() {
            return Err(ServiceError::InvalidArgument(
                "Event id must not be provided".to_string(),
            ));
        }

        if self.store.exists_by_title(&candidate.title).await? {
            return Err(ServiceError::InvalidArgument(
                "This event already exists".to_string(),
            ));
        }

        candidate.normalize();
        let event = self.store.save(candidate).await?;

        info!(event_id = ?event.id, slug = ?event.slug, "Event created");
        Ok(event)
    }

    pub async fn get_event_by_id(&self, id: i64) -> Result<Event, ServiceError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_by_id(id))
    }

    pub async fn get_event_by_slug(&self, slug: &str) -> Result<Event, ServiceError> {
        self.store.find_by_slug(slug).await?.ok_or_else(|| {
            ServiceError::NotFound(format!("Event with slug: {slug} does not exist"))
        })
    }

    pub async fn get_all_events(&self) -> Result<Vec<Event>, ServiceError> {
        let events = self.store.find_all().await?;
        debug!(count = events.len(), "Listed events");
        Ok(events)
    }

    /// Overwrite the mutable fields of an existing event.
    ///
    /// The slug and creation time are kept. Title uniqueness is left to the
    /// store, so a clash with another event surfaces as a constraint
    /// violation.
    pub async fn update_event(&self, id: i64, patch: Event) -> Result<Event, ServiceError> {
        let mut existing = self.get_event_by_id(id).await?;

        existing.apply_patch(patch);
        existing.normalize();
        let event = self.store.save(existing).await?;

        info!(event_id = id, "Event updated");
        Ok(event)
    }

    /// Delete an event together with its bookings
    pub async fn delete_event(&self, id: i64) -> Result<(), ServiceError> {
        if !self.store.delete(id).await? {
            return Err(not_found_by_id(id));
        }

        info!(event_id = id, "Event deleted");
        Ok(())
    }
}

pub(crate) fn not_found_by_id(id: i64) -> ServiceError {
    ServiceError::NotFound(format!("Event with id: {id} not found"))
}
