//! Event data model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::normalize::{generate_slug, normalize_date, normalize_time};
use crate::utils::validation::{
    validate_date, validate_event_mode, validate_image_url, validate_items_not_blank,
    validate_not_blank, validate_time,
};

/// How an event is attended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventMode {
    Online,
    Offline,
    Hybrid,
}

impl EventMode {
    pub const ALL: [EventMode; 3] = [EventMode::Online, EventMode::Offline, EventMode::Hybrid];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventMode::Online => "ONLINE",
            EventMode::Offline => "OFFLINE",
            EventMode::Hybrid => "HYBRID",
        }
    }

    /// Comma separated list of accepted values, for error messages
    pub fn valid_values() -> String {
        Self::ALL
            .iter()
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for EventMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown event mode
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid event mode '{0}'")]
pub struct UnknownEventMode(pub String);

impl FromStr for EventMode {
    type Err = UnknownEventMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s.trim())
            .ok_or_else(|| UnknownEventMode(s.to_string()))
    }
}

/// A persisted or candidate event record.
///
/// `id`, `slug` and the timestamps are absent until the record has been
/// written to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Option<i64>,
    pub title: String,
    pub slug: Option<String>,
    pub description: String,
    pub overview: String,
    pub image: String,
    pub venue: String,
    pub location: String,
    pub date: String,
    pub time: String,
    pub mode: EventMode,
    pub audience: String,
    pub agenda: Vec<String>,
    pub organizer: String,
    pub tags: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Event {
    /// Bring derived and canonical fields up to date before a write.
    ///
    /// The slug is only generated when absent or blank; an existing slug is
    /// kept even if the title changed.
    pub fn normalize(&mut self) {
        if self.slug.as_deref().map_or(true, |s| s.trim().is_empty()) {
            self.slug = Some(generate_slug(&self.title));
        }
        self.date = normalize_date(&self.date);
        self.time = normalize_time(&self.time);
    }

    /// Copy every mutable field (`title` through `tags`) from `patch`,
    /// leaving identity, slug and timestamps untouched.
    pub fn apply_patch(&mut self, patch: Event) {
        self.title = patch.title;
        self.description = patch.description;
        self.overview = patch.overview;
        self.image = patch.image;
        self.venue = patch.venue;
        self.location = patch.location;
        self.date = patch.date;
        self.time = patch.time;
        self.mode = patch.mode;
        self.audience = patch.audience;
        self.agenda = patch.agenda;
        self.organizer = patch.organizer;
        self.tags = patch.tags;
    }
}

/// Event payload exchanged over the API.
///
/// Used as the response body for every event endpoint and as the request
/// body of `PUT /events/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EventDto {
    #[serde(default)]
    pub id: Option<i64>,

    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 100, message = "Title cannot exceed 100 characters")
    )]
    pub title: String,

    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 1000, message = "Description cannot exceed 1000 characters")
    )]
    pub description: String,

    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 500, message = "Overview cannot exceed 500 characters")
    )]
    pub overview: String,

    #[validate(custom(function = "validate_image_url"))]
    pub image: String,

    #[validate(custom(function = "validate_not_blank"))]
    pub venue: String,

    #[validate(custom(function = "validate_not_blank"))]
    pub location: String,

    #[validate(custom(function = "validate_date"))]
    pub date: String,

    #[validate(custom(function = "validate_time"))]
    pub time: String,

    pub mode: EventMode,

    #[validate(custom(function = "validate_not_blank"))]
    pub audience: String,

    #[validate(
        length(min = 1, message = "At least one agenda item is required"),
        custom(function = "validate_items_not_blank")
    )]
    pub agenda: Vec<String>,

    #[validate(custom(function = "validate_not_blank"))]
    pub organizer: String,

    #[validate(
        length(
            min = 1,
            max = 10,
            message = "At least one tag is required, maximum 10 tags allowed"
        ),
        custom(function = "validate_items_not_blank")
    )]
    pub tags: Vec<String>,

    #[serde(default)]
    pub slug: Option<String>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Event> for EventDto {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            title: event.title,
            description: event.description,
            overview: event.overview,
            image: event.image,
            venue: event.venue,
            location: event.location,
            date: event.date,
            time: event.time,
            mode: event.mode,
            audience: event.audience,
            agenda: event.agenda,
            organizer: event.organizer,
            tags: event.tags,
            slug: event.slug,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

impl From<EventDto> for Event {
    fn from(dto: EventDto) -> Self {
        Self {
            id: dto.id,
            title: dto.title,
            slug: dto.slug,
            description: dto.description,
            overview: dto.overview,
            image: dto.image,
            venue: dto.venue,
            location: dto.location,
            date: dto.date,
            time: dto.time,
            mode: dto.mode,
            audience: dto.audience,
            agenda: dto.agenda,
            organizer: dto.organizer,
            tags: dto.tags,
            created_at: dto.created_at,
            updated_at: dto.updated_at,
        }
    }
}

/// Text fields of the multipart `POST /events` form.
///
/// The image arrives as a separate file part and is uploaded before the
/// event candidate is built, so it is not part of this struct.
#[derive(Debug, Clone, Default, Validate)]
pub struct CreateEventForm {
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 100, message = "Title cannot exceed 100 characters")
    )]
    pub title: String,

    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 1000, message = "Description cannot exceed 1000 characters")
    )]
    pub description: String,

    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 500, message = "Overview cannot exceed 500 characters")
    )]
    pub overview: String,

    #[validate(custom(function = "validate_not_blank"))]
    pub venue: String,

    #[validate(custom(function = "validate_not_blank"))]
    pub location: String,

    #[validate(custom(function = "validate_date"))]
    pub date: String,

    #[validate(custom(function = "validate_time"))]
    pub time: String,

    #[validate(custom(function = "validate_event_mode"))]
    pub mode: String,

    #[validate(custom(function = "validate_not_blank"))]
    pub audience: String,

    #[validate(
        length(min = 1, message = "At least one agenda item is required"),
        custom(function = "validate_items_not_blank")
    )]
    pub agenda: Vec<String>,

    #[validate(custom(function = "validate_not_blank"))]
    pub organizer: String,

    #[validate(
        length(
            min = 1,
            max = 10,
            message = "At least one tag is required, maximum 10 tags allowed"
        ),
        custom(function = "validate_items_not_blank")
    )]
    pub tags: Vec<String>,
}

/// Split a comma-joined form value into trimmed items
fn split_list(value: &str) -> impl Iterator<Item = String> + '_ {
    value.split(',').map(|item| item.trim().to_string())
}

impl CreateEventForm {
    /// Record one form field. Unknown field names are ignored.
    ///
    /// `agenda` and `tags` may be repeated, and each value is also split
    /// on commas.
    pub fn set_field(&mut self, name: &str, value: String) {
        match name {
            "title" => self.title = value,
            "description" => self.description = value,
            "overview" => self.overview = value,
            "venue" => self.venue = value,
            "location" => self.location = value,
            "date" => self.date = value,
            "time" => self.time = value,
            "mode" => self.mode = value,
            "audience" => self.audience = value,
            "organizer" => self.organizer = value,
            "agenda" => self.agenda.extend(split_list(&value)),
            "tags" => self.tags.extend(split_list(&value)),
            _ => {}
        }
    }

    /// Build the event candidate once the image has been uploaded.
    ///
    /// Call after [`Validate::validate`]; an unparseable mode is reported
    /// as an error rather than defaulted.
    pub fn into_event(self, image: String) -> Result<Event, UnknownEventMode> {
        let mode = self.mode.parse()?;
        Ok(Event {
            id: None,
            title: self.title,
            slug: None,
            description: self.description,
            overview: self.overview,
            image,
            venue: self.venue,
            location: self.location,
            date: self.date,
            time: self.time,
            mode,
            audience: self.audience,
            agenda: self.agenda,
            organizer: self.organizer,
            tags: self.tags,
            created_at: None,
            updated_at: None,
        })
    }
}
