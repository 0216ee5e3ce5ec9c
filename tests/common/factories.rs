//! Test factories for generating test data
//!
//! Factories create randomized but valid payloads so tests do not collide
//! on unique titles or emails.

use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::{Sentence, Words};
use fake::Fake;
use serde_json::json;

use devevent_api::models::{Event, EventMode};

/// Builder for event payloads in both multipart and JSON form
#[derive(Debug, Clone)]
pub struct EventFactory {
    pub title: String,
    pub description: String,
    pub overview: String,
    pub image: String,
    pub venue: String,
    pub location: String,
    pub date: String,
    pub time: String,
    pub mode: String,
    pub audience: String,
    pub agenda: Vec<String>,
    pub organizer: String,
    pub tags: Vec<String>,
}

impl Default for EventFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl EventFactory {
    /// A valid event with a random title
    pub fn new() -> Self {
        let words: Vec<String> = Words(3..5).fake();
        Self::titled(&format!("{} {}", words.join(" "), uuid::Uuid::new_v4().simple()))
    }

    /// A valid event with a fixed title
    pub fn titled(title: &str) -> Self {
        Self {
            title: title.to_string(),
            description: Sentence(5..10).fake(),
            overview: Sentence(3..6).fake(),
            image: "https://res.cloudinary.com/test/image/upload/events/poster.png".to_string(),
            venue: "Moscone Center".to_string(),
            location: "San Francisco, CA".to_string(),
            date: "2025-11-20".to_string(),
            time: "09:30".to_string(),
            mode: "HYBRID".to_string(),
            audience: "Developers".to_string(),
            agenda: vec!["Registration".to_string(), "Keynote".to_string()],
            organizer: "DevEvents".to_string(),
            tags: vec!["rust".to_string(), "web".to_string()],
        }
    }

    pub fn with_date(mut self, date: &str) -> Self {
        self.date = date.to_string();
        self
    }

    pub fn with_time(mut self, time: &str) -> Self {
        self.time = time.to_string();
        self
    }

    pub fn with_mode(mut self, mode: &str) -> Self {
        self.mode = mode.to_string();
        self
    }

    pub fn with_agenda(mut self, agenda: &[&str]) -> Self {
        self.agenda = agenda.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Text parts of the multipart create form, without the image
    pub fn form_fields(&self) -> Vec<(&str, &str)> {
        let mut fields = vec![
            ("title", self.title.as_str()),
            ("description", self.description.as_str()),
            ("overview", self.overview.as_str()),
            ("venue", self.venue.as_str()),
            ("location", self.location.as_str()),
            ("date", self.date.as_str()),
            ("time", self.time.as_str()),
            ("mode", self.mode.as_str()),
            ("audience", self.audience.as_str()),
            ("organizer", self.organizer.as_str()),
        ];
        fields.extend(self.agenda.iter().map(|item| ("agenda", item.as_str())));
        fields.extend(self.tags.iter().map(|tag| ("tags", tag.as_str())));
        fields
    }

    /// JSON body for `PUT /events/{id}`
    pub fn json(&self) -> serde_json::Value {
        json!({
            "title": self.title,
            "description": self.description,
            "overview": self.overview,
            "image": self.image,
            "venue": self.venue,
            "location": self.location,
            "date": self.date,
            "time": self.time,
            "mode": self.mode,
            "audience": self.audience,
            "agenda": self.agenda,
            "organizer": self.organizer,
            "tags": self.tags,
        })
    }

    /// Unsaved domain event
    pub fn event(&self) -> Event {
        Event {
            id: None,
            title: self.title.clone(),
            slug: None,
            description: self.description.clone(),
            overview: self.overview.clone(),
            image: self.image.clone(),
            venue: self.venue.clone(),
            location: self.location.clone(),
            date: self.date.clone(),
            time: self.time.clone(),
            mode: self.mode.parse().unwrap_or(EventMode::Hybrid),
            audience: self.audience.clone(),
            agenda: self.agenda.clone(),
            organizer: self.organizer.clone(),
            tags: self.tags.clone(),
            created_at: None,
            updated_at: None,
        }
    }
}

/// A random, well-formed email address
pub fn fake_email() -> String {
    SafeEmail().fake()
}
