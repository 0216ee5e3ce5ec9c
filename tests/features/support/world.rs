//! Test world for Cucumber scenarios

use std::collections::HashMap;
use std::fmt;

use cucumber::World;
use serde_json::Value;

use crate::common::{EventFactory, TestApp, PNG_BYTES};

/// Test world that maintains state across scenario steps
#[derive(World)]
#[world(init = Self::new)]
pub struct TestWorld {
    /// Application under test, started on first use
    app: Option<TestApp>,

    /// Event being prepared by `Given` steps
    pub draft: Option<EventFactory>,

    /// Ids of events created in this scenario, keyed by the title sent
    pub events: HashMap<String, i64>,

    /// Id of the most recently created booking
    pub last_booking_id: Option<i64>,

    /// Response from last API call
    pub last_response: Option<TestResponse>,
}

#[derive(Debug, Clone)]
pub struct TestResponse {
    pub status: u16,
    pub body: Value,
}

impl fmt::Debug for TestWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestWorld")
            .field("started", &self.app.is_some())
            .field("draft", &self.draft)
            .field("events", &self.events)
            .field("last_booking_id", &self.last_booking_id)
            .field("last_response", &self.last_response)
            .finish()
    }
}

impl TestWorld {
    pub fn new() -> Self {
        Self {
            app: None,
            draft: None,
            events: HashMap::new(),
            last_booking_id: None,
            last_response: None,
        }
    }

    /// The running application
    pub async fn app(&mut self) -> &TestApp {
        if self.app.is_none() {
            self.app = Some(TestApp::new().await);
        }
        self.app.as_ref().expect("app started above")
    }

    /// Submit an event through the multipart create endpoint and remember
    /// its id when it is created
    pub async fn submit_event(&mut self, event: EventFactory) -> &TestResponse {
        let fields = event.form_fields();
        let response = self
            .app()
            .await
            .post_multipart("/api/v1/events", &fields, Some(("poster.png", PNG_BYTES)))
            .await;

        let recorded = Self::record(&response);
        if recorded.status == 201 {
            if let Some(id) = recorded.body["id"].as_i64() {
                self.events.insert(event.title.clone(), id);
            }
        }
        self.last_response = Some(recorded);
        self.last_response()
    }

    pub async fn get(&mut self, uri: &str) -> &TestResponse {
        let response = self.app().await.get(uri).await;
        self.last_response = Some(Self::record(&response));
        self.last_response()
    }

    pub async fn post_json(&mut self, uri: &str, body: Value) -> &TestResponse {
        let response = self.app().await.post_json(uri, body).await;
        self.last_response = Some(Self::record(&response));
        self.last_response()
    }

    pub async fn delete(&mut self, uri: &str) -> &TestResponse {
        let response = self.app().await.delete(uri).await;
        self.last_response = Some(Self::record(&response));
        self.last_response()
    }

    /// Id of an event created earlier in the scenario
    pub fn event_id(&self, title: &str) -> i64 {
        *self
            .events
            .get(title)
            .unwrap_or_else(|| panic!("No event titled {title:?} was created"))
    }

    pub fn last_response(&self) -> &TestResponse {
        self.last_response
            .as_ref()
            .expect("No request has been made yet")
    }

    fn record(response: &crate::common::TestResponse) -> TestResponse {
        let body = if response.body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&response.body).unwrap_or(Value::Null)
        };
        TestResponse {
            status: response.status.as_u16(),
            body,
        }
    }
}
