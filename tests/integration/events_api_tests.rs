//! Event API integration tests

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::Value;

use crate::common::{EventFactory, TestApp, PNG_BYTES};

async fn create(app: &TestApp, factory: &EventFactory) -> Value {
    let response = app
        .post_multipart(
            "/api/v1/events",
            &factory.form_fields(),
            Some(("poster.png", PNG_BYTES)),
        )
        .await;
    response.assert_created();
    response.json()
}

#[tokio::test]
async fn test_create_event_normalizes_fields() {
    let app = TestApp::new().await;
    let factory = EventFactory::titled("Rust & WebAssembly: 2025 Summit!")
        .with_date("2025-03-09")
        .with_time("2:30 PM");

    let event = create(&app, &factory).await;

    assert!(event["id"].as_i64().is_some());
    assert_eq!(event["slug"], "rust-webassembly-2025-summit");
    assert_eq!(event["date"], "2025-03-09");
    assert_eq!(event["time"], "14:30");
    assert_eq!(event["mode"], "HYBRID");
    assert_eq!(event["agenda"], serde_json::json!(["Registration", "Keynote"]));
    assert!(event["createdAt"].is_string());
    assert_eq!(event["createdAt"], event["updatedAt"]);
    assert!(event["image"]
        .as_str()
        .unwrap()
        .starts_with("https://res.cloudinary.com/test/"));

    let uploads = app.images.as_ref().unwrap().uploads();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].file_name, "poster.png");
    assert_eq!(uploads[0].size, PNG_BYTES.len());
}

#[tokio::test]
async fn test_created_event_is_readable_by_id_slug_and_list() {
    let app = TestApp::new().await;
    let event = create(&app, &EventFactory::titled("Readable Event")).await;
    let id = event["id"].as_i64().unwrap();

    let by_id: Value = app.get(&format!("/api/v1/events/{id}")).await.assert_ok().json();
    assert_eq!(by_id, event);

    let by_slug: Value = app
        .get("/api/v1/events/slug/readable-event")
        .await
        .assert_ok()
        .json();
    assert_eq!(by_slug["id"], id);

    let all: Vec<Value> = app.get("/api/v1/events").await.assert_ok().json();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0]["title"], "Readable Event");
}

#[tokio::test]
async fn test_comma_separated_agenda_is_split() {
    let app = TestApp::new().await;
    let factory = EventFactory::new().with_agenda(&["Talks, Networking", "Closing"]);

    let event = create(&app, &factory).await;
    assert_eq!(
        event["agenda"],
        serde_json::json!(["Talks", "Networking", "Closing"])
    );
}

#[tokio::test]
async fn test_comma_separated_tags_are_split() {
    let app = TestApp::new().await;
    let factory = EventFactory::new().with_tags(&["rust, async", "tokio"]);

    let event = create(&app, &factory).await;
    assert_eq!(event["tags"], serde_json::json!(["rust", "async", "tokio"]));
}

#[tokio::test]
async fn test_duplicate_title_is_rejected() {
    let app = TestApp::new().await;
    let factory = EventFactory::titled("Only Once");
    create(&app, &factory).await;

    app.post_multipart(
        "/api/v1/events",
        &factory.form_fields(),
        Some(("poster.png", PNG_BYTES)),
    )
    .await
    .assert_bad_request()
    .assert_message_contains("This event already exists");

    let all: Vec<Value> = app.get("/api/v1/events").await.json();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn test_title_differing_only_in_case_is_a_slug_conflict() {
    let app = TestApp::new().await;
    create(&app, &EventFactory::titled("Case Study")).await;

    app.post_multipart(
        "/api/v1/events",
        &EventFactory::titled("case study").form_fields(),
        Some(("poster.png", PNG_BYTES)),
    )
    .await
    .assert_conflict()
    .assert_message_contains("slug");
}

#[tokio::test]
async fn test_create_requires_image_file() {
    let app = TestApp::new().await;

    app.post_multipart("/api/v1/events", &EventFactory::new().form_fields(), None)
        .await
        .assert_bad_request()
        .assert_message_contains("imageFile is required");
}

#[tokio::test]
async fn test_create_validates_fields() {
    let app = TestApp::new().await;
    let long_title = "x".repeat(101);
    let mut factory = EventFactory::titled(&long_title)
        .with_date("09/03/2025")
        .with_time("25:00")
        .with_tags(&[]);
    factory.venue = "   ".to_string();

    let response = app
        .post_multipart(
            "/api/v1/events",
            &factory.form_fields(),
            Some(("poster.png", PNG_BYTES)),
        )
        .await;
    response.assert_bad_request();

    let body: Value = response.json();
    assert_eq!(body["error"], "validation_error");
    let errors = &body["details"]["errors"];
    for field in ["title", "date", "time", "tags", "venue"] {
        assert!(errors.get(field).is_some(), "missing error for {field}: {body}");
    }
    assert!(app.images.as_ref().unwrap().uploads().is_empty());
}

#[tokio::test]
async fn test_unknown_mode_lists_valid_values() {
    let app = TestApp::new().await;

    let response = app
        .post_multipart(
            "/api/v1/events",
            &EventFactory::new().with_mode("virtual").form_fields(),
            Some(("poster.png", PNG_BYTES)),
        )
        .await;
    response.assert_bad_request();
    assert!(response.text().contains("ONLINE, OFFLINE, HYBRID"));
}

#[tokio::test]
async fn test_image_upload_failure_is_bad_gateway() {
    let app = TestApp::new().await;
    app.images.as_ref().unwrap().fail_uploads();

    app.post_multipart(
        "/api/v1/events",
        &EventFactory::new().form_fields(),
        Some(("poster.png", PNG_BYTES)),
    )
    .await
    .assert_status(StatusCode::BAD_GATEWAY);

    let all: Vec<Value> = app.get("/api/v1/events").await.json();
    assert!(all.is_empty());
}

#[tokio::test]
async fn test_non_image_upload_url_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .post_multipart(
            "/api/v1/events",
            &EventFactory::new().form_fields(),
            Some(("brochure.pdf", PNG_BYTES)),
        )
        .await;
    response
        .assert_status(StatusCode::BAD_GATEWAY)
        .assert_message_contains("unsupported image URL");

    let all: Vec<Value> = app.get("/api/v1/events").await.json();
    assert!(all.is_empty());
}

#[tokio::test]
async fn test_create_without_image_store_is_unavailable() {
    let app = TestApp::without_images().await;

    app.post_multipart(
        "/api/v1/events",
        &EventFactory::new().form_fields(),
        Some(("poster.png", PNG_BYTES)),
    )
    .await
    .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_missing_events_are_not_found() {
    let app = TestApp::new().await;

    app.get("/api/v1/events/999")
        .await
        .assert_not_found()
        .assert_message_contains("Event with id: 999 not found");

    app.get("/api/v1/events/slug/no-such-event")
        .await
        .assert_not_found()
        .assert_message_contains("Event with slug: no-such-event does not exist");

    app.put_json("/api/v1/events/999", EventFactory::new().json())
        .await
        .assert_not_found();

    app.delete("/api/v1/events/999").await.assert_not_found();
}

#[tokio::test]
async fn test_non_numeric_id_is_bad_request() {
    let app = TestApp::new().await;
    app.get("/api/v1/events/abc")
        .await
        .assert_bad_request()
        .assert_message_contains("Invalid event ID");
}

#[tokio::test]
async fn test_update_replaces_fields_and_keeps_identity() {
    let app = TestApp::new().await;
    let created = create(&app, &EventFactory::titled("Before Update")).await;
    let id = created["id"].as_i64().unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(20)).await;

    let patch = EventFactory::titled("After Update")
        .with_date("2026-01-02")
        .with_time("12:15 AM")
        .with_mode("ONLINE")
        .with_tags(&["updated"]);
    let updated: Value = app
        .put_json(&format!("/api/v1/events/{id}"), patch.json())
        .await
        .assert_ok()
        .json();

    assert_eq!(updated["id"], id);
    assert_eq!(updated["title"], "After Update");
    assert_eq!(updated["slug"], "before-update");
    assert_eq!(updated["date"], "2026-01-02");
    assert_eq!(updated["time"], "00:15");
    assert_eq!(updated["mode"], "ONLINE");
    assert_eq!(updated["tags"], serde_json::json!(["updated"]));
    assert_eq!(updated["createdAt"], created["createdAt"]);
    assert_ne!(updated["updatedAt"], created["updatedAt"]);

    let stored: Value = app.get(&format!("/api/v1/events/{id}")).await.json();
    assert_eq!(stored, updated);
}

#[tokio::test]
async fn test_update_to_taken_title_is_conflict() {
    let app = TestApp::new().await;
    create(&app, &EventFactory::titled("Taken Title")).await;
    let other = create(&app, &EventFactory::titled("Other Title")).await;

    app.put_json(
        &format!("/api/v1/events/{}", other["id"]),
        EventFactory::titled("Taken Title").json(),
    )
    .await
    .assert_conflict();
}

#[tokio::test]
async fn test_update_validates_body() {
    let app = TestApp::new().await;
    let created = create(&app, &EventFactory::new()).await;
    let uri = format!("/api/v1/events/{}", created["id"]);

    let mut body = EventFactory::new().json();
    body["image"] = "https://example.com/brochure.pdf".into();
    body["agenda"] = serde_json::json!([]);
    let response = app.put_json(&uri, body).await;
    response.assert_bad_request();
    let json: Value = response.json();
    assert!(json["details"]["errors"].get("image").is_some());
    assert!(json["details"]["errors"].get("agenda").is_some());

    let mut body = EventFactory::new().json();
    body["mode"] = "remote".into();
    app.put_json(&uri, body)
        .await
        .assert_bad_request()
        .assert_message_contains("Invalid event mode");
}

#[tokio::test]
async fn test_delete_event() {
    let app = TestApp::new().await;
    let created = create(&app, &EventFactory::new()).await;
    let uri = format!("/api/v1/events/{}", created["id"]);

    app.delete(&uri).await.assert_no_content();
    app.get(&uri).await.assert_not_found();
    app.delete(&uri).await.assert_not_found();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creation_with_same_title() {
    let app = Arc::new(TestApp::new().await);
    let factory = EventFactory::titled("Race Condition Conf");

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let app = app.clone();
            let factory = factory.clone();
            tokio::spawn(async move {
                app.post_multipart(
                    "/api/v1/events",
                    &factory.form_fields(),
                    Some(("poster.png", PNG_BYTES)),
                )
                .await
                .status
            })
        })
        .collect();

    let mut statuses = Vec::new();
    for handle in handles {
        statuses.push(handle.await.unwrap());
    }

    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::CREATED).count(), 1);
    assert!(statuses
        .iter()
        .filter(|s| **s != StatusCode::CREATED)
        .all(|s| *s == StatusCode::BAD_REQUEST || *s == StatusCode::CONFLICT));

    let all: Vec<Value> = app.get("/api/v1/events").await.json();
    assert_eq!(all.len(), 1);
}
