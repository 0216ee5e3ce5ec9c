//! Common step definitions shared across features

use cucumber::then;

use crate::features::TestWorld;

#[then(expr = "the response status should be {int}")]
async fn response_status(world: &mut TestWorld, status: u16) {
    let response = world.last_response();
    assert_eq!(
        response.status, status,
        "Unexpected status, body: {}",
        response.body
    );
}

#[then(expr = "the error message should contain {string}")]
async fn error_message_contains(world: &mut TestWorld, fragment: String) {
    let message = world.last_response().body["message"]
        .as_str()
        .unwrap_or_default()
        .to_string();
    assert!(
        message.contains(&fragment),
        "Expected {fragment:?} in {message:?}"
    );
}

#[then(expr = "the response field {string} should be {string}")]
async fn response_field(world: &mut TestWorld, field: String, expected: String) {
    let body = &world.last_response().body;
    assert_eq!(body[field.as_str()], expected.as_str(), "Body: {body}");
}
