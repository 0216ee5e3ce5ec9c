//! Cloudinary client tests against a mock server

use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use devevent_api::config::CloudinaryConfig;
use devevent_api::services::{CloudinaryImageStore, ImageStore, ImageUploadError};

/// Plain-text stand-in for image bytes so body matchers see the whole form
const POSTER: &[u8] = b"poster-bytes";

fn store_for(server: &MockServer) -> CloudinaryImageStore {
    let mut config = CloudinaryConfig::new("demo", "123456", "shh");
    config.base_url = server.uri();
    CloudinaryImageStore::new(&config).unwrap()
}

#[tokio::test]
async fn test_upload_returns_secure_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1_1/demo/auto/upload"))
        .and(body_string_contains("name=\"folder\""))
        .and(body_string_contains("name=\"signature\""))
        .and(body_string_contains("sha256"))
        .and(body_string_contains("filename=\"poster.png\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "public_id": "events/poster",
            "secure_url": "https://res.cloudinary.com/demo/image/upload/events/poster.png",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let url = store_for(&server)
        .upload(POSTER.to_vec(), "poster.png")
        .await
        .unwrap();

    assert_eq!(
        url,
        "https://res.cloudinary.com/demo/image/upload/events/poster.png"
    );
}

#[tokio::test]
async fn test_rejected_upload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid Signature"))
        .mount(&server)
        .await;

    let err = store_for(&server)
        .upload(POSTER.to_vec(), "poster.png")
        .await
        .unwrap_err();

    match err {
        ImageUploadError::Rejected { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "Invalid Signature");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_response_without_secure_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "ok": true })))
        .mount(&server)
        .await;

    let err = store_for(&server)
        .upload(POSTER.to_vec(), "poster.png")
        .await
        .unwrap_err();
    assert!(matches!(err, ImageUploadError::InvalidResponse(_)));
}
