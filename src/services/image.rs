//! Image hosting
//!
//! Event posters are uploaded to Cloudinary before the event is stored;
//! only the returned URL is persisted.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::CloudinaryConfig;

/// Failure while handing an image to the image host
#[derive(Debug, Error)]
pub enum ImageUploadError {
    #[error("Image upload request failed: {0}")]
    Request(String),

    #[error("Image host returned status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Unexpected image host response: {0}")]
    InvalidResponse(String),
}

/// Stores binary images and hands back a public URL
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn upload(&self, bytes: Vec<u8>, file_name: &str) -> Result<String, ImageUploadError>;
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

/// Signed uploads to the Cloudinary upload API
#[derive(Clone)]
pub struct CloudinaryImageStore {
    client: Client,
    upload_url: String,
    api_key: String,
    api_secret: String,
    folder: String,
}

impl CloudinaryImageStore {
    pub fn new(config: &CloudinaryConfig) -> Result<Self, ImageUploadError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ImageUploadError::Request(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            upload_url: format!(
                "{}/v1_1/{}/auto/upload",
                config.base_url.trim_end_matches('/'),
                config.cloud_name
            ),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            folder: config.folder.clone(),
        })
    }

    /// Sign the upload parameters: sorted `key=value` pairs joined by `&`,
    /// followed by the API secret, hashed with SHA-256
    fn sign(&self, params: &[(&str, &str)]) -> String {
        let mut sorted = params.to_vec();
        sorted.sort_by(|a, b| a.0.cmp(b.0));

        let to_sign = sorted
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");

        hex::encode(Sha256::digest(format!("{to_sign}{}", self.api_secret)))
    }
}

#[async_trait]
impl ImageStore for CloudinaryImageStore {
    async fn upload(&self, bytes: Vec<u8>, file_name: &str) -> Result<String, ImageUploadError> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = self.sign(&[("folder", &self.folder), ("timestamp", &timestamp)]);

        let size = bytes.len();
        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(file_name.to_string()))
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", self.folder.clone())
            .text("signature_algorithm", "sha256")
            .text("signature", signature);

        debug!(file_name, size, "Uploading image");

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ImageUploadError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Image upload rejected");
            return Err(ImageUploadError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| ImageUploadError::InvalidResponse(e.to_string()))?;

        Ok(uploaded.secure_url)
    }
}
