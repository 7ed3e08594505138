//! Third-party image hosting for event attachments

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::time::Duration;
use tracing::instrument;

use crate::error::{EventError, EventResult};

/// One uploaded file from a multipart request
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Stores an image and returns its public URL
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageHost: Send + Sync {
    async fn upload(&self, image: ImageUpload) -> EventResult<String>;
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
}

/// Unsigned upload to an asset host (Cloudinary-style `upload_preset` API)
#[derive(Clone)]
pub struct HttpImageHost {
    client: reqwest::Client,
    upload_url: String,
    upload_preset: String,
}

impl HttpImageHost {
    pub fn new(
        upload_url: impl Into<String>,
        upload_preset: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: reqwest::Client::builder().timeout(timeout).build()?,
            upload_url: upload_url.into(),
            upload_preset: upload_preset.into(),
        })
    }
}

#[async_trait]
impl ImageHost for HttpImageHost {
    #[instrument(skip(self, image), fields(file_name = %image.file_name, size = image.bytes.len()))]
    async fn upload(&self, image: ImageUpload) -> EventResult<String> {
        let mut part = Part::bytes(image.bytes).file_name(image.file_name);
        if let Some(content_type) = image.content_type {
            part = part
                .mime_str(&content_type)
                .map_err(|e| EventError::Validation(format!("Invalid image content type: {}", e)))?;
        }

        let form = Form::new()
            .text("upload_preset", self.upload_preset.clone())
            .part("file", part);

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| EventError::ImageHost(format!("Image upload failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %body, "Image host rejected upload");
            return Err(EventError::ImageHost(format!(
                "Image upload failed with status {}",
                status
            )));
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| EventError::ImageHost(format!("Invalid image host response: {}", e)))?;

        tracing::info!(url = %uploaded.secure_url, "Image uploaded");
        Ok(uploaded.secure_url)
    }
}
