//! `YouTube` Data API client (metadata-only `videos.insert`).

use crate::constants::google;
use crate::error::{RelayError, Result};
use crate::providers::{VideoMetadata, VideoPublisher};
use reqwest::Client;
use serde_json::Value;

/// `YouTube` client acting with the caller's access token.
///
/// The relay holds no `YouTube` credentials of its own.
#[derive(Clone, Debug)]
pub struct YouTubeClient {
    http_client: Client,
    upload_url: String,
}

impl YouTubeClient {
    /// Client against the production `videos.insert` endpoint.
    #[must_use]
    pub fn new() -> Self {
        Self {
            http_client: Client::new(),
            upload_url: google::YOUTUBE_UPLOAD_URL.to_string(),
        }
    }

    /// Override the insert endpoint.
    #[must_use]
    pub fn with_upload_url(mut self, url: impl Into<String>) -> Self {
        self.upload_url = url.into();
        self
    }

    /// Use a custom HTTP client.
    #[must_use]
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http_client = client;
        self
    }
}

impl Default for YouTubeClient {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoPublisher for YouTubeClient {
    async fn insert_video(&self, access_token: &str, metadata: &VideoMetadata) -> Result<Value> {
        let response = self
            .http_client
            .post(&self.upload_url)
            .bearer_auth(access_token)
            .json(metadata)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "YouTube endpoint unreachable");
                RelayError::VideoUploadFailed(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %error_body, "YouTube video insert failed");
            return Err(RelayError::VideoUploadFailed(format!(
                "videos.insert returned {status}"
            )));
        }

        response.json::<Value>().await.map_err(|e| {
            tracing::error!(error = %e, "YouTube response malformed");
            RelayError::VideoUploadFailed(e.to_string())
        })
    }
}
