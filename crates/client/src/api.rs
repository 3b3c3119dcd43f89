//! HTTP client for the StoryVisualizer API.
//!
//! [`StoryGenerator`] is the seam the session talks to; [`StoryApi`] is its
//! `reqwest` implementation against `POST /api/generate-story`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use storyviz_core::story::{GenerateStoryResponse, Scene, StoryRequest};

use crate::error::ClientError;
use crate::export::gallery_entries;

/// Anything that can turn a request into scenes.
#[async_trait]
pub trait StoryGenerator: Send + Sync {
    async fn generate(&self, request: &StoryRequest) -> Result<Vec<Scene>, ClientError>;
}

/// HTTP client for a StoryVisualizer server.
pub struct StoryApi {
    client: reqwest::Client,
    base_url: String,
}

impl StoryApi {
    /// Create a new API client.
    ///
    /// * `base_url` - Server origin, e.g. `http://localhost:8080`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a server-relative path such as a scene's `imageUrl`.
    /// Absolute URLs pass through unchanged.
    pub fn resolve(&self, path_or_url: &str) -> String {
        if path_or_url.starts_with("http://") || path_or_url.starts_with("https://") {
            path_or_url.to_string()
        } else {
            format!("{}/{}", self.base_url, path_or_url.trim_start_matches('/'))
        }
    }

    /// Download every scene image into `dir` as `scene-{n}.png`.
    ///
    /// Creates `dir` if needed and returns the written paths in scene order.
    /// Stops at the first failed download.
    pub async fn download_gallery(
        &self,
        scenes: &[Scene],
        dir: &Path,
    ) -> Result<Vec<PathBuf>, ClientError> {
        tokio::fs::create_dir_all(dir).await?;

        let mut written = Vec::with_capacity(scenes.len());
        for entry in gallery_entries(scenes) {
            let url = self.resolve(&entry.url);
            let response = self.client.get(&url).send().await?;
            let response = Self::check_status(response).await?;
            let bytes = response.bytes().await?;

            let path = dir.join(&entry.file_name);
            tokio::fs::write(&path, &bytes).await?;
            tracing::debug!(
                url = %url,
                path = %path.display(),
                size = bytes.len(),
                "Saved gallery image"
            );
            written.push(path);
        }

        Ok(written)
    }

    /// Pass 2xx responses through; turn anything else into
    /// [`ClientError::Api`] carrying the body.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl StoryGenerator for StoryApi {
    async fn generate(&self, request: &StoryRequest) -> Result<Vec<Scene>, ClientError> {
        let response = self
            .client
            .post(format!("{}/api/generate-story", self.base_url))
            .json(request)
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        let story: GenerateStoryResponse = response.json().await?;

        tracing::debug!(scenes = story.scenes.len(), "Received story");
        Ok(story.scenes)
    }
}
