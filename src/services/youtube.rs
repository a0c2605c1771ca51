//! YouTube upload adapter.

use std::path::Path;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::error::ServiceError;
use super::google_auth::GoogleAuth;
use super::{UploadMetadata, VideoHost};

const UPLOAD_URL: &str = "https://www.googleapis.com/upload/youtube/v3/videos";
const THUMBNAIL_URL: &str = "https://www.googleapis.com/upload/youtube/v3/thumbnails/set";
const CHANNELS_URL: &str = "https://www.googleapis.com/youtube/v3/channels";

#[derive(Clone)]
pub struct YouTubeClient {
    auth: GoogleAuth,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct UploadedVideo {
    id: String,
}

impl YouTubeClient {
    pub fn new(auth: GoogleAuth) -> Self {
        Self {
            auth,
            http: Client::new(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(GoogleAuth::from_env("YOUTUBE"))
    }
}

#[async_trait]
impl VideoHost for YouTubeClient {
    /// Resumable upload: request a session URI with the metadata, then PUT
    /// the file bytes to it.
    async fn upload_video(
        &self,
        path: &Path,
        metadata: &UploadMetadata,
    ) -> Result<String, ServiceError> {
        let token = self.auth.access_token().await?;

        let body = json!({
            "snippet": {
                "title": metadata.title,
                "description": metadata.description,
                "tags": metadata.tags,
                "categoryId": metadata.category_id,
                "defaultLanguage": "en",
                "defaultAudioLanguage": "en",
            },
            "status": {
                "privacyStatus": metadata.privacy_status,
                "selfDeclaredMadeForKids": false,
            },
        });

        let resp = self
            .http
            .post(UPLOAD_URL)
            .query(&[("uploadType", "resumable"), ("part", "snippet,status")])
            .bearer_auth(&token)
            .header("X-Upload-Content-Type", "video/mp4")
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let text = resp.text().await?;
            return Err(ServiceError::Api(format!(
                "YouTube upload init failed: {}",
                text
            )));
        }

        let session_url = resp
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                ServiceError::Api("YouTube upload init returned no session URI".to_string())
            })?
            .to_string();

        let data = tokio::fs::read(path).await?;
        let resp = self
            .http
            .put(&session_url)
            .bearer_auth(&token)
            .header("Content-Type", "video/mp4")
            .body(data)
            .send()
            .await?;

        if !resp.status().is_success() {
            let text = resp.text().await?;
            return Err(ServiceError::Api(format!("YouTube upload failed: {}", text)));
        }

        let uploaded: UploadedVideo = resp.json().await?;
        Ok(uploaded.id)
    }

    async fn set_thumbnail(&self, video_id: &str, thumbnail: &Path) -> Result<(), ServiceError> {
        let token = self.auth.access_token().await?;
        let data = tokio::fs::read(thumbnail).await?;

        let resp = self
            .http
            .post(THUMBNAIL_URL)
            .query(&[("videoId", video_id)])
            .bearer_auth(&token)
            .header("Content-Type", "image/jpeg")
            .body(data)
            .send()
            .await?;

        if !resp.status().is_success() {
            let text = resp.text().await?;
            return Err(ServiceError::Api(format!(
                "Thumbnail update failed: {}",
                text
            )));
        }

        Ok(())
    }

    async fn check_health(&self) -> bool {
        let Ok(token) = self.auth.access_token().await else {
            return false;
        };

        match self
            .http
            .get(CHANNELS_URL)
            .query(&[("part", "snippet"), ("mine", "true")])
            .bearer_auth(&token)
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }
}
