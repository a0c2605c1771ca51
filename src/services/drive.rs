//! Google Drive file-storage adapter.

use std::path::Path;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::error::ServiceError;
use super::google_auth::GoogleAuth;
use super::FileStore;

const FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";
const UPLOAD_URL: &str = "https://www.googleapis.com/upload/drive/v3/files";
const ABOUT_URL: &str = "https://www.googleapis.com/drive/v3/about";

const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

#[derive(Clone)]
pub struct DriveClient {
    auth: GoogleAuth,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
}

impl DriveClient {
    pub fn new(auth: GoogleAuth) -> Self {
        Self {
            auth,
            http: Client::new(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(GoogleAuth::from_env("GOOGLE"))
    }
}

fn mime_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("mp4") => "video/mp4",
        Some("avi") => "video/x-msvideo",
        Some("mov") => "video/quicktime",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("txt") => "text/plain",
        Some("json") => "application/json",
        _ => "application/octet-stream",
    }
}

#[async_trait]
impl FileStore for DriveClient {
    async fn create_folder(&self, name: &str) -> Result<String, ServiceError> {
        let token = self.auth.access_token().await?;
        let body = json!({ "name": name, "mimeType": FOLDER_MIME_TYPE });

        let resp = self
            .http
            .post(FILES_URL)
            .query(&[("fields", "id")])
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let text = resp.text().await?;
            return Err(ServiceError::Api(format!("Folder creation failed: {}", text)));
        }

        let folder: DriveFile = resp.json().await?;
        Ok(folder.id)
    }

    /// Resumable upload: request a session URI with the file metadata, then
    /// PUT the file bytes to it.
    async fn upload_file(
        &self,
        path: &Path,
        file_name: &str,
        folder_id: Option<&str>,
    ) -> Result<String, ServiceError> {
        let token = self.auth.access_token().await?;
        let mime_type = mime_type_for(path);

        let mut metadata = json!({ "name": file_name });
        if let Some(parent) = folder_id {
            metadata["parents"] = json!([parent]);
        }

        let resp = self
            .http
            .post(UPLOAD_URL)
            .query(&[("uploadType", "resumable"), ("fields", "id")])
            .bearer_auth(&token)
            .header("X-Upload-Content-Type", mime_type)
            .json(&metadata)
            .send()
            .await?;

        if !resp.status().is_success() {
            let text = resp.text().await?;
            return Err(ServiceError::Api(format!(
                "Drive upload init failed: {}",
                text
            )));
        }

        let session_url = resp
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                ServiceError::Api("Drive upload init returned no session URI".to_string())
            })?
            .to_string();

        let data = tokio::fs::read(path).await?;
        let resp = self
            .http
            .put(&session_url)
            .bearer_auth(&token)
            .header("Content-Type", mime_type)
            .body(data)
            .send()
            .await?;

        if !resp.status().is_success() {
            let text = resp.text().await?;
            return Err(ServiceError::Api(format!("File upload failed: {}", text)));
        }

        let file: DriveFile = resp.json().await?;
        Ok(file.id)
    }

    async fn check_health(&self) -> bool {
        let Ok(token) = self.auth.access_token().await else {
            return false;
        };

        match self
            .http
            .get(ABOUT_URL)
            .query(&[("fields", "user")])
            .bearer_auth(&token)
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_extensions_to_mime_types() {
        assert_eq!(mime_type_for(Path::new("/tmp/video_123.mp4")), "video/mp4");
        assert_eq!(mime_type_for(Path::new("thumb.JPG")), "image/jpeg");
        assert_eq!(mime_type_for(Path::new("audio.mp3")), "audio/mpeg");
        assert_eq!(
            mime_type_for(Path::new("mystery.bin")),
            "application/octet-stream"
        );
        assert_eq!(
            mime_type_for(Path::new("no_extension")),
            "application/octet-stream"
        );
    }
}
