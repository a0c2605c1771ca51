//! External-service adapters, media composition, and the automation pipeline.
//!
//! Each vendor capability sits behind a trait so the orchestrator and the
//! health endpoint can be exercised against fakes.

pub mod automation;
pub mod composer;
pub mod drive;
pub mod error;
pub mod gemini;
pub mod google_auth;
pub mod pipeline;
pub mod scheduler;
pub mod tts;
pub mod youtube;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::NewTrendingTopic;
use error::ServiceError;
use pipeline::VideoCreator;

/// Text-generation capability: trending analysis, scripts, descriptions.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn analyze_trending_news(&self) -> Result<Vec<NewTrendingTopic>, ServiceError>;
    async fn generate_script(
        &self,
        topic: &str,
        target_secs: u32,
    ) -> Result<String, ServiceError>;
    async fn generate_description(
        &self,
        title: &str,
        script: &str,
    ) -> Result<String, ServiceError>;
    async fn check_health(&self) -> bool;
}

/// Voice parameters for speech synthesis.
#[derive(Debug, Clone)]
pub struct VoiceOptions {
    pub voice: String,
    pub language_code: String,
    pub gender: String,
    pub speaking_rate: f64,
    pub pitch: f64,
}

impl Default for VoiceOptions {
    fn default() -> Self {
        Self {
            voice: "en-IN-Standard-A".to_string(),
            language_code: "en-IN".to_string(),
            gender: "NEUTRAL".to_string(),
            speaking_rate: 1.0,
            pitch: 0.0,
        }
    }
}

/// Text-to-speech capability. Synthesized audio lands in a temp file.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(
        &self,
        text: &str,
        options: &VoiceOptions,
    ) -> Result<PathBuf, ServiceError>;
    /// Full-script synthesis with the news-reading voice profile.
    async fn synthesize_script(&self, script: &str) -> Result<PathBuf, ServiceError>;
    async fn check_health(&self) -> bool;
}

/// Metadata attached to a video-host upload.
#[derive(Debug, Clone)]
pub struct UploadMetadata {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub category_id: String,
    pub privacy_status: String,
}

/// Video hosting capability (upload + thumbnail).
#[async_trait]
pub trait VideoHost: Send + Sync {
    async fn upload_video(
        &self,
        path: &Path,
        metadata: &UploadMetadata,
    ) -> Result<String, ServiceError>;
    async fn set_thumbnail(&self, video_id: &str, thumbnail: &Path) -> Result<(), ServiceError>;
    async fn check_health(&self) -> bool;
}

/// Cloud file storage capability (folders + uploads).
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn create_folder(&self, name: &str) -> Result<String, ServiceError>;
    async fn upload_file(
        &self,
        path: &Path,
        file_name: &str,
        folder_id: Option<&str>,
    ) -> Result<String, ServiceError>;
    async fn check_health(&self) -> bool;
}

/// Media composition over the external ffmpeg/ffprobe tools.
#[async_trait]
pub trait MediaComposer: Send + Sync {
    /// Render the narrated video; falls back to a simpler layout before failing.
    async fn compose_video(&self, audio: &Path, title: &str) -> Result<PathBuf, ServiceError>;
    async fn render_thumbnail(&self, title: &str) -> Result<PathBuf, ServiceError>;
    /// Media duration in seconds.
    async fn probe_duration(&self, media: &Path) -> Result<f64, ServiceError>;
}

/// Shared handles to the database and every adapter.
#[derive(Clone)]
pub struct Services {
    pub db: PgPool,
    pub gemini: Arc<dyn TextGenerator>,
    pub tts: Arc<dyn SpeechSynthesizer>,
    pub youtube: Arc<dyn VideoHost>,
    pub drive: Arc<dyn FileStore>,
    pub creator: Arc<VideoCreator>,
}
