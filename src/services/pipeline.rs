//! Pipeline orchestrator - turns a trending topic into uploaded video assets.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::composer::format_duration;
use super::error::ServiceError;
use super::{FileStore, MediaComposer, SpeechSynthesizer, TextGenerator};
use crate::constants::SCRIPT_TARGET_SECS;
use crate::models::{TrendingTopic, Video};

/// Aggregate result of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub script: String,
    pub description: String,
    pub duration: String,
    pub video_path: PathBuf,
    pub thumbnail_path: PathBuf,
    pub drive_folder_id: String,
    pub drive_video_file_id: String,
    pub drive_thumbnail_file_id: String,
}

pub struct VideoCreator {
    gemini: Arc<dyn TextGenerator>,
    tts: Arc<dyn SpeechSynthesizer>,
    drive: Arc<dyn FileStore>,
    composer: Arc<dyn MediaComposer>,
}

impl VideoCreator {
    pub fn new(
        gemini: Arc<dyn TextGenerator>,
        tts: Arc<dyn SpeechSynthesizer>,
        drive: Arc<dyn FileStore>,
        composer: Arc<dyn MediaComposer>,
    ) -> Self {
        Self {
            gemini,
            tts,
            drive,
            composer,
        }
    }

    /// Produce the full asset set for `video` from `topic`.
    ///
    /// Steps run strictly in sequence, each feeding the next; the first
    /// failure propagates to the caller, which owns job/video failure
    /// bookkeeping. Nothing is retried here.
    pub async fn create_video(
        &self,
        video: &Video,
        topic: &TrendingTopic,
    ) -> Result<PipelineOutput, ServiceError> {
        info!("Starting video creation for: {}", video.title);

        let script = self
            .gemini
            .generate_script(&topic.title, SCRIPT_TARGET_SECS)
            .await?;
        let description = self
            .gemini
            .generate_description(&video.title, &script)
            .await?;

        let audio_path = self.tts.synthesize_script(&script).await?;
        let duration = match self.composer.probe_duration(&audio_path).await {
            Ok(secs) => format_duration(secs),
            Err(e) => {
                warn!("Audio duration probe failed: {}", e);
                "0:00".to_string()
            }
        };

        let video_path = self.composer.compose_video(&audio_path, &video.title).await?;
        let thumbnail_path = self.composer.render_thumbnail(&video.title).await?;

        // The narration is folded into the video now; drop the temp audio.
        if let Err(e) = tokio::fs::remove_file(&audio_path).await {
            warn!(
                "Failed to clean up audio file {}: {}",
                audio_path.display(),
                e
            );
        }

        let timestamp = Utc::now().timestamp_millis();
        let folder_name = format!(
            "{} - {}",
            Utc::now().format("%Y-%m-%d"),
            truncate(&video.title, 50)
        );
        let drive_folder_id = self.drive.create_folder(&folder_name).await?;
        let drive_video_file_id = self
            .drive
            .upload_file(
                &video_path,
                &format!("video_{}.mp4", timestamp),
                Some(&drive_folder_id),
            )
            .await?;
        let drive_thumbnail_file_id = self
            .drive
            .upload_file(
                &thumbnail_path,
                &format!("thumbnail_{}.jpg", timestamp),
                Some(&drive_folder_id),
            )
            .await?;

        info!("Video creation completed for: {}", video.title);

        Ok(PipelineOutput {
            script,
            description,
            duration,
            video_path,
            thumbnail_path,
            drive_folder_id,
            drive_video_file_id,
            drive_thumbnail_file_id,
        })
    }

    /// Best-effort removal of temp artifacts after a run.
    pub async fn cleanup(&self, paths: &[PathBuf]) {
        for path in paths {
            if let Err(e) = tokio::fs::remove_file(path).await {
                warn!("Failed to clean up file {}: {}", path.display(), e);
            }
        }
    }
}

fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::path::Path;

    use crate::models::NewTrendingTopic;
    use crate::services::VoiceOptions;

    struct FakeGenerator;

    #[async_trait]
    impl TextGenerator for FakeGenerator {
        async fn analyze_trending_news(&self) -> Result<Vec<NewTrendingTopic>, ServiceError> {
            Ok(Vec::new())
        }

        async fn generate_script(
            &self,
            topic: &str,
            _target_secs: u32,
        ) -> Result<String, ServiceError> {
            Ok(format!("Script about {}", topic))
        }

        async fn generate_description(
            &self,
            title: &str,
            _script: &str,
        ) -> Result<String, ServiceError> {
            Ok(format!("Description for {}", title))
        }

        async fn check_health(&self) -> bool {
            true
        }
    }

    struct FakeSpeech;

    #[async_trait]
    impl SpeechSynthesizer for FakeSpeech {
        async fn synthesize(
            &self,
            _text: &str,
            _options: &VoiceOptions,
        ) -> Result<PathBuf, ServiceError> {
            Ok(PathBuf::from("/nonexistent/audio.mp3"))
        }

        async fn synthesize_script(&self, _script: &str) -> Result<PathBuf, ServiceError> {
            Ok(PathBuf::from("/nonexistent/audio.mp3"))
        }

        async fn check_health(&self) -> bool {
            true
        }
    }

    struct FakeStore;

    #[async_trait]
    impl FileStore for FakeStore {
        async fn create_folder(&self, _name: &str) -> Result<String, ServiceError> {
            Ok("folder-1".to_string())
        }

        async fn upload_file(
            &self,
            _path: &Path,
            file_name: &str,
            folder_id: Option<&str>,
        ) -> Result<String, ServiceError> {
            assert_eq!(folder_id, Some("folder-1"));
            Ok(format!("file-{}", file_name))
        }

        async fn check_health(&self) -> bool {
            true
        }
    }

    struct FakeComposer {
        fail_composition: bool,
    }

    #[async_trait]
    impl MediaComposer for FakeComposer {
        async fn compose_video(
            &self,
            _audio: &Path,
            _title: &str,
        ) -> Result<PathBuf, ServiceError> {
            if self.fail_composition {
                return Err(ServiceError::Processing("ffmpeg failed: boom".to_string()));
            }
            Ok(PathBuf::from("/nonexistent/video.mp4"))
        }

        async fn render_thumbnail(&self, _title: &str) -> Result<PathBuf, ServiceError> {
            Ok(PathBuf::from("/nonexistent/thumb.jpg"))
        }

        async fn probe_duration(&self, _media: &Path) -> Result<f64, ServiceError> {
            Ok(125.0)
        }
    }

    fn sample_video() -> Video {
        Video {
            id: 1,
            title: "Breaking: Test Topic".to_string(),
            description: None,
            script: None,
            status: "pending".to_string(),
            youtube_id: None,
            thumbnail_url: None,
            drive_file_id: None,
            views: 0,
            likes: 0,
            duration: None,
            trending_topic: Some("Test Topic".to_string()),
            trending_score: Some(90),
            created_at: Utc::now(),
            published_at: None,
            scheduled_at: Some(Utc::now()),
        }
    }

    fn sample_topic() -> TrendingTopic {
        TrendingTopic {
            id: 7,
            title: "Test Topic".to_string(),
            description: None,
            source: Some("Tech News".to_string()),
            url: None,
            score: 90,
            category: Some("Technology".to_string()),
            keywords: vec!["test".to_string()],
            analyzed_at: Utc::now(),
            used: false,
        }
    }

    fn creator(fail_composition: bool) -> VideoCreator {
        VideoCreator::new(
            Arc::new(FakeGenerator),
            Arc::new(FakeSpeech),
            Arc::new(FakeStore),
            Arc::new(FakeComposer { fail_composition }),
        )
    }

    #[tokio::test]
    async fn produces_aggregate_output() {
        let output = creator(false)
            .create_video(&sample_video(), &sample_topic())
            .await
            .unwrap();

        assert_eq!(output.script, "Script about Test Topic");
        assert_eq!(output.description, "Description for Breaking: Test Topic");
        assert_eq!(output.duration, "2:05");
        assert_eq!(output.drive_folder_id, "folder-1");
        assert!(output.drive_video_file_id.starts_with("file-video_"));
        assert!(output.drive_thumbnail_file_id.starts_with("file-thumbnail_"));
    }

    #[tokio::test]
    async fn composition_failure_propagates() {
        let err = creator(true)
            .create_video(&sample_video(), &sample_topic())
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Processing(_)));
    }
}
