//! Media composition over the external ffmpeg/ffprobe tools.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::warn;

use super::MediaComposer;
use super::error::ServiceError;
use crate::constants;

/// Length fed to the lavfi color source; `-shortest` trims the result to the
/// narration track.
const BACKGROUND_SECS: u32 = 300;

/// drawtext rejects unescaped quotes/colons/brackets and ffmpeg truncates
/// nothing for us, so titles are capped here.
const MAX_TITLE_CHARS: usize = 100;

pub struct FfmpegComposer;

impl FfmpegComposer {
    pub fn new() -> Self {
        Self
    }

    async fn run_ffmpeg(args: &[String]) -> Result<(), ServiceError> {
        let output = Command::new("ffmpeg")
            .args(["-hide_banner", "-loglevel", "error", "-nostdin"])
            .args(args)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| ServiceError::Processing(format!("Failed to spawn ffmpeg: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ServiceError::Processing(format!("ffmpeg failed: {}", stderr)));
        }

        Ok(())
    }

    /// Dark 1080p background, boxed title, "Breaking News Update" banner.
    async fn compose_full(
        &self,
        audio: &Path,
        title: &str,
        output: &Path,
    ) -> Result<(), ServiceError> {
        let filter = format!(
            "[0:v]drawtext=text='{}':fontsize=60:fontcolor=white:x=(w-text_w)/2:y=h/4:\
             box=1:boxcolor=black@0.5:boxborderw=10[title];\
             [title]drawtext=text='Breaking News Update':fontsize=40:fontcolor=orange:\
             x=(w-text_w)/2:y=h/8[out]",
            escape_drawtext(title)
        );

        let args = vec![
            "-f".to_string(),
            "lavfi".to_string(),
            "-i".to_string(),
            format!(
                "color=c=0x1a1a2e:duration={}:size=1920x1080:rate=30",
                BACKGROUND_SECS
            ),
            "-i".to_string(),
            audio.display().to_string(),
            "-filter_complex".to_string(),
            filter,
            "-map".to_string(),
            "[out]".to_string(),
            "-map".to_string(),
            "1:a".to_string(),
            "-c:v".to_string(),
            "libx264".to_string(),
            "-c:a".to_string(),
            "aac".to_string(),
            "-shortest".to_string(),
            "-y".to_string(),
            output.display().to_string(),
        ];

        Self::run_ffmpeg(&args).await
    }

    /// Plain blue 720p background with a centered title.
    async fn compose_simple(
        &self,
        audio: &Path,
        title: &str,
        output: &Path,
    ) -> Result<(), ServiceError> {
        let filter = format!(
            "[0:v]drawtext=text='{}':fontsize=48:fontcolor=white:\
             x=(w-text_w)/2:y=(h-text_h)/2[out]",
            escape_drawtext(title)
        );

        let args = vec![
            "-f".to_string(),
            "lavfi".to_string(),
            "-i".to_string(),
            format!(
                "color=c=blue:duration={}:size=1280x720:rate=30",
                BACKGROUND_SECS
            ),
            "-i".to_string(),
            audio.display().to_string(),
            "-filter_complex".to_string(),
            filter,
            "-map".to_string(),
            "[out]".to_string(),
            "-map".to_string(),
            "1:a".to_string(),
            "-c:v".to_string(),
            "libx264".to_string(),
            "-c:a".to_string(),
            "aac".to_string(),
            "-shortest".to_string(),
            "-y".to_string(),
            output.display().to_string(),
        ];

        Self::run_ffmpeg(&args).await
    }
}

#[async_trait]
impl MediaComposer for FfmpegComposer {
    async fn compose_video(&self, audio: &Path, title: &str) -> Result<PathBuf, ServiceError> {
        let dir = constants::temp_dir();
        tokio::fs::create_dir_all(&dir).await?;

        let output = dir.join(format!("autotube_video_{}.mp4", rand::random::<u64>()));
        match self.compose_full(audio, title, &output).await {
            Ok(()) => Ok(output),
            Err(e) => {
                warn!("Full composition failed ({}), retrying with simple layout", e);
                let fallback =
                    dir.join(format!("autotube_video_simple_{}.mp4", rand::random::<u64>()));
                self.compose_simple(audio, title, &fallback).await?;
                Ok(fallback)
            }
        }
    }

    async fn render_thumbnail(&self, title: &str) -> Result<PathBuf, ServiceError> {
        let dir = constants::temp_dir();
        tokio::fs::create_dir_all(&dir).await?;
        let output = dir.join(format!("autotube_thumbnail_{}.jpg", rand::random::<u64>()));

        let filter = format!(
            "[0:v]drawtext=text='{}':fontsize=48:fontcolor=white:\
             x=(w-text_w)/2:y=(h-text_h)/2:box=1:boxcolor=red@0.8:boxborderw=20[thumb]",
            escape_drawtext(title)
        );

        let args = vec![
            "-f".to_string(),
            "lavfi".to_string(),
            "-i".to_string(),
            "color=c=0x1a1a2e:size=1280x720:duration=1".to_string(),
            "-filter_complex".to_string(),
            filter,
            "-map".to_string(),
            "[thumb]".to_string(),
            "-frames:v".to_string(),
            "1".to_string(),
            "-y".to_string(),
            output.display().to_string(),
        ];

        Self::run_ffmpeg(&args).await?;
        Ok(output)
    }

    async fn probe_duration(&self, media: &Path) -> Result<f64, ServiceError> {
        let output = Command::new("ffprobe")
            .args([
                "-v",
                "quiet",
                "-show_entries",
                "format=duration",
                "-of",
                "csv=p=0",
            ])
            .arg(media)
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .await
            .map_err(|e| ServiceError::Processing(format!("Failed to spawn ffprobe: {}", e)))?;

        if !output.status.success() {
            return Err(ServiceError::Processing(format!(
                "ffprobe failed on {}",
                media.display()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout);
        text.trim()
            .parse::<f64>()
            .map_err(|e| ServiceError::Processing(format!("Unparsable ffprobe duration: {}", e)))
    }
}

/// Escape a string for use inside a drawtext filter argument.
pub fn escape_drawtext(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars().take(MAX_TITLE_CHARS) {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            ':' => out.push_str("\\:"),
            '[' | ']' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push(' '),
            _ => out.push(c),
        }
    }
    out
}

/// Format a duration in seconds as "M:SS" for the dashboard.
pub fn format_duration(secs: f64) -> String {
    let total = secs.floor() as i64;
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_drawtext_metacharacters() {
        assert_eq!(
            escape_drawtext("Breaking: AI's 'big' [win]"),
            "Breaking\\: AI\\'s \\'big\\' \\[win\\]"
        );
        assert_eq!(escape_drawtext("line\nbreak"), "line break");
    }

    #[test]
    fn caps_title_length() {
        let long = "x".repeat(500);
        assert_eq!(escape_drawtext(&long).len(), 100);
    }

    #[test]
    fn formats_durations() {
        assert_eq!(format_duration(0.0), "0:00");
        assert_eq!(format_duration(59.9), "0:59");
        assert_eq!(format_duration(60.0), "1:00");
        assert_eq!(format_duration(125.4), "2:05");
        assert_eq!(format_duration(600.0), "10:00");
    }
}
