//! Application constants

use std::env;
use std::path::PathBuf;

/// Target length for generated video scripts, in seconds
pub const SCRIPT_TARGET_SECS: u32 = 300;

/// Days an analyzed trending topic is kept before the cleanup sweep
pub const DEFAULT_TOPIC_RETENTION_DAYS: i64 = 7;

/// Days a completed automation job is kept before the cleanup sweep
pub const DEFAULT_JOB_RETENTION_DAYS: i64 = 30;

/// Built-in trigger schedules (6-field cron, seconds first, UTC)
pub const DAILY_VIDEO_CRON: &str = "0 30 12 * * *";
pub const NEWS_ANALYSIS_CRON: &str = "0 0 */4 * * *";
pub const CLEANUP_CRON: &str = "0 0 2 * * *";

/// YouTube category "News & Politics"
pub const YOUTUBE_NEWS_CATEGORY: &str = "25";

/// Directory for intermediate audio/video/thumbnail files
pub fn temp_dir() -> PathBuf {
    env::var("AUTOTUBE_TEMP_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| env::temp_dir())
}

pub fn topic_retention_days() -> i64 {
    env::var("TOPIC_RETENTION_DAYS")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_TOPIC_RETENTION_DAYS)
}

pub fn job_retention_days() -> i64 {
    env::var("JOB_RETENTION_DAYS")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_JOB_RETENTION_DAYS)
}
