//! Shared data models used across modules

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lifecycle of a video record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoStatus {
    Pending,
    Processing,
    Completed,
    Published,
    Failed,
}

impl VideoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoStatus::Pending => "pending",
            VideoStatus::Processing => "processing",
            VideoStatus::Completed => "completed",
            VideoStatus::Published => "published",
            VideoStatus::Failed => "failed",
        }
    }
}

/// Automation job lifecycle. Transitions only move forward:
/// pending -> running -> completed | failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(JobStatus::Pending),
            "running" => Some(JobStatus::Running),
            "completed" => Some(JobStatus::Completed),
            "failed" => Some(JobStatus::Failed),
            _ => None,
        }
    }

    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Pending, JobStatus::Running)
                | (JobStatus::Running, JobStatus::Completed)
                | (JobStatus::Running, JobStatus::Failed)
        )
    }
}

/// Kinds of automation runs the scheduler and manual triggers can start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobType {
    NewsAnalysis,
    VideoCreation,
    Cleanup,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::NewsAnalysis => "news_analysis",
            JobType::VideoCreation => "video_creation",
            JobType::Cleanup => "cleanup",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "news_analysis" => Some(JobType::NewsAnalysis),
            "video_creation" => Some(JobType::VideoCreation),
            "cleanup" => Some(JobType::Cleanup),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub script: Option<String>,
    pub status: String,
    pub youtube_id: Option<String>,
    pub thumbnail_url: Option<String>,
    pub drive_file_id: Option<String>,
    pub views: i32,
    pub likes: i32,
    pub duration: Option<String>,
    pub trending_topic: Option<String>,
    pub trending_score: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
    pub scheduled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingTopic {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub source: Option<String>,
    pub url: Option<String>,
    pub score: i32,
    pub category: Option<String>,
    pub keywords: Vec<String>,
    pub analyzed_at: DateTime<Utc>,
    pub used: bool,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationJob {
    pub id: i32,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub job_type: String,
    pub status: String,
    pub video_id: Option<i32>,
    pub payload: Option<Value>,
    pub result: Option<Value>,
    pub error: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: i32,
    pub name: String,
    pub cron_expression: String,
    pub job_type: String,
    pub is_active: bool,
    pub config: Option<Value>,
    pub last_run: Option<DateTime<Utc>>,
    pub next_run: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfiguration {
    pub id: i32,
    pub service: String,
    pub api_key: Option<String>,
    pub config: Option<Value>,
    pub is_active: bool,
    pub last_used: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a video record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVideo {
    pub title: String,
    pub description: Option<String>,
    pub script: Option<String>,
    pub trending_topic: Option<String>,
    pub trending_score: Option<i32>,
    pub scheduled_at: Option<DateTime<Utc>>,
}

/// Insert payload for a trending topic, also the shape the text-generation
/// adapter's analysis call produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTrendingTopic {
    pub title: String,
    pub description: Option<String>,
    pub source: Option<String>,
    pub url: Option<String>,
    pub score: i32,
    pub category: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Partial update for a video record; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct VideoUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub script: Option<String>,
    pub status: Option<VideoStatus>,
    pub youtube_id: Option<String>,
    pub thumbnail_url: Option<String>,
    pub drive_file_id: Option<String>,
    pub duration: Option<String>,
    pub views: Option<i32>,
    pub likes: Option<i32>,
    pub published_at: Option<DateTime<Utc>>,
}

/// Insert payload for a named schedule.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSchedule {
    pub name: String,
    pub cron_expression: String,
    pub job_type: String,
    pub config: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_status_moves_forward_only() {
        assert!(JobStatus::Pending.can_transition_to(JobStatus::Running));
        assert!(JobStatus::Running.can_transition_to(JobStatus::Completed));
        assert!(JobStatus::Running.can_transition_to(JobStatus::Failed));

        assert!(!JobStatus::Pending.can_transition_to(JobStatus::Completed));
        assert!(!JobStatus::Pending.can_transition_to(JobStatus::Failed));
        assert!(!JobStatus::Running.can_transition_to(JobStatus::Pending));
        assert!(!JobStatus::Completed.can_transition_to(JobStatus::Failed));
        assert!(!JobStatus::Failed.can_transition_to(JobStatus::Running));
    }

    #[test]
    fn job_type_round_trips() {
        for job_type in [JobType::NewsAnalysis, JobType::VideoCreation, JobType::Cleanup] {
            assert_eq!(JobType::parse(job_type.as_str()), Some(job_type));
        }
        assert_eq!(JobType::parse("thumbnail_generation"), None);
    }
}
