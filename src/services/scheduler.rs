//! Cron trigger registry built on apalis workers.
//!
//! Each trigger is a `CronStream`-backed worker running on its own spawned
//! `Monitor`; the registry maps trigger names to the spawned task handles so
//! triggers can be stopped and removed individually.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use apalis::prelude::*;
use apalis_cron::{CronStream, Schedule};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::Services;
use super::automation;
use crate::constants::{CLEANUP_CRON, DAILY_VIDEO_CRON, NEWS_ANALYSIS_CRON};
use crate::domain::{schedules, topics};
use crate::models::{JobType, NewSchedule, Schedule as ScheduleRow};

#[derive(Debug)]
pub enum SchedulerError {
    InvalidCron(String),
    UnknownJobType(String),
    Database(sqlx::Error),
}

impl std::fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchedulerError::InvalidCron(s) => write!(f, "Invalid cron expression: {}", s),
            SchedulerError::UnknownJobType(s) => write!(f, "Unknown job type: {}", s),
            SchedulerError::Database(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for SchedulerError {}

impl From<sqlx::Error> for SchedulerError {
    fn from(e: sqlx::Error) -> Self {
        SchedulerError::Database(e)
    }
}

/// One cron fire, carrying the tick time the stream produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerTick {
    pub fired_at: DateTime<Utc>,
}

impl From<DateTime<Utc>> for TriggerTick {
    fn from(dt: DateTime<Utc>) -> Self {
        TriggerTick { fired_at: dt }
    }
}

#[derive(Clone)]
struct TriggerContext {
    services: Arc<Services>,
    job_type: JobType,
}

/// Worker handler for a cron fire. The run itself is detached so a slow run
/// never delays the next tick; overlapping runs of one job type are possible.
async fn fire_trigger(tick: TriggerTick, ctx: Data<TriggerContext>) -> Result<(), Error> {
    info!(
        "Trigger fired at {} for {}",
        tick.fired_at,
        ctx.job_type.as_str()
    );
    let services = ctx.services.clone();
    let job_type = ctx.job_type;
    tokio::spawn(async move {
        automation::run_scheduled(&services, job_type).await;
    });
    Ok(())
}

pub struct Scheduler {
    services: Arc<Services>,
    triggers: Mutex<HashMap<String, JoinHandle<()>>>,
    running: AtomicBool,
}

impl Scheduler {
    pub fn new(services: Arc<Services>) -> Self {
        Self {
            services,
            triggers: Mutex::new(HashMap::new()),
            running: AtomicBool::new(false),
        }
    }

    /// Register the built-in triggers. If no topics were analyzed in the
    /// last 24 hours, one analysis pass runs immediately.
    pub async fn start(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Scheduler already running");
            return;
        }

        info!("Starting scheduler service...");
        for (name, expr, job_type) in [
            ("daily_video", DAILY_VIDEO_CRON, JobType::VideoCreation),
            ("news_analysis", NEWS_ANALYSIS_CRON, JobType::NewsAnalysis),
            ("cleanup", CLEANUP_CRON, JobType::Cleanup),
        ] {
            if let Err(e) = self.register_trigger(name, expr, job_type) {
                error!("Failed to register {} trigger: {}", name, e);
            }
        }
        info!("Scheduler service started");

        self.check_initial_analysis().await;
    }

    /// Abort and discard every registered trigger.
    pub fn stop(&self) {
        info!("Stopping scheduler service...");
        let mut triggers = self.triggers.lock().unwrap();
        for (name, handle) in triggers.drain() {
            handle.abort();
            info!("Stopped {} trigger", name);
        }
        self.running.store(false, Ordering::SeqCst);
        info!("Scheduler service stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Liveness of each registered trigger's worker task.
    pub fn job_status(&self) -> HashMap<String, bool> {
        self.triggers
            .lock()
            .unwrap()
            .iter()
            .map(|(name, handle)| (name.clone(), !handle.is_finished()))
            .collect()
    }

    /// Persist a named schedule and activate its trigger. The expression and
    /// job type are validated before anything is written.
    pub async fn add_schedule(&self, new: &NewSchedule) -> Result<ScheduleRow, SchedulerError> {
        let job_type = JobType::parse(&new.job_type)
            .ok_or_else(|| SchedulerError::UnknownJobType(new.job_type.clone()))?;
        Schedule::from_str(&new.cron_expression)
            .map_err(|e| SchedulerError::InvalidCron(e.to_string()))?;

        let row = schedules::create_schedule(&self.services.db, new).await?;
        self.register_trigger(&new.name, &new.cron_expression, job_type)?;

        info!("Custom schedule added: {}", new.name);
        Ok(row)
    }

    /// Deactivate a named trigger and delete its schedule row. Returns
    /// whether a row existed.
    pub async fn remove_schedule(&self, name: &str) -> Result<bool, SchedulerError> {
        if let Some(handle) = self.triggers.lock().unwrap().remove(name) {
            handle.abort();
        }

        let deleted = schedules::delete_schedule(&self.services.db, name).await?;
        if deleted > 0 {
            info!("Custom schedule removed: {}", name);
        }
        Ok(deleted > 0)
    }

    fn register_trigger(
        &self,
        name: &str,
        expr: &str,
        job_type: JobType,
    ) -> Result<(), SchedulerError> {
        let schedule = Schedule::from_str(expr)
            .map_err(|e| SchedulerError::InvalidCron(e.to_string()))?;

        let ctx = TriggerContext {
            services: self.services.clone(),
            job_type,
        };
        let worker = WorkerBuilder::new(name)
            .data(ctx)
            .backend(CronStream::new(schedule))
            .build_fn(fire_trigger);

        let worker_name = name.to_string();
        let handle = tokio::spawn(async move {
            if let Err(e) = Monitor::new().register(worker).run().await {
                error!("Trigger monitor for {} exited: {}", worker_name, e);
            }
        });

        self.triggers
            .lock()
            .unwrap()
            .insert(name.to_string(), handle);
        Ok(())
    }

    async fn check_initial_analysis(&self) {
        match topics::count_recent_trending_topics(&self.services.db, 24).await {
            Ok(0) => {
                info!("No recent topics found, running initial analysis...");
                automation::run_scheduled(&self.services, JobType::NewsAnalysis).await;
            }
            Ok(_) => {}
            Err(e) => error!("Failed to check for recent topics: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_cron_expressions_parse() {
        for expr in [DAILY_VIDEO_CRON, NEWS_ANALYSIS_CRON, CLEANUP_CRON] {
            assert!(Schedule::from_str(expr).is_ok(), "bad expression: {}", expr);
        }
    }

    #[test]
    fn rejects_malformed_cron_expressions() {
        assert!(Schedule::from_str("not a cron").is_err());
        assert!(Schedule::from_str("99 99 99 * * *").is_err());
    }
}
