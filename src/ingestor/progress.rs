//! Run context and progress reporting
//!
//! A [`RunContext`] is created once per run and handed to the scheduler. It
//! fixes the run's notion of "today" and carries the reporter that receives
//! per-job progress events from the worker tasks.

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use tracing::{debug, info};

use crate::models::FetchJob;

/// Receives progress events from worker tasks
pub trait ProgressReporter: Send + Sync {
    fn job_started(&self, job: &FetchJob);

    fn day_fetched(&self, job: &FetchJob, date: NaiveDate, programs: usize);

    fn job_finished(&self, job: &FetchJob, programs: usize);
}

#[derive(Clone)]
pub struct RunContext {
    /// First day of the fetched timespan
    pub today: NaiveDate,
    pub reporter: Arc<dyn ProgressReporter>,
}

impl RunContext {
    pub fn new(today: NaiveDate, reporter: Arc<dyn ProgressReporter>) -> Self {
        Self { today, reporter }
    }

    /// Context whose "today" is the current date in `timezone`
    pub fn for_timezone(timezone: Tz, reporter: Arc<dyn ProgressReporter>) -> Self {
        Self::new(Utc::now().with_timezone(&timezone).date_naive(), reporter)
    }

    /// Context that reports nothing
    pub fn silent(today: NaiveDate) -> Self {
        Self::new(today, Arc::new(NoProgress))
    }
}

impl std::fmt::Debug for RunContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunContext")
            .field("today", &self.today)
            .finish_non_exhaustive()
    }
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn job_started(&self, _job: &FetchJob) {}

    fn day_fetched(&self, _job: &FetchJob, _date: NaiveDate, _programs: usize) {}

    fn job_finished(&self, _job: &FetchJob, _programs: usize) {}
}

/// Emits progress as tracing events
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn job_started(&self, job: &FetchJob) {
        info!("Fetching channel '{}' from {}", job.site_id, job.site);
    }

    fn day_fetched(&self, job: &FetchJob, date: NaiveDate, programs: usize) {
        debug!(
            "Fetched {} programs for '{}' on {}",
            programs, job.site_id, date
        );
    }

    fn job_finished(&self, job: &FetchJob, programs: usize) {
        info!(
            "Finished channel '{}' from {} ({} programs)",
            job.site_id, job.site, programs
        );
    }
}

/// Terminal progress bar advancing once per finished job
pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub fn new(total_jobs: usize) -> Self {
        let bar = ProgressBar::new(total_jobs as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Self { bar }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl ProgressReporter for BarProgress {
    fn job_started(&self, job: &FetchJob) {
        self.bar.set_message(format!("{} {}", job.site, job.site_id));
    }

    fn day_fetched(&self, job: &FetchJob, date: NaiveDate, _programs: usize) {
        self.bar.set_message(format!("{} {} {}", job.site, job.site_id, date));
    }

    fn job_finished(&self, _job: &FetchJob, _programs: usize) {
        self.bar.inc(1);
    }
}
