use chrono::{Days, NaiveDate};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use super::aggregator::ChannelAggregator;
use super::progress::{ProgressReporter, RunContext};
use crate::config::defaults::{DEFAULT_POOL_SIZE, DEFAULT_TIMESPAN_DAYS};
use crate::errors::{AppError, AppResult};
use crate::models::{ChannelKey, FetchJob, Program};
use crate::sources::{AdapterRegistry, EpgSiteAdapter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerSettings {
    /// Maximum number of jobs running at once
    pub workers: usize,
    /// Days fetched per channel, starting today
    pub timespan_days: u32,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            workers: DEFAULT_POOL_SIZE,
            timespan_days: DEFAULT_TIMESPAN_DAYS,
        }
    }
}

/// Runs fetch jobs on a bounded worker pool
///
/// Every job resolves its adapter up front, so a configuration naming an
/// unknown site fails before any request is made. The first failing job
/// aborts the rest of the run. Results are aggregated in job order, whatever
/// order the jobs complete in.
pub struct JobScheduler {
    registry: Arc<AdapterRegistry>,
    settings: SchedulerSettings,
}

impl JobScheduler {
    pub fn new(registry: Arc<AdapterRegistry>, settings: SchedulerSettings) -> Self {
        Self { registry, settings }
    }

    pub fn settings(&self) -> SchedulerSettings {
        self.settings
    }

    /// The fetched days, in order, starting at `today`
    pub fn days(&self, today: NaiveDate) -> Vec<NaiveDate> {
        (0..self.settings.timespan_days)
            .filter_map(|offset| today.checked_add_days(Days::new(u64::from(offset))))
            .collect()
    }

    pub async fn run(&self, jobs: Vec<FetchJob>, ctx: &RunContext) -> AppResult<ChannelAggregator> {
        let resolved = jobs
            .into_iter()
            .map(|job| {
                let adapter = self.registry.resolve(&job.site)?;
                Ok((job, adapter))
            })
            .collect::<AppResult<Vec<_>>>()?;

        let days = self.days(ctx.today);
        let workers = self.settings.workers.max(1);
        info!(
            "Scheduling {} jobs over {} days with {} workers",
            resolved.len(),
            days.len(),
            workers
        );

        let semaphore = Arc::new(Semaphore::new(workers));
        let mut tasks = JoinSet::new();

        let job_count = resolved.len();
        for (index, (job, adapter)) in resolved.into_iter().enumerate() {
            let semaphore = semaphore.clone();
            let reporter = ctx.reporter.clone();
            let days = days.clone();

            tasks.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| AppError::internal(format!("Worker pool closed: {e}")))?;
                let result = run_job(&job, adapter.as_ref(), &days, reporter.as_ref()).await?;
                Ok::<_, AppError>((index, result))
            });
        }

        // Slots are filled as jobs complete and drained in configuration order
        let mut results: Vec<Option<(ChannelKey, Vec<Program>)>> =
            std::iter::repeat_with(|| None).take(job_count).collect();
        while let Some(joined) = tasks.join_next().await {
            let outcome = joined
                .map_err(|e| AppError::internal(format!("Worker task failed: {e}")))
                .and_then(|outcome| outcome);

            match outcome {
                Ok((index, result)) => results[index] = Some(result),
                Err(e) => {
                    error!("{}; aborting {} remaining jobs", e, tasks.len());
                    tasks.abort_all();
                    return Err(e);
                }
            }
        }

        let mut aggregator = ChannelAggregator::new();
        for (key, programs) in results.into_iter().flatten() {
            aggregator.insert(key, programs);
        }

        Ok(aggregator)
    }
}

/// Fetch one channel and all of its days, sequentially
async fn run_job(
    job: &FetchJob,
    adapter: &dyn EpgSiteAdapter,
    days: &[NaiveDate],
    reporter: &dyn ProgressReporter,
) -> AppResult<(ChannelKey, Vec<Program>)> {
    let fail = |source| AppError::job_failed(&job.site, &job.site_id, source);
    reporter.job_started(job);

    let channel = match days.first() {
        Some(&first_day) => {
            adapter
                .fetch_channel_for_day(&job.site_id, &job.display_name, first_day)
                .await
        }
        None => adapter.fetch_channel(&job.site_id, &job.display_name).await,
    }
    .map_err(fail)?;

    if !job.xmltv_id.is_empty() && job.xmltv_id != channel.id {
        debug!(
            "Channel '{}' on {} is identified as '{}' (configured as '{}')",
            job.site_id, job.site, channel.id, job.xmltv_id
        );
    }

    let mut programs = Vec::new();
    for &date in days {
        let day_programs = adapter
            .fetch_programs(&channel, &job.site_id, date)
            .await
            .map_err(fail)?;
        reporter.day_fetched(job, date, day_programs.len());
        programs.extend(day_programs);
    }

    reporter.job_finished(job, programs.len());
    Ok((ChannelKey::new(channel), programs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_cover_timespan() {
        let scheduler = JobScheduler::new(
            Arc::new(AdapterRegistry::new()),
            SchedulerSettings {
                workers: 2,
                timespan_days: 3,
            },
        );
        let today = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();

        let days: Vec<String> = scheduler.days(today).iter().map(|d| d.to_string()).collect();
        assert_eq!(days, vec!["2024-02-28", "2024-02-29", "2024-03-01"]);
    }

    #[test]
    fn test_default_settings() {
        let settings = SchedulerSettings::default();
        assert_eq!(settings.workers, 1);
        assert_eq!(settings.timespan_days, 1);
    }

    #[tokio::test]
    async fn test_unknown_site_fails_before_dispatch() {
        let scheduler = JobScheduler::new(Arc::new(AdapterRegistry::new()), SchedulerSettings::default());
        let ctx = RunContext::silent(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());

        let err = scheduler
            .run(vec![FetchJob::new("nowhere.example", "x", "", "X")], &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnknownSite { ref site } if site == "nowhere.example"));
    }

    #[tokio::test]
    async fn test_no_jobs_yields_empty_aggregate() {
        let scheduler = JobScheduler::new(Arc::new(AdapterRegistry::new()), SchedulerSettings::default());
        let ctx = RunContext::silent(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());

        let aggregator = scheduler.run(Vec::new(), &ctx).await.unwrap();
        assert!(aggregator.is_empty());
    }
}
