//! Fetch orchestration
//!
//! [`GrabberService`] ties the pipeline together: the [`JobScheduler`] runs
//! every fetch job on a bounded worker pool, results are collected by a
//! [`ChannelAggregator`], and the merged, assembled guide is handed to a
//! [`GuideWriter`]. Any failing job aborts the run before anything is
//! written.

use std::sync::Arc;
use std::time::Instant;
use tracing::info;

pub mod aggregator;
pub mod progress;
pub mod scheduler;

pub use aggregator::ChannelAggregator;
pub use progress::{BarProgress, LogProgress, NoProgress, ProgressReporter, RunContext};
pub use scheduler::{JobScheduler, SchedulerSettings};

use crate::errors::AppResult;
use crate::guide::{GuideAssembler, GuideWriter, ProgramMerger};
use crate::models::FetchJob;
use crate::sources::AdapterRegistry;

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub channels: usize,
    pub programs: usize,
    /// Where the guide was written
    pub destination: String,
}

pub struct GrabberService {
    scheduler: JobScheduler,
}

impl GrabberService {
    pub fn new(registry: Arc<AdapterRegistry>, settings: SchedulerSettings) -> Self {
        Self {
            scheduler: JobScheduler::new(registry, settings),
        }
    }

    /// Fetch, merge, assemble and write the guide
    pub async fn run(
        &self,
        jobs: Vec<FetchJob>,
        ctx: &RunContext,
        writer: &dyn GuideWriter,
    ) -> AppResult<RunSummary> {
        let started = Instant::now();
        let job_count = jobs.len();

        let aggregator = self.scheduler.run(jobs, ctx).await?;
        info!(
            "Fetched {} jobs into {} channels with {} programs in {:.1}s",
            job_count,
            aggregator.len(),
            aggregator.program_count(),
            started.elapsed().as_secs_f64()
        );

        let merged = ProgramMerger::merge(aggregator);
        let document = GuideAssembler::assemble(merged);
        writer.write(&document)?;

        let summary = RunSummary {
            channels: document.channels.len(),
            programs: document.programs.len(),
            destination: writer.destination(),
        };
        info!(
            "Wrote {} channels and {} programs to {}",
            summary.channels, summary.programs, summary.destination
        );
        Ok(summary)
    }
}
