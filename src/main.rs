use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use epg_grabber::{
    config::{parse_timezone, Config},
    guide::XmltvFileWriter,
    ingestor::{BarProgress, GrabberService, LogProgress, ProgressReporter, RunContext},
    sources::AdapterRegistry,
};

#[derive(Parser)]
#[command(name = "epg-grabber")]
#[command(version)]
#[command(about = "Fetch TV schedules from EPG websites and merge them into one XMLTV guide")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path (TOML, or XML with a .xml extension)
    #[arg(short, long, value_name = "PATH")]
    config: PathBuf,

    /// Show a progress bar while fetching
    #[arg(long)]
    progress: bool,

    /// Suppress console logging
    #[arg(short, long)]
    quiet: bool,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(log_filter(&cli))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting EPG grabber v{}", env!("CARGO_PKG_VERSION"));

    exit_code(run(&cli).await)
}

fn log_filter(cli: &Cli) -> tracing_subscriber::EnvFilter {
    if cli.quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| format!("epg_grabber={}", cli.log_level).into())
    }
}

/// Failures are reported through the log only, then mapped to a non-zero exit
fn exit_code(result: Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let config = Config::load_from_file(&cli.config)?;
    config.validate()?;

    let registry = Arc::new(AdapterRegistry::with_builtin_adapters(&config)?);
    info!("Available sites: {}", registry.sites().join(", "));

    let jobs = config.fetch_jobs();
    let bar = cli.progress.then(|| Arc::new(BarProgress::new(jobs.len())));
    let reporter: Arc<dyn ProgressReporter> = match &bar {
        Some(bar) => Arc::clone(bar) as Arc<dyn ProgressReporter>,
        None => Arc::new(LogProgress),
    };
    let ctx = RunContext::for_timezone(parse_timezone(&config.timezone)?, reporter);

    let writer = XmltvFileWriter::new(&config.filename);
    let service = GrabberService::new(registry, config.scheduler_settings());
    let result = service.run(jobs, &ctx, &writer).await;

    if let Some(bar) = bar {
        bar.finish();
    }

    let summary = result
        .with_context(|| format!("No guide written to {}", config.filename.display()))?;
    info!(
        "Guide complete: {} channels, {} programs in {}",
        summary.channels, summary.programs, summary.destination
    );
    Ok(())
}
