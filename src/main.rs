//! cronhost - host for cron-scheduled and on-demand jobs.

mod cli;
mod jobs;
mod register;
mod signal;

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cronhost_config::{ConfigLoader, ConfigValidator, Configuration, ValidationResult};
use cronhost_core::{ConcurrencyPolicy, CronExpression, JobDataMap, OneTimeJob};
use cronhost_host::{schedule_recurring_jobs, ServiceCollection};

use crate::cli::{Cli, Commands};
use crate::jobs::{JobStats, WarmUp};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        None => run(&cli.config, None).await,
        Some(Commands::Run { log_dir }) => run(&cli.config, log_dir.as_deref()).await,
        Some(Commands::Check { upcoming }) => check(&cli.config, upcoming),
    }
}

fn init_tracing(log_dir: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let file_layer = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("cronhost")
                .filename_suffix("log")
                .max_log_files(30)
                .build(dir)?;
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);

            // Dropping the guard stops the writer thread.
            static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
                std::sync::OnceLock::new();
            let _ = GUARD.set(guard);

            Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
        }
        None => None,
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .with(file_layer)
        .init();

    Ok(())
}

fn load_config(path: &Path) -> Result<Configuration, Box<dyn std::error::Error>> {
    let expanded = ConfigLoader::expand_path(&path.to_string_lossy());
    Ok(ConfigLoader::load(Path::new(&expanded))?)
}

fn report_validation(result: &ValidationResult) {
    for warning in &result.warnings {
        warn!(path = %warning.path, "{}", warning.message);
    }
    for err in &result.errors {
        error!(path = %err.path, "{}", err.message);
    }
}

async fn run(config_path: &Path, log_dir: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    init_tracing(log_dir)?;
    info!("Starting cronhost v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(config_path)?;
    let validation = ConfigValidator::validate(&config)?;
    report_validation(&validation);
    if !validation.is_valid() {
        return Err(format!("invalid configuration: {}", config_path.display()).into());
    }
    let settings = config.scheduler_settings()?;

    let stats = Arc::new(JobStats::default());
    let mut services = ServiceCollection::new(config);
    services.add_singleton_arc(stats.clone());
    services.add_scheduler(settings)?;
    let app = services.build();

    let registry = register::recurring_jobs()?;

    app.start().await?;

    match schedule_recurring_jobs(app.services(), &registry).await {
        Ok(report) => info!(
            scheduled = report.scheduled.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "Recurring jobs processed"
        ),
        Err(e) => {
            error!("Failed to schedule recurring jobs: {}", e);
            app.stop().await?;
            return Err(e.into());
        }
    }

    if let Some(factory) = app.services().scheduler_factory() {
        let warm_up = OneTimeJob::new(WarmUp::new(stats), factory, ConcurrencyPolicy::Disallow);
        let data = JobDataMap::new().with("reason", "startup");
        match warm_up.start_now(Some(data)).await {
            Ok(trigger) => info!(job = %warm_up.key(), trigger = %trigger, "Warm-up queued"),
            Err(e) => warn!(job = %warm_up.key(), "Warm-up not queued: {}", e),
        }
    }

    info!("cronhost running, press Ctrl+C to stop");
    app.run_until(signal::wait_for_shutdown()).await?;
    Ok(())
}

fn check(config_path: &Path, upcoming: usize) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let validation = ConfigValidator::validate(&config)?;

    for warning in &validation.warnings {
        println!("warning: {}: {}", warning.path, warning.message);
    }
    for err in &validation.errors {
        println!("error: {}: {}", err.path, err.message);
    }

    let mut invalid = validation.errors.len();
    for entry in config.scheduled_task_entries()? {
        println!("{}", entry.path());
        for (index, expression) in entry.expressions.iter().enumerate() {
            match CronExpression::parse(expression) {
                Ok(cron) => {
                    println!("  [{index}] {cron}");
                    for at in cron.upcoming(upcoming) {
                        println!("      {}", at.to_rfc3339());
                    }
                }
                Err(e) => {
                    invalid += 1;
                    println!("  [{index}] {expression}: {e}");
                }
            }
        }
    }

    if invalid > 0 {
        return Err(format!("{invalid} problem(s) found in {}", config_path.display()).into());
    }
    println!("Configuration OK: {}", config_path.display());
    Ok(())
}
