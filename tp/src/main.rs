//! Tempo - time-ordered task scheduler
//!
//! CLI entry point: loads a job config, registers each job as a scheduled
//! task, and runs the loop on the calling thread.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::{info, warn};

use tempo::cli::{Cli, Command};
use tempo::config::{Config, JobConfig};
use tempo::scheduler::Scheduler;
use tempo::Outcome;

fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tempo")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Setup tracing subscriber - write to log file, not stdout/stderr
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::File::create(log_dir.join("tempo.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

/// Build the scheduler action for one configured job
fn job_action(job: JobConfig) -> impl FnMut() -> Outcome + Send + 'static {
    let mut completed: u64 = 0;
    move || {
        info!(job = %job.name, run = completed + 1, "executing job command");
        let status = std::process::Command::new("sh").arg("-c").arg(&job.command).status();

        match status {
            Ok(status) if status.success() => {
                completed += 1;
                if job.repeat && job.max_runs.is_none_or(|max| completed < max) {
                    Outcome::Repeat
                } else {
                    Outcome::Success
                }
            }
            Ok(status) => {
                warn!(job = %job.name, ?status, "job command failed");
                Outcome::Error
            }
            Err(err) => {
                warn!(job = %job.name, %err, "job command could not be spawned");
                Outcome::Error
            }
        }
    }
}

fn cmd_run(config: Config) -> Result<ExitCode> {
    config.validate()?;

    let mut sched = Scheduler::with_config(config.scheduler.clone());
    for job in config.jobs {
        let name = job.name.clone();
        let interval = job.interval();
        let retired = job.name.clone();
        sched
            .add_task_with_cleanup(interval, job_action(job), move || info!(job = %retired, "job retired"))
            .map_err(|e| eyre::eyre!("failed to register job '{}': {}", name, e))?;
    }

    info!(jobs = sched.len(), "starting run loop");
    let outcome = sched.run();
    info!(%outcome, pending = sched.len(), "run loop finished");

    match outcome {
        Outcome::Error => {
            eprintln!("{} a job reported failure, {} left pending", "error:".red().bold(), sched.len());
            Ok(ExitCode::FAILURE)
        }
        Outcome::Stop => {
            println!("{} a job requested stop, {} left pending", "stopped:".yellow().bold(), sched.len());
            Ok(ExitCode::SUCCESS)
        }
        _ => {
            println!("{} all jobs completed", "done:".green().bold());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn cmd_validate(file: &PathBuf) -> Result<()> {
    let config = Config::load(Some(file))?;
    config.validate()?;
    println!("{} {} ({} jobs)", "ok:".green().bold(), file.display(), config.jobs.len());
    Ok(())
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            let config = Config::load(cli.config.as_ref())?;
            cmd_run(config)
        }
        Command::Validate { file } => {
            cmd_validate(&file)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
