//! Tempo configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::scheduler::SchedulerConfig;

/// Main tempo configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Run-loop tuning
    pub scheduler: SchedulerConfig,

    /// Jobs to register at startup
    pub jobs: Vec<JobConfig>,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Call this early to fail fast with clear messages instead of
    /// partway through registering jobs.
    pub fn validate(&self) -> Result<()> {
        for job in &self.jobs {
            if job.name.trim().is_empty() {
                return Err(eyre::eyre!("job with empty name"));
            }
            if job.command.trim().is_empty() {
                return Err(eyre::eyre!("job '{}' has an empty command", job.name));
            }
            if job.max_runs == Some(0) {
                return Err(eyre::eyre!("job '{}': max-runs must be at least 1", job.name));
            }
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .tempo.yml
        let local_config = PathBuf::from(".tempo.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/tempo/tempo.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("tempo").join("tempo.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// One shell job to run on an interval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    /// Display name used in logs and summaries
    pub name: String,

    /// Shell command executed each time the job comes due
    pub command: String,

    /// Interval between executions in milliseconds
    #[serde(rename = "interval-ms")]
    pub interval_ms: u64,

    /// Re-run after each successful execution
    #[serde(default)]
    pub repeat: bool,

    /// Cap on total executions for repeating jobs
    #[serde(rename = "max-runs", default)]
    pub max_runs: Option<u64>,
}

impl JobConfig {
    /// Get the job interval as a Duration
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}
