//! Scheduler configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Scheduler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Wait-loop tick in milliseconds; bounds how quickly a stop request
    /// or a deferred add/remove is noticed while idle
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Max pending tasks; `None` means unbounded
    #[serde(default)]
    pub max_pending: Option<usize>,
}

fn default_poll_interval_ms() -> u64 {
    100
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
            max_pending: None,
        }
    }
}

impl SchedulerConfig {
    /// Get the wait-loop tick as a Duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SchedulerConfig::default();
        assert_eq!(config.poll_interval_ms, 100);
        assert_eq!(config.max_pending, None);
    }

    #[test]
    fn test_poll_interval_duration() {
        let config = SchedulerConfig {
            poll_interval_ms: 250,
            ..Default::default()
        };
        assert_eq!(config.poll_interval(), Duration::from_millis(250));
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: SchedulerConfig = serde_yaml::from_str("max_pending: 4").unwrap();
        assert_eq!(config.poll_interval_ms, 100);
        assert_eq!(config.max_pending, Some(4));
    }
}
