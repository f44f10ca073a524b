//! Task outcome codes

use serde::{Deserialize, Serialize};

/// Disposition of one executed task, reported by its action
///
/// The scheduler's reaction is keyed on variant identity:
///
/// - `Success`: discard the task and continue
/// - `Repeat`: reschedule the task one interval ahead and continue
/// - `Stop`: discard the task and halt the run loop
/// - `Error`: discard the task and halt the run loop with a failure code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Error,
    Success,
    Stop,
    Repeat,
}

impl Outcome {
    /// Check whether this outcome halts the run loop
    pub fn is_terminal(&self) -> bool {
        matches!(self, Outcome::Stop | Outcome::Error)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Success => write!(f, "success"),
            Self::Stop => write!(f, "stop"),
            Self::Repeat => write!(f, "repeat"),
        }
    }
}
