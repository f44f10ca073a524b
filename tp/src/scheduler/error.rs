//! Scheduler error types

use thiserror::Error;

use crate::domain::Uid;
use crate::task::TaskError;

/// Errors reported by scheduler operations
///
/// A task's own action failing is not represented here: that is an
/// [`Outcome`](crate::Outcome) the run loop reacts to, not a fault of the
/// scheduler.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchedulerError {
    /// Task construction failed before anything was enqueued
    #[error(transparent)]
    Task(#[from] TaskError),

    /// The pending-task limit is reached; the rejected task was destroyed
    #[error("queue is full: {limit} tasks pending")]
    QueueFull { limit: usize },

    /// No pending task carries the given identity
    #[error("no pending task with id {0}")]
    TaskNotFound(Uid),

    /// The scheduler behind a handle no longer exists
    #[error("scheduler is gone: request channel closed")]
    Disconnected,
}

impl SchedulerError {
    /// Check if this is the non-fatal not-found case
    pub fn is_not_found(&self) -> bool {
        matches!(self, SchedulerError::TaskNotFound(_))
    }

    /// Check if this is a capacity rejection
    pub fn is_full(&self) -> bool {
        matches!(self, SchedulerError::QueueFull { .. })
    }
}
